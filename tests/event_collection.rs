use std::thread;

use wavesynth::{io::midi::MidiEvent, io::AudioBuffer, SynthConfig, SynthEngine};

fn render(engine: &mut SynthEngine, buffer: &mut AudioBuffer, frames: usize) -> f32 {
    engine.render_block(buffer, 0, frames);
    buffer.channel(0)[..frames]
        .iter()
        .fold(0.0f32, |m, s| m.max(s.abs()))
}

#[test]
fn producer_thread_feeds_running_engine() {
    let (mut engine, mut handle) = SynthEngine::new(SynthConfig::default()).unwrap();
    engine.prepare(256, 48_000.0).unwrap();

    let producer = thread::spawn(move || {
        for step in 0..64u64 {
            let key = 48 + (step % 24) as u8;
            let at = step * 300;
            handle.push(
                MidiEvent::NoteOn {
                    channel: 0,
                    key,
                    velocity: 100,
                },
                at,
            );
            handle.push(
                MidiEvent::NoteOff {
                    channel: 0,
                    key,
                    velocity: 0,
                },
                at + 200,
            );
        }
        handle
    });

    let mut buffer = AudioBuffer::new(2, 256);
    let mut loudest = 0.0f32;
    while engine.position() < 64 * 300 + 1_000 {
        loudest = loudest.max(render(&mut engine, &mut buffer, 256));
    }
    let handle = producer.join().unwrap();

    // anything the engine overtook is applied late, never lost
    for _ in 0..8 {
        loudest = loudest.max(render(&mut engine, &mut buffer, 256));
    }

    assert_eq!(handle.dropped_count(), 0);
    assert!(loudest > 0.0 && loudest <= 1.0);
    assert_eq!(engine.synth().active_voice_count(), 0);
}

#[test]
fn raw_midi_bytes_drive_notes_and_pedal() {
    let (mut engine, mut handle) = SynthEngine::new(SynthConfig::default()).unwrap();
    engine.prepare(128, 44_100.0).unwrap();
    let mut buffer = AudioBuffer::new(1, 128);

    assert!(handle.push_raw(&[0x90, 69, 127], 0));
    render(&mut engine, &mut buffer, 128);
    assert_eq!(engine.synth().active_voice_count(), 1);

    // pedal down, key up: still sounding
    handle.push_raw(&[0xB0, 64, 127], handle.now());
    handle.push_raw(&[0x90, 69, 0], handle.now());
    for _ in 0..10 {
        render(&mut engine, &mut buffer, 128);
    }
    assert_eq!(engine.synth().active_voice_count(), 1);
    assert!(engine.synth().is_sustain_pedal_down(0));

    // pedal up: tail-off then silence
    handle.push_raw(&[0xB0, 64, 0], handle.now());
    for _ in 0..10 {
        render(&mut engine, &mut buffer, 128);
    }
    assert_eq!(engine.synth().active_voice_count(), 0);
    assert_eq!(render(&mut engine, &mut buffer, 128), 0.0);
}

#[test]
fn all_sound_off_cuts_without_tail() {
    let (mut engine, mut handle) = SynthEngine::new(SynthConfig::default()).unwrap();
    engine.prepare(64, 48_000.0).unwrap();
    let mut buffer = AudioBuffer::new(1, 64);

    for key in [60, 64, 67] {
        handle.push_now(MidiEvent::NoteOn {
            channel: 0,
            key,
            velocity: 100,
        });
    }
    render(&mut engine, &mut buffer, 64);
    assert_eq!(engine.synth().active_voice_count(), 3);

    handle.push_now(MidiEvent::ControlChange {
        channel: 0,
        controller: 120,
        value: 0,
    });
    assert_eq!(render(&mut engine, &mut buffer, 64), 0.0);
    assert_eq!(engine.synth().active_voice_count(), 0);
}

#[test]
fn prepare_again_restarts_the_clock() {
    let (mut engine, mut handle) = SynthEngine::new(SynthConfig::default()).unwrap();
    engine.prepare(256, 48_000.0).unwrap();
    let mut buffer = AudioBuffer::new(1, 256);

    handle.push_now(MidiEvent::NoteOn {
        channel: 0,
        key: 60,
        velocity: 100,
    });
    for _ in 0..4 {
        render(&mut engine, &mut buffer, 256);
    }
    assert_eq!(handle.now(), 1_024);

    engine.prepare(256, 96_000.0).unwrap();
    assert_eq!(handle.now(), 0);
    assert_eq!(handle.sample_rate(), Some(96_000.0));
    assert_eq!(engine.synth().active_voice_count(), 0);
}
