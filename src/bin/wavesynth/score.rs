use std::{thread, time::Duration};

use log::info;
use wavesynth::{
    io::midi::{MidiEvent, PITCH_BEND_CENTRE},
    CollectorHandle,
};

const BEAT: Duration = Duration::from_millis(500);
/// Events are stamped this far ahead so they land sample-accurately instead
/// of at the start of whichever block is next.
const LOOKAHEAD: Duration = Duration::from_millis(30);

/// The last chord has five notes, so the four-voice pool has to steal one.
const PROGRESSION: [(&str, &[u8]); 4] = [
    ("Cmaj7", &[48, 55, 64, 71]),
    ("Am7", &[45, 55, 60, 67]),
    ("Fmaj7", &[41, 57, 64, 69]),
    ("G9", &[43, 53, 57, 59, 62]),
];

/// Feed the progression to the engine until `duration` has passed: each chord
/// is held for two beats, then arpeggiated from raw MIDI bytes with a slow
/// pitch-wheel wobble.
pub fn play(handle: &mut CollectorHandle, duration: Duration) {
    let bars = (duration.as_millis() / (BEAT.as_millis() * 4)).max(1) as usize;

    for bar in 0..bars {
        let (name, notes) = PROGRESSION[bar % PROGRESSION.len()];
        info!("bar {}: {name}", bar + 1);

        let at = handle.timestamp_after(LOOKAHEAD);
        for &key in notes {
            handle.push(note_on(key, 100), at);
        }
        thread::sleep(BEAT * 2);

        let at = handle.timestamp_after(LOOKAHEAD);
        for &key in notes {
            handle.push(note_off(key), at);
        }

        for (step, &key) in notes.iter().take(4).enumerate() {
            let at = handle.timestamp_after(LOOKAHEAD);
            handle.push_raw(&[0x90, key + 12, 80], at);
            handle.push(pitch_wheel(step), at);
            thread::sleep(BEAT / 2);

            let at = handle.timestamp_after(LOOKAHEAD);
            handle.push_raw(&[0x80, key + 12, 0], at);
        }
    }

    handle.push_now(MidiEvent::PitchBend {
        channel: 0,
        value: PITCH_BEND_CENTRE,
    });
    // let the last tail-offs ring out
    thread::sleep(BEAT);
}

fn note_on(key: u8, velocity: u8) -> MidiEvent {
    MidiEvent::NoteOn {
        channel: 0,
        key,
        velocity,
    }
}

fn note_off(key: u8) -> MidiEvent {
    MidiEvent::NoteOff {
        channel: 0,
        key,
        velocity: 0,
    }
}

/// A quarter-tone swing either side of centre.
fn pitch_wheel(step: usize) -> MidiEvent {
    const SWING: [i32; 4] = [0, 2048, 0, -2048];
    let value = PITCH_BEND_CENTRE as i32 + SWING[step % SWING.len()];
    MidiEvent::PitchBend {
        channel: 0,
        value: value as u16,
    }
}
