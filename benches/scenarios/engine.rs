//! Benchmarks for the complete render loop.
//!
//! Events go through the collector exactly as they would from an input
//! thread, so these include draining, sorting and sub-block splitting.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wavesynth::{io::midi::MidiEvent, io::AudioBuffer, SynthConfig, SynthEngine};

use crate::BLOCK_SIZES;

fn note_on(key: u8) -> MidiEvent {
    MidiEvent::NoteOn {
        channel: 0,
        key,
        velocity: 100,
    }
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        // === HELD CHORD ===
        // four voices, empty event queue
        let (mut engine, mut handle) = SynthEngine::new(SynthConfig::default()).unwrap();
        engine.prepare(size, 48_000.0).unwrap();
        for key in [48, 55, 64, 71] {
            handle.push_now(note_on(key));
        }
        group.bench_with_input(BenchmarkId::new("chord", size), &size, |b, &size| {
            b.iter(|| {
                engine.render_block(black_box(&mut buffer), 0, size);
            })
        });

        // === STEAL CHURN ===
        // a new note every block mid-way through, the pool is always full
        let (mut engine, mut handle) = SynthEngine::new(SynthConfig::default()).unwrap();
        engine.prepare(size, 48_000.0).unwrap();
        let mut key = 36u8;
        group.bench_with_input(BenchmarkId::new("steal", size), &size, |b, &size| {
            b.iter(|| {
                key = if key >= 96 { 36 } else { key + 7 };
                handle.push(note_on(key), handle.now() + size as u64 / 2);
                engine.render_block(black_box(&mut buffer), 0, size);
            })
        });

        // === PITCH WHEEL SWEEP ===
        // sixteen bends per block on top of a held chord
        let (mut engine, mut handle) = SynthEngine::new(SynthConfig::default()).unwrap();
        engine.prepare(size, 48_000.0).unwrap();
        for key in [48, 55, 64, 71] {
            handle.push_now(note_on(key));
        }
        let mut value = 0u16;
        group.bench_with_input(BenchmarkId::new("bend", size), &size, |b, &size| {
            b.iter(|| {
                let now = handle.now();
                for step in 0..16 {
                    value = (value + 97) % 16_384;
                    let at = now + (step * size / 16) as u64;
                    handle.push(MidiEvent::PitchBend { channel: 0, value }, at);
                }
                engine.render_block(black_box(&mut buffer), 0, size);
            })
        });
    }

    group.finish();
}
