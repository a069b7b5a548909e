//! Benchmarks for the tail-off release envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wavesynth::dsp::envelope::TailOff;

use crate::BLOCK_SIZES;

fn run(env: &mut TailOff, frames: usize) -> f32 {
    let mut acc = 0.0;
    for _ in 0..frames {
        acc += env.gain();
        if env.advance() {
            break;
        }
    }
    acc
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Held note, gain stays at 1
        let mut env = TailOff::new(0.99, 0.005);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| black_box(run(black_box(&mut env), size)))
        });

        // Release restarted each iteration so it never runs out
        let mut env = TailOff::new(0.99, 0.005);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, &size| {
            b.iter(|| {
                env.note_on();
                env.note_off();
                black_box(run(black_box(&mut env), size))
            })
        });
    }

    group.finish();
}
