//! Benchmarks for the table-lookup oscillator.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use wavesynth::dsp::{oscillator::WavetableOscillator, wavetable::Wavetable};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let table = Arc::new(Wavetable::sine(1024).unwrap());

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // A4 - small step, interpolation between neighbours
        let mut osc = WavetableOscillator::new(table.clone());
        osc.set_frequency(440.0, 48_000.0);
        group.bench_with_input(BenchmarkId::new("a4", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // G9 - skips many cells per sample, wraps often
        let mut osc = WavetableOscillator::new(table.clone());
        osc.set_frequency(12_543.85, 48_000.0);
        group.bench_with_input(BenchmarkId::new("g9", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
