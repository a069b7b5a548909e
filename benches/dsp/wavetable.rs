//! Benchmarks for building and reading wavetables.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wavesynth::{dsp::wavetable::Wavetable, SynthConfig};

pub fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");
    let harmonics = SynthConfig::default().harmonics;

    // Construction happens once per engine, but shows the cost of bigger tables
    for &len in &[256usize, 1024, 4096] {
        group.bench_with_input(BenchmarkId::new("build", len), &len, |b, &len| {
            b.iter(|| Wavetable::from_harmonics(black_box(len), black_box(&harmonics)))
        });
    }

    // Interpolated read at a fractional index
    let table = Wavetable::from_harmonics(1024, &harmonics).unwrap();
    group.bench_function("lookup", |b| {
        let mut index = 0.0f32;
        b.iter(|| {
            index = (index + 10.3) % 1024.0;
            black_box(table.lookup(black_box(index)))
        })
    });

    group.finish();
}
