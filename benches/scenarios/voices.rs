//! Benchmarks for single voices and the voice pool.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use wavesynth::{
    dsp::wavetable::Wavetable,
    io::AudioBuffer,
    synth::{voice::VoiceParams, PolySynth, WavetableVoice},
    SynthConfig,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = SynthConfig::default();
    let table = Arc::new(Wavetable::from_harmonics(config.table_size, &config.harmonics).unwrap());

    for &size in BLOCK_SIZES {
        let mut stereo = AudioBuffer::new(2, size);

        // === ONE HELD VOICE ===
        // A2, the baseline cost of a sounding note
        let mut voice = WavetableVoice::new(table.clone(), VoiceParams::from(&config), SAMPLE_RATE);
        voice.start_note(0, 45, 0.8, 8192, 0);
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, &size| {
            b.iter(|| {
                stereo.clear();
                voice.render_next_block(black_box(&mut stereo), 0, size);
            })
        });

        // === FULL POOL ===
        // all four voices sounding, no events
        let mut pool = PolySynth::new(table.clone(), &config).unwrap();
        pool.set_sample_rate(SAMPLE_RATE).unwrap();
        for key in [48, 55, 64, 71] {
            pool.note_on(0, key, 100);
        }
        group.bench_with_input(BenchmarkId::new("pool_4", size), &size, |b, &size| {
            b.iter(|| {
                stereo.clear();
                pool.render_next_block(black_box(&mut stereo), &[], 0, size);
            })
        });
    }

    group.finish();
}
