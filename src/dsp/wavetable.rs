#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::ConfigError;

/*
Additive Wavetable
==================

A wavetable holds exactly one cycle of a waveform. Oscillators play it back by
stepping through the table at a rate proportional to the note frequency, so a
single table serves every pitch.

The cycle is built by summing sine partials:

    table[i] = Σ weight_h · sin(2π · h · i / (N - 1))      for i in 0..N

Odd-only recipes (1, 3, 5, 7, 9) give the hollow, clarinet-like colour of a
softened square wave. The divisor is N - 1, so the last sample lands back on the
start of the cycle.

Gain
----

The sum is NOT rescaled. Its peak is bounded by Σ |weight|, which is why the
engine configuration refuses recipes whose weights add up to more than 1.0.
This builder stays a pure function of its inputs.
*/

/// One partial of the additive recipe.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    /// Multiple of the fundamental (1 = fundamental).
    pub number: u32,
    pub weight: f32,
}

impl Harmonic {
    pub const fn new(number: u32, weight: f32) -> Self {
        Self { number, weight }
    }
}

/// Immutable single-cycle mono table, shared read-only by every voice.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    samples: Box<[f32]>,
}

impl Wavetable {
    /// Build a table of `len` samples from weighted harmonics.
    pub fn from_harmonics(len: usize, harmonics: &[Harmonic]) -> Result<Self, ConfigError> {
        if len < 2 {
            return Err(ConfigError::EmptyWavetable { len });
        }
        if harmonics.is_empty() {
            return Err(ConfigError::NoHarmonics);
        }

        let mut samples = vec![0.0f32; len];
        let period = (len - 1) as f64;

        for harmonic in harmonics {
            if harmonic.number == 0 || !harmonic.weight.is_finite() {
                return Err(ConfigError::InvalidHarmonic {
                    number: harmonic.number,
                    weight: harmonic.weight,
                });
            }

            let angle_delta = TAU * harmonic.number as f64 / period;
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample += (angle_delta * i as f64).sin() as f32 * harmonic.weight;
            }
        }

        Ok(Self {
            samples: samples.into_boxed_slice(),
        })
    }

    /// Pure sine cycle at unit amplitude.
    pub fn sine(len: usize) -> Result<Self, ConfigError> {
        Self::from_harmonics(len, &[Harmonic::new(1, 1.0)])
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }

    /// Linearly interpolated read at a fractional index.
    ///
    /// The upper neighbour of the last cell is cell 0. `index` is expected in
    /// `[0, len)`; anything outside is pinned to the nearest cell.
    #[inline]
    pub fn lookup(&self, index: f32) -> f32 {
        let last = self.samples.len() - 1;
        let index = index.max(0.0);
        let index0 = (index as usize).min(last);
        let index1 = if index0 == last { 0 } else { index0 + 1 };
        let frac = (index - index0 as f32).clamp(0.0, 1.0);

        let value0 = self.samples[index0];
        let value1 = self.samples[index1];
        value0 + frac * (value1 - value0)
    }
}
