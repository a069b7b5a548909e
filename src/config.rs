//! Constructor-time engine parameters.
//!
//! Nothing here changes once the engine is built. `validate` runs before any
//! table or voice is allocated so configuration mistakes never reach the
//! render path.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::wavetable::Harmonic, error::ConfigError, synth::allocator::StealingStrategy};

/// Largest pitch-bend range accepted, in semitones (two octaves).
const MAX_BEND_SEMITONES: f32 = 24.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Number of samples in the single-cycle table.
    pub table_size: usize,
    /// Harmonic recipe summed into the table.
    pub harmonics: Vec<Harmonic>,
    /// Size of the voice pool.
    pub max_voices: usize,
    /// Headroom scalar applied on top of velocity.
    pub amplitude: f32,
    /// Per-sample multiplier of the tail-off while releasing.
    pub tail_off_decay: f32,
    /// Tail-off level at which a releasing voice goes idle.
    pub tail_off_floor: f32,
    /// Pitch-wheel swing in each direction, in semitones.
    pub pitch_wheel_semitones: f32,
    /// Pitch rise at full aftertouch, in semitones.
    pub aftertouch_semitones: f32,
    pub stealing: StealingStrategy,
    /// Events the collector can hold between two blocks.
    pub collector_capacity: usize,
    /// Largest block the host may ask for in one call.
    pub max_block_size: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            table_size: 1024,
            harmonics: vec![
                Harmonic::new(1, 0.5),
                Harmonic::new(3, 0.1),
                Harmonic::new(5, 0.05),
                Harmonic::new(7, 0.125),
                Harmonic::new(9, 0.09),
            ],
            max_voices: 4,
            amplitude: 0.15,
            tail_off_decay: 0.99,
            tail_off_floor: 0.005,
            pitch_wheel_semitones: 1.0,
            aftertouch_semitones: 2.0,
            stealing: StealingStrategy::Oldest,
            collector_capacity: 512,
            max_block_size: crate::MAX_BLOCK_SIZE,
        }
    }
}

impl SynthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    pub fn with_harmonics(mut self, harmonics: impl Into<Vec<Harmonic>>) -> Self {
        self.harmonics = harmonics.into();
        self
    }

    pub fn with_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set the release shape: per-sample `decay` factor and the `floor` at
    /// which the voice is freed.
    pub fn with_tail_off(mut self, decay: f32, floor: f32) -> Self {
        self.tail_off_decay = decay;
        self.tail_off_floor = floor;
        self
    }

    pub fn with_pitch_wheel_range(mut self, semitones: f32) -> Self {
        self.pitch_wheel_semitones = semitones;
        self
    }

    pub fn with_aftertouch_range(mut self, semitones: f32) -> Self {
        self.aftertouch_semitones = semitones;
        self
    }

    pub fn with_stealing(mut self, stealing: StealingStrategy) -> Self {
        self.stealing = stealing;
        self
    }

    pub fn with_collector_capacity(mut self, capacity: usize) -> Self {
        self.collector_capacity = capacity;
        self
    }

    pub fn with_max_block_size(mut self, frames: usize) -> Self {
        self.max_block_size = frames;
        self
    }

    /// Sum of absolute harmonic weights; an upper bound on the table peak.
    pub fn harmonic_gain(&self) -> f32 {
        self.harmonics.iter().map(|h| h.weight.abs()).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_size < 2 {
            return Err(ConfigError::EmptyWavetable {
                len: self.table_size,
            });
        }
        if self.harmonics.is_empty() {
            return Err(ConfigError::NoHarmonics);
        }
        if let Some(bad) = self
            .harmonics
            .iter()
            .find(|h| h.number == 0 || !h.weight.is_finite())
        {
            return Err(ConfigError::InvalidHarmonic {
                number: bad.number,
                weight: bad.weight,
            });
        }
        let sum = self.harmonic_gain();
        if sum > 1.0 {
            return Err(ConfigError::UnsafeHarmonicGain { sum });
        }
        if self.max_voices == 0 {
            return Err(ConfigError::NoVoices);
        }
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(ConfigError::InvalidAmplitude(self.amplitude));
        }
        let unit = |x: f32| x > 0.0 && x < 1.0;
        if !unit(self.tail_off_decay) || !unit(self.tail_off_floor) {
            return Err(ConfigError::InvalidEnvelope {
                decay: self.tail_off_decay,
                floor: self.tail_off_floor,
            });
        }
        for range in [self.pitch_wheel_semitones, self.aftertouch_semitones] {
            if !(0.0..=MAX_BEND_SEMITONES).contains(&range) {
                return Err(ConfigError::InvalidBendRange(range));
            }
        }
        if self.collector_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(self.max_block_size));
        }
        Ok(())
    }
}
