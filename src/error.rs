use std::fmt;

/// Rejected engine setup.
///
/// Every variant is detected before the first block is rendered; the render
/// path itself never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Sample rate was zero, negative or not finite.
    InvalidSampleRate(f32),
    /// Wavetable needs at least two samples to hold a cycle.
    EmptyWavetable { len: usize },
    NoHarmonics,
    /// Harmonic number zero or a non-finite weight.
    InvalidHarmonic { number: u32, weight: f32 },
    /// Absolute weight sum above 1.0 could push the table past full scale.
    UnsafeHarmonicGain { sum: f32 },
    NoVoices,
    InvalidAmplitude(f32),
    /// Tail-off decay and floor must both lie strictly between 0 and 1.
    InvalidEnvelope { decay: f32, floor: f32 },
    InvalidBendRange(f32),
    ZeroCapacity,
    InvalidBlockSize(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(rate) => {
                write!(f, "sample rate must be a positive number, got {rate}")
            }
            ConfigError::EmptyWavetable { len } => {
                write!(f, "wavetable needs at least 2 samples, got {len}")
            }
            ConfigError::NoHarmonics => write!(f, "wavetable needs at least one harmonic"),
            ConfigError::InvalidHarmonic { number, weight } => {
                write!(f, "invalid harmonic {number} with weight {weight}")
            }
            ConfigError::UnsafeHarmonicGain { sum } => write!(
                f,
                "harmonic weights sum to {sum}, which can exceed full scale (limit 1.0)"
            ),
            ConfigError::NoVoices => write!(f, "synth needs at least one voice"),
            ConfigError::InvalidAmplitude(amp) => {
                write!(f, "voice amplitude must be in (0, 1], got {amp}")
            }
            ConfigError::InvalidEnvelope { decay, floor } => write!(
                f,
                "tail-off decay {decay} and floor {floor} must both be in (0, 1)"
            ),
            ConfigError::InvalidBendRange(range) => {
                write!(f, "bend range must be within 0..=24 semitones, got {range}")
            }
            ConfigError::ZeroCapacity => write!(f, "event collector capacity must be non-zero"),
            ConfigError::InvalidBlockSize(size) => write!(f, "invalid block size {size}"),
        }
    }
}

impl std::error::Error for ConfigError {}
