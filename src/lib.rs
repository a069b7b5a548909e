pub mod config;
pub mod dsp;
pub mod engine; // Render loop and event collection
pub mod error;
pub mod io;
pub mod synth; // Voices and polyphony

pub use config::SynthConfig;
pub use engine::{collector::CollectorHandle, SynthEngine};
pub use error::ConfigError;

pub const MAX_BLOCK_SIZE: usize = 2048;
