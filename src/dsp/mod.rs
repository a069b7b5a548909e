//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free once built and realtime-safe, so they
//! can live directly inside voice structs. They stay focused on the signal
//! math; note lifecycle and routing live in `synth`.

/// Tail-off release envelope.
pub mod envelope;
/// Phase-index reader over a shared wavetable.
pub mod oscillator;
/// Additive single-cycle wavetable builder.
pub mod wavetable;

pub use envelope::EnvelopeState;
