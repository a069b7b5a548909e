//! Real-world scenario benchmarks.
//!
//! Single voices as the pool renders them, and the full engine with events
//! arriving through the collector.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
