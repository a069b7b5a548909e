//! wavesynth - plays a short scripted progression through the default output
//! device.
//!
//! Run with: cargo run -- [seconds]

mod audio;
mod score;

use std::time::Duration;

use color_eyre::eyre::WrapErr;
use log::info;
use wavesynth::{SynthConfig, SynthEngine};

const DEFAULT_SECONDS: u64 = 16;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let seconds = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .wrap_err_with(|| format!("expected a duration in seconds, got {arg:?}"))?,
        None => DEFAULT_SECONDS,
    };

    let (engine, mut handle) =
        SynthEngine::new(SynthConfig::default()).wrap_err("invalid synth configuration")?;

    let _stream = audio::start(engine)?;

    score::play(&mut handle, Duration::from_secs(seconds));

    info!(
        "done, {} events dropped by a full queue",
        handle.dropped_count()
    );
    Ok(())
}
