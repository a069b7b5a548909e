use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use wavesynth::{io::AudioBuffer, SynthEngine, MAX_BLOCK_SIZE};

/// Open the default output device, prepare `engine` for it and start
/// playback. Audio runs until the returned stream is dropped.
pub fn start(mut engine: SynthEngine) -> EyreResult<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = output_channels(config.channels())?;
    info!(
        "output: {} ({sample_rate} Hz, {channels} channels)",
        device.name().unwrap_or_else(|_| "unknown device".into())
    );

    engine
        .prepare(MAX_BLOCK_SIZE, sample_rate)
        .wrap_err("device sample rate rejected")?;

    // stereo is enough; wider devices repeat the last channel
    let mut render_buf = AudioBuffer::new(channels.min(2), MAX_BLOCK_SIZE);

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                engine.render_block(&mut render_buf, 0, frames);

                let out_off = frames_written * channels;
                render_buf.write_interleaved(
                    frames,
                    &mut data[out_off..out_off + frames * channels],
                    channels,
                );

                frames_written += frames;
            }
        },
        |err| error!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Interleaved frame width; a device with no channels cannot be driven.
fn output_channels(reported: u16) -> EyreResult<usize> {
    match reported {
        0 => Err(eyre!("output device reports no channels")),
        n => Ok(n as usize),
    }
}
