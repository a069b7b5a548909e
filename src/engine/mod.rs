//! The render loop: owns the voice pool, the render side of the event
//! collector and the scratch event block, and turns one host callback into
//! one drained window plus one rendered block.

pub mod collector;

use std::sync::Arc;

use log::{debug, info, warn};

use self::collector::{collector, CollectorHandle, MidiCollector};
use crate::{
    config::SynthConfig,
    dsp::wavetable::Wavetable,
    error::ConfigError,
    io::{midi::EventBlock, AudioBuffer},
    synth::{PolySynth, Sound},
};

/// Everything the audio callback needs, in one place.
///
/// Construction and [`prepare`](SynthEngine::prepare) may allocate and log;
/// [`render_block`](SynthEngine::render_block) does neither.
pub struct SynthEngine {
    config: SynthConfig,
    wavetable: Arc<Wavetable>,
    synth: PolySynth,
    collector: MidiCollector,
    events: EventBlock,
    expected_block_size: usize,
}

impl SynthEngine {
    /// Build the engine and the producer handle that feeds it.
    ///
    /// The engine renders silence until [`prepare`](SynthEngine::prepare) has
    /// supplied a sample rate.
    pub fn new(config: SynthConfig) -> Result<(Self, CollectorHandle), ConfigError> {
        if let Err(err) = config.validate() {
            warn!("rejected synth configuration: {err}");
            return Err(err);
        }

        let wavetable = Arc::new(Wavetable::from_harmonics(
            config.table_size,
            &config.harmonics,
        )?);
        let synth = PolySynth::new(wavetable.clone(), &config)?;
        let (handle, collector) = collector(config.collector_capacity);
        let events = EventBlock::with_capacity(config.collector_capacity);

        info!(
            "wavetable synth ready: {} voices, {}-sample table",
            config.max_voices, config.table_size
        );
        debug!(
            "harmonics {:?}, peak {:.3}, stealing {:?}, queue {} events",
            config.harmonics,
            wavetable.peak(),
            config.stealing,
            config.collector_capacity
        );

        let engine = Self {
            expected_block_size: config.max_block_size,
            config,
            wavetable,
            synth,
            collector,
            events,
        };
        Ok((engine, handle))
    }

    /// Set the sample rate and rewind the event clock. Call once before the
    /// first block and again whenever the device rate changes; sounding notes
    /// are cut and queued events discarded.
    pub fn prepare(
        &mut self,
        expected_block_size: usize,
        sample_rate: f32,
    ) -> Result<(), ConfigError> {
        if expected_block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(expected_block_size));
        }
        self.synth.set_sample_rate(sample_rate)?;
        self.collector.reset(sample_rate);
        self.expected_block_size = expected_block_size;

        info!("prepared at {sample_rate} Hz, blocks of up to {expected_block_size} frames");
        Ok(())
    }

    /// Fill `num_samples` frames of `buffer` from `start_sample` on every
    /// channel.
    ///
    /// The region is cleared first, so the output is exactly the voice mix.
    /// A region reaching past the buffer is cut to fit, and the event clock
    /// advances only by the frames actually rendered. Unprepared engines
    /// leave it silent and do not advance the clock.
    pub fn render_block(&mut self, buffer: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        let range = buffer.clip(start_sample, num_samples);
        buffer.clear_region(range.start, range.len());
        if !self.collector.is_ready() {
            return;
        }

        self.events.clear();
        self.collector.drain_window(range.len(), &mut self.events);
        self.synth
            .render_next_block(buffer, self.events.as_slice(), range.start, range.len());
    }

    /// Stop every voice at once and forget pending events. The engine stays
    /// prepared.
    pub fn release_resources(&mut self) {
        self.synth.all_notes_off(None, false);
        self.collector.clear();
        self.events.clear();
        debug!("released voices and pending events");
    }

    pub fn set_sound(&mut self, sound: Sound) {
        self.synth.set_sound(sound);
    }

    pub fn is_prepared(&self) -> bool {
        self.collector.is_ready()
    }

    pub fn sample_rate(&self) -> f32 {
        self.collector.sample_rate()
    }

    pub fn expected_block_size(&self) -> usize {
        self.expected_block_size
    }

    /// Samples rendered since the last [`prepare`](SynthEngine::prepare).
    pub fn position(&self) -> u64 {
        self.collector.position()
    }

    pub fn synth(&self) -> &PolySynth {
        &self.synth
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn wavetable(&self) -> &Arc<Wavetable> {
        &self.wavetable
    }
}
