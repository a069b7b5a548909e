// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

/// Planar multichannel sample buffer.
///
/// Sized once at setup; every method used while rendering works in place and
/// never reallocates.
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    num_samples: usize,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
            num_samples,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    /// Zero `num` frames starting at `start`, clipped to the buffer.
    pub fn clear_region(&mut self, start: usize, num: usize) {
        let range = self.clip(start, num);
        for channel in &mut self.channels {
            channel[range.clone()].fill(0.0);
        }
    }

    #[inline]
    pub fn add_sample(&mut self, channel: usize, index: usize, value: f32) {
        self.channels[channel][index] += value;
    }

    /// Mix a mono sample into every channel at `index`.
    #[inline]
    pub fn add_to_all_channels(&mut self, index: usize, value: f32) {
        for channel in &mut self.channels {
            channel[index] += value;
        }
    }

    /// Clamp a `(start, num)` window to the buffer bounds.
    pub fn clip(&self, start: usize, num: usize) -> std::ops::Range<usize> {
        let start = start.min(self.num_samples);
        let end = start.saturating_add(num).min(self.num_samples);
        start..end
    }

    /// Copy `frames` frames from the start of the buffer into an interleaved
    /// device buffer. Extra device channels repeat the last buffer channel.
    pub fn write_interleaved(&self, frames: usize, out: &mut [f32], out_channels: usize) {
        if out_channels == 0 || self.channels.is_empty() {
            return;
        }

        let frames = frames.min(self.num_samples).min(out.len() / out_channels);
        let last = self.channels.len() - 1;
        for (frame, slot) in out.chunks_exact_mut(out_channels).take(frames).enumerate() {
            for (ch, value) in slot.iter_mut().enumerate() {
                *value = self.channels[ch.min(last)][frame];
            }
        }
    }
}
