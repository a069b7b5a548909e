use std::sync::Arc;

use crate::dsp::wavetable::Wavetable;

/// Phase-accumulating reader over a shared [`Wavetable`].
///
/// `index` is the fractional read position in table cells and always stays in
/// `[0, table.len())`. `delta` is how many cells to advance per output sample;
/// zero means the oscillator is stopped and no table reads happen.
#[derive(Debug, Clone)]
pub struct WavetableOscillator {
    table: Arc<Wavetable>,
    index: f32,
    delta: f32,
}

impl WavetableOscillator {
    pub fn new(table: Arc<Wavetable>) -> Self {
        Self {
            table,
            index: 0.0,
            delta: 0.0,
        }
    }

    /// Rewind to the start of the cycle.
    pub fn reset(&mut self) {
        self.index = 0.0;
    }

    /// Derive the per-sample step so one pass over the table lasts one period
    /// of `frequency`.
    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        let delta = frequency * self.table.len() as f32 / sample_rate;
        self.delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            0.0
        };
    }

    pub fn stop(&mut self) {
        self.delta = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.delta != 0.0
    }

    pub fn index(&self) -> f32 {
        self.index
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn table(&self) -> &Arc<Wavetable> {
        &self.table
    }

    /// Read the interpolated sample at the current index, then advance.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.delta == 0.0 {
            return 0.0;
        }

        let value = self.table.lookup(self.index);
        // rem_euclid also covers steps longer than the table itself
        self.index = (self.index + self.delta).rem_euclid(self.table.len() as f32);
        value
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_osc(len: usize) -> WavetableOscillator {
        WavetableOscillator::new(Arc::new(Wavetable::sine(len).unwrap()))
    }

    #[test]
    fn delta_matches_table_over_sample_rate() {
        let mut osc = sine_osc(1024);
        osc.set_frequency(440.0, 44_100.0);
        let expected = 440.0 * 1024.0 / 44_100.0;
        assert!((osc.delta() - expected).abs() < 1e-5);
    }

    #[test]
    fn stopped_oscillator_is_silent() {
        let mut osc = sine_osc(256);
        let mut buffer = vec![1.0f32; 32];
        osc.render(&mut buffer);

        assert!(!osc.is_running());
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert_eq!(osc.index(), 0.0);
    }

    #[test]
    fn index_wraps_even_when_step_exceeds_table() {
        let mut osc = sine_osc(64);
        // 3.5 table lengths per sample
        osc.set_frequency(3_500.0, 1_000.0);
        assert!(osc.delta() > 64.0);

        for _ in 0..1_000 {
            let sample = osc.next_sample();
            assert!(sample.is_finite());
            assert!(
                (0.0..64.0).contains(&osc.index()),
                "index escaped: {}",
                osc.index()
            );
        }
    }

    #[test]
    fn non_finite_frequency_stops_the_oscillator() {
        let mut osc = sine_osc(64);
        osc.set_frequency(440.0, 48_000.0);
        assert!(osc.is_running());

        osc.set_frequency(f32::NAN, 48_000.0);
        assert!(!osc.is_running());

        osc.set_frequency(440.0, 0.0);
        assert!(!osc.is_running());
    }
}
