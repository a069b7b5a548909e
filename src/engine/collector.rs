//! Hand-off of timestamped MIDI from input threads to the render thread.
//!
//! [`collector`] returns a pair: the [`CollectorHandle`] goes to whatever
//! produces events (a MIDI device callback, a sequencer, a UI), the
//! [`MidiCollector`] stays with the audio callback. They share a wait-free
//! `rtrb` ring plus a few atomics, so neither side ever blocks on the other.
//!
//! Timestamps are absolute positions on the engine's sample clock. The render
//! side advances that clock by one block per [`MidiCollector::drain_window`]
//! and publishes it, so producers can stamp events with
//! [`CollectorHandle::now`].

use std::{
    sync::{
        atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use rtrb::{Consumer, PushError, Producer, RingBuffer};

use crate::io::midi::{EventBlock, MidiEvent, TimedEvent};

#[derive(Debug, Default)]
struct SharedClock {
    position: AtomicU64,
    sample_rate_bits: AtomicU32,
    dropped: AtomicU64,
    /// Events pushed but not yet handed to a block, wherever they sit.
    in_flight: AtomicUsize,
}

/// Create a connected producer/consumer pair holding up to `capacity` events.
///
/// The bound covers everything not yet delivered, in the ring and in the
/// staging list together, so the render side can always take the whole ring.
pub fn collector(capacity: usize) -> (CollectorHandle, MidiCollector) {
    let (tx, rx) = RingBuffer::<TimedEvent>::new(capacity);
    let clock = Arc::new(SharedClock::default());

    let handle = CollectorHandle {
        tx,
        capacity,
        clock: clock.clone(),
    };
    let collector = MidiCollector {
        rx,
        staged: Vec::with_capacity(capacity),
        clock,
        position: 0,
        sample_rate: 0.0,
    };

    (handle, collector)
}

/// Producer endpoint. `Send`, not `Clone`: one input source per handle.
pub struct CollectorHandle {
    tx: Producer<TimedEvent>,
    capacity: usize,
    clock: Arc<SharedClock>,
}

impl CollectorHandle {
    /// Queue `event` for sample `timestamp`. Never blocks; returns `false` and
    /// counts a drop if `capacity` events are already waiting.
    pub fn push(&mut self, event: MidiEvent, timestamp: u64) -> bool {
        if self.clock.in_flight.load(Ordering::Acquire) >= self.capacity {
            self.clock.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // counted before it becomes visible, so the consumer never goes below zero
        self.clock.in_flight.fetch_add(1, Ordering::AcqRel);
        match self.tx.push(TimedEvent::new(event, timestamp)) {
            Ok(()) => true,
            Err(PushError::Full(_)) => {
                self.clock.in_flight.fetch_sub(1, Ordering::AcqRel);
                self.clock.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Queue `event` at the engine's current clock position.
    pub fn push_now(&mut self, event: MidiEvent) -> bool {
        let now = self.now();
        self.push(event, now)
    }

    /// Decode raw MIDI bytes and queue them. Undecodable bytes return `false`
    /// without counting as a drop.
    pub fn push_raw(&mut self, bytes: &[u8], timestamp: u64) -> bool {
        match MidiEvent::from_bytes(bytes) {
            Some(event) => self.push(event, timestamp),
            None => false,
        }
    }

    /// Sample position of the next block the engine will render.
    pub fn now(&self) -> u64 {
        self.clock.position.load(Ordering::Acquire)
    }

    /// Rate set by the last engine reset, if any.
    pub fn sample_rate(&self) -> Option<f32> {
        match self.clock.sample_rate_bits.load(Ordering::Acquire) {
            0 => None,
            bits => Some(f32::from_bits(bits)),
        }
    }

    /// Timestamp `delay` after the current clock position. Before the engine
    /// has a sample rate this is simply `now()`.
    pub fn timestamp_after(&self, delay: Duration) -> u64 {
        let offset = self
            .sample_rate()
            .map(|rate| (delay.as_secs_f64() * rate as f64).round() as u64)
            .unwrap_or(0);
        self.now().saturating_add(offset)
    }

    /// Events rejected because the queue was full.
    pub fn dropped_count(&self) -> u64 {
        self.clock.dropped.load(Ordering::Relaxed)
    }

    pub fn free_slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Render-side endpoint.
///
/// Every drain moves the whole ring into a timestamp-sorted staging list.
/// The producer-side bound keeps that list within its preallocated capacity.
pub struct MidiCollector {
    rx: Consumer<TimedEvent>,
    staged: Vec<TimedEvent>,
    clock: Arc<SharedClock>,
    position: u64,
    sample_rate: f32,
}

impl MidiCollector {
    /// Rewind the clock to zero for `sample_rate` and discard everything
    /// queued against the old clock. Must run before the first drain.
    pub fn reset(&mut self, sample_rate: f32) {
        self.clear();
        self.position = 0;
        self.sample_rate = sample_rate;
        self.clock.position.store(0, Ordering::Release);
        self.clock
            .sample_rate_bits
            .store(sample_rate.to_bits(), Ordering::Release);
    }

    /// Drop staged and queued events without touching the clock.
    pub fn clear(&mut self) {
        let mut discarded = self.staged.len();
        self.staged.clear();
        while self.rx.pop().is_ok() {
            discarded += 1;
        }
        self.clock.in_flight.fetch_sub(discarded, Ordering::AcqRel);
    }

    pub fn is_ready(&self) -> bool {
        self.sample_rate > 0.0
    }

    /// Move every event due before `position + num_samples` into `out`, in
    /// timestamp order, then advance the clock by `num_samples`.
    ///
    /// Offsets are relative to the start of the window; events already in the
    /// past land at offset 0. If `out` fills up the rest stay staged.
    pub fn drain_window(&mut self, num_samples: usize, out: &mut EventBlock) {
        self.pull();

        let window_end = self.position.saturating_add(num_samples as u64);
        let mut taken = 0;
        for timed in &self.staged {
            if timed.timestamp >= window_end || out.is_full() {
                break;
            }
            let offset = timed.timestamp.saturating_sub(self.position) as usize;
            out.push(offset, timed.event);
            taken += 1;
        }
        self.staged.drain(..taken);
        self.clock.in_flight.fetch_sub(taken, Ordering::AcqRel);

        self.position = window_end;
        self.clock.position.store(window_end, Ordering::Release);
    }

    fn pull(&mut self) {
        while let Ok(timed) = self.rx.pop() {
            // after any equal timestamps, so arrival order is kept
            let at = self
                .staged
                .partition_point(|e| e.timestamp <= timed.timestamp);
            self.staged.insert(at, timed);
        }
    }

    /// Current clock position, in samples since the last reset.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Events waiting in either the staging list or the ring.
    pub fn pending(&self) -> usize {
        self.staged.len() + self.rx.slots()
    }
}
