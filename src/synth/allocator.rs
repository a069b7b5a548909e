//! Voice selection for incoming notes.
//!
//! A free voice is always preferred, lowest index first. When every voice is
//! busy the [`StealingStrategy`] picks a victim; every strategy is
//! deterministic and breaks ties by voice index, so the same event sequence
//! always steals the same voice.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::synth::{sound::Sound, voice::WavetableVoice};

/// Which busy voice to reuse when the pool is full.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StealingStrategy {
    /// Steal the voice whose note started longest ago.
    #[default]
    Oldest,
    /// Prefer the oldest voice already in its tail-off, then fall back to
    /// `Oldest`.
    Released,
    /// Steal the voice currently rendering at the lowest gain.
    Quietest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    Free(usize),
    Stolen(usize),
}

impl Allocation {
    pub fn index(self) -> usize {
        match self {
            Allocation::Free(idx) | Allocation::Stolen(idx) => idx,
        }
    }
}

/// Pick a voice able to play `sound`. `None` only when no voice can.
pub fn allocate(
    voices: &[WavetableVoice],
    sound: &Sound,
    strategy: StealingStrategy,
) -> Option<Allocation> {
    let candidates = || {
        voices
            .iter()
            .enumerate()
            .filter(move |(_, v)| v.can_play(sound))
    };

    if let Some((idx, _)) = candidates().find(|(_, v)| v.is_free()) {
        return Some(Allocation::Free(idx));
    }

    let oldest = || candidates().min_by_key(|(_, v)| v.age()).map(|(idx, _)| idx);

    let victim = match strategy {
        StealingStrategy::Oldest => oldest(),
        StealingStrategy::Released => candidates()
            .filter(|(_, v)| v.is_releasing())
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx)
            .or_else(oldest),
        StealingStrategy::Quietest => candidates()
            .min_by(|(_, a), (_, b)| a.current_gain().total_cmp(&b.current_gain()))
            .map(|(idx, _)| idx),
    };

    victim.map(Allocation::Stolen)
}
