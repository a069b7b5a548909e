/*
Tail-Off Release Envelope
=========================

The voices in this synth have no attack or decay stage. A note sounds at full
level the instant it starts and holds there until the key is released. What
shapes the end of the note is the tail-off: an exponential fade applied after
note-off.

Vocabulary
----------

  tail        Release multiplier. 0.0 while the note is held (meaning "no
              release in progress"), 1.0 at the moment of release, then
              shrinking every sample.

  decay       Per-sample factor the tail is multiplied by (0.99 by default).

  floor       Tail level at which the voice is considered silent (0.005).


The Shape
---------

  Gain
    1.0 ┌──────────────────┐
        │                  │╲
        │                  │ ╲
        │                  │  ╲__
        │                  │     ╲___
  floor └──────────────────┴─────────╲─→ Time
          Sustain           Release   Idle

After n release samples the gain is decay^n. With the defaults the floor is
crossed after ln(0.005) / ln(0.99) ≈ 528 samples, roughly 12 ms at 44.1 kHz.


State Machine
-------------

    ┌──────┐  note_on   ┌─────────┐  note_off  ┌─────────┐
    │ Idle │ ─────────→ │ Sustain │ ─────────→ │ Release │
    └──────┘            └─────────┘            └─────────┘
        ↑                                           │
        └──────────────── tail <= floor ────────────┘

A second note_off while already releasing is ignored, so the fade is never
restarted from the top.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // No note, gain 0
    Sustain, // Note held, gain 1
    Release, // Fading by `decay` each sample
}

#[derive(Debug, Clone)]
pub struct TailOff {
    decay: f32,
    floor: f32,

    stage: EnvelopeState,
    tail: f32,
}

impl TailOff {
    pub fn new(decay: f32, floor: f32) -> Self {
        Self {
            decay,
            floor,
            stage: EnvelopeState::Idle,
            tail: 0.0,
        }
    }

    /// Gate high: hold at full level with no release in progress.
    pub fn note_on(&mut self) {
        self.stage = EnvelopeState::Sustain;
        self.tail = 0.0;
    }

    /// Gate low: begin the fade. Returns `true` if a release actually started.
    pub fn note_off(&mut self) -> bool {
        if self.stage != EnvelopeState::Sustain {
            return false;
        }

        self.stage = EnvelopeState::Release;
        self.tail = 1.0;
        true
    }

    /// Gain to apply to the current sample.
    #[inline]
    pub fn gain(&self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => 0.0,
            EnvelopeState::Sustain => 1.0,
            EnvelopeState::Release => self.tail,
        }
    }

    /// Step past the current sample. Returns `true` once the fade has reached
    /// the floor and the envelope went idle.
    #[inline]
    pub fn advance(&mut self) -> bool {
        if self.stage != EnvelopeState::Release {
            return false;
        }

        self.tail *= self.decay;
        if self.tail <= self.floor {
            self.reset();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.tail = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn is_releasing(&self) -> bool {
        self.stage == EnvelopeState::Release
    }

    /// Raw release multiplier (0.0 while sustaining).
    pub fn tail(&self) -> f32 {
        self.tail
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}
