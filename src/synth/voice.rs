use std::sync::Arc;

use crate::{
    config::SynthConfig,
    dsp::{envelope::TailOff, oscillator::WavetableOscillator, wavetable::Wavetable},
    io::{
        converter::{
            midi_note_to_freq, normalize_aftertouch, normalize_pitch_wheel, semitones_to_ratio,
        },
        midi::PITCH_BEND_CENTRE,
        AudioBuffer,
    },
    synth::sound::Sound,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Playing at full level
    Releasing, // Key released, tail-off fading
}

/// Per-voice constants taken from the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    pub amplitude: f32,
    pub tail_off_decay: f32,
    pub tail_off_floor: f32,
    pub pitch_wheel_semitones: f32,
    pub aftertouch_semitones: f32,
}

impl From<&SynthConfig> for VoiceParams {
    fn from(config: &SynthConfig) -> Self {
        Self {
            amplitude: config.amplitude,
            tail_off_decay: config.tail_off_decay,
            tail_off_floor: config.tail_off_floor,
            pitch_wheel_semitones: config.pitch_wheel_semitones,
            aftertouch_semitones: config.aftertouch_semitones,
        }
    }
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self::from(&SynthConfig::default())
    }
}

/// One oscillator plus tail-off, playing at most one note at a time.
pub struct WavetableVoice {
    note: Option<u8>,
    channel: u8,
    velocity: f32,
    state: VoiceState,
    age: u64,
    key_down: bool,
    sample_rate: f32,

    base_frequency: f32,
    wheel_semitones: f32,
    pressure_semitones: f32,
    level: f32,

    params: VoiceParams,
    osc: WavetableOscillator,
    tail_off: TailOff,
}

impl WavetableVoice {
    pub fn new(table: Arc<Wavetable>, params: VoiceParams, sample_rate: f32) -> Self {
        Self {
            note: None,
            channel: 0,
            velocity: 0.0,
            state: VoiceState::Free,
            age: 0,
            key_down: false,
            sample_rate,
            base_frequency: 0.0,
            wheel_semitones: 0.0,
            pressure_semitones: 0.0,
            level: 0.0,
            params,
            osc: WavetableOscillator::new(table),
            tail_off: TailOff::new(params.tail_off_decay, params.tail_off_floor),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        if self.is_active() {
            self.update_frequency();
        }
    }

    pub fn can_play(&self, sound: &Sound) -> bool {
        sound.uses_wavetable()
    }

    /// Begin `note` from the top of the cycle at `velocity` (0.0-1.0).
    ///
    /// `pitch_wheel` is the current wheel position so a note started with the
    /// wheel held off-centre sounds bent right away. `age` orders voices for
    /// stealing.
    pub fn start_note(&mut self, channel: u8, note: u8, velocity: f32, pitch_wheel: u16, age: u64) {
        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.note = Some(note);
        self.channel = channel;
        self.velocity = velocity;
        self.age = age;
        self.key_down = true;
        self.state = VoiceState::Active;

        self.level = velocity * self.params.amplitude;
        self.base_frequency = midi_note_to_freq(note);
        self.pressure_semitones = 0.0;
        self.pitch_wheel_moved(pitch_wheel);

        self.osc.reset();
        self.tail_off.note_on();

        if !self.osc.is_running() {
            // e.g. no valid sample rate yet
            self.clear_current_note();
        }
    }

    /// Release the note, fading out if `allow_tail_off`, otherwise silencing
    /// it before the next sample.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        if self.state == VoiceState::Free {
            return;
        }

        if allow_tail_off {
            if self.tail_off.note_off() {
                self.state = VoiceState::Releasing;
            }
        } else {
            self.clear_current_note();
        }
    }

    /// Bend by up to the configured wheel range in either direction.
    pub fn pitch_wheel_moved(&mut self, value: u16) {
        self.wheel_semitones = normalize_pitch_wheel(value) * self.params.pitch_wheel_semitones;
        self.update_frequency();
    }

    /// Raise pitch by up to the configured aftertouch range.
    pub fn aftertouch_changed(&mut self, value: u8) {
        self.pressure_semitones = normalize_aftertouch(value) * self.params.aftertouch_semitones;
        self.update_frequency();
    }

    /// Mix up to `num_samples` frames into `out` starting at `start_sample`.
    ///
    /// Adds into every channel so voices sum. A releasing voice that reaches
    /// the tail-off floor frees itself and stops writing mid-block.
    pub fn render_next_block(&mut self, out: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        if !self.osc.is_running() {
            return;
        }

        // Pitch changes take effect from the start of each block
        self.update_frequency();

        for position in out.clip(start_sample, num_samples) {
            let sample = self.osc.next_sample() * self.level * self.tail_off.gain();
            out.add_to_all_channels(position, sample);

            if self.tail_off.advance() {
                self.clear_current_note();
                break;
            }
        }
    }

    fn update_frequency(&mut self) {
        let frequency = self.frequency();
        self.osc.set_frequency(frequency, self.sample_rate);
    }

    fn clear_current_note(&mut self) {
        self.note = None;
        self.state = VoiceState::Free;
        self.key_down = false;
        self.level = 0.0;
        self.osc.stop();
        self.tail_off.reset();
    }

    /// Effective frequency after wheel and pressure.
    pub fn frequency(&self) -> f32 {
        self.base_frequency * self.pitch_shift()
    }

    pub fn pitch_shift(&self) -> f32 {
        semitones_to_ratio(self.wheel_semitones + self.pressure_semitones)
    }

    /// Gain the next sample will be rendered at.
    pub fn current_gain(&self) -> f32 {
        self.level * self.tail_off.gain()
    }

    pub fn is_playing(&self, channel: u8, note: u8) -> bool {
        self.note == Some(note) && self.channel == channel
    }

    pub fn set_key_down(&mut self, down: bool) {
        self.key_down = down;
    }

    pub fn is_key_down(&self) -> bool {
        self.key_down
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn is_releasing(&self) -> bool {
        self.state == VoiceState::Releasing
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn table_delta(&self) -> f32 {
        self.osc.delta()
    }
}

impl std::fmt::Debug for WavetableVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavetableVoice")
            .field("note", &self.note)
            .field("channel", &self.channel)
            .field("state", &self.state)
            .field("age", &self.age)
            .field("gain", &self.current_gain())
            .finish()
    }
}

/// Wheel position a fresh voice assumes.
pub const DEFAULT_PITCH_WHEEL: u16 = PITCH_BEND_CENTRE;
