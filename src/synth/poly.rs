use std::sync::Arc;

use crate::{
    config::SynthConfig,
    dsp::wavetable::Wavetable,
    error::ConfigError,
    io::{
        converter::{velocity_to_gain, MIDI_MAX},
        midi::{cc, BlockEvent, MidiEvent, PITCH_BEND_MAX},
        AudioBuffer,
    },
    synth::{
        allocator::{allocate, Allocation, StealingStrategy},
        sound::Sound,
        voice::{VoiceParams, WavetableVoice, DEFAULT_PITCH_WHEEL},
    },
};

const MIDI_CHANNELS: usize = 16;

/// Fixed pool of wavetable voices sharing one [`Sound`].
///
/// Every method here runs on the render thread and none of them allocate.
pub struct PolySynth {
    voices: Vec<WavetableVoice>,
    sound: Sound,
    stealing: StealingStrategy,
    sample_rate: f32,
    note_counter: u64,
    pitch_wheel: u16,
    sustain_pedal: [bool; MIDI_CHANNELS],
    stolen: u64,
}

impl PolySynth {
    /// Build the pool. Voices stay silent until [`set_sample_rate`] is called.
    ///
    /// [`set_sample_rate`]: PolySynth::set_sample_rate
    pub fn new(table: Arc<Wavetable>, config: &SynthConfig) -> Result<Self, ConfigError> {
        if config.max_voices == 0 {
            return Err(ConfigError::NoVoices);
        }

        let params = VoiceParams::from(config);
        let voices = (0..config.max_voices)
            .map(|_| WavetableVoice::new(table.clone(), params, 0.0))
            .collect();

        Ok(Self {
            voices,
            sound: Sound::default(),
            stealing: config.stealing,
            sample_rate: 0.0,
            note_counter: 0,
            pitch_wheel: DEFAULT_PITCH_WHEEL,
            sustain_pedal: [false; MIDI_CHANNELS],
            stolen: 0,
        })
    }

    /// Switch sample rate. Sounding notes are cut.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), ConfigError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }

        self.all_notes_off(None, false);
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
        Ok(())
    }

    pub fn set_sound(&mut self, sound: Sound) {
        self.sound = sound;
    }

    pub fn handle_event(&mut self, event: &MidiEvent) {
        match *event {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => self.note_on(channel, key, velocity),
            MidiEvent::NoteOff { channel, key, .. } => self.note_off(channel, key, true),
            MidiEvent::PitchBend { value, .. } => self.pitch_wheel(value),
            MidiEvent::ChannelPressure { pressure, .. } => self.channel_pressure(pressure),
            MidiEvent::PolyAftertouch {
                channel,
                key,
                pressure,
            } => self.poly_aftertouch(channel, key, pressure),
            MidiEvent::ControlChange {
                channel,
                controller,
                value,
            } => self.controller(channel, controller, value),
        }
    }

    /// Start `key` on a free voice, or steal one.
    ///
    /// Out-of-range keys and channels are dropped. A key already sounding on
    /// the same channel is restarted on its own voice.
    pub fn note_on(&mut self, channel: u8, key: u8, velocity: u8) {
        if key > MIDI_MAX || channel as usize >= MIDI_CHANNELS {
            return;
        }
        if velocity == 0 {
            self.note_off(channel, key, true);
            return;
        }
        if !self.sound.applies_to_note(key) || !self.sound.applies_to_channel(channel) {
            return;
        }

        let retrigger = self
            .voices
            .iter()
            .position(|v| v.is_active() && v.is_playing(channel, key));

        let idx = match retrigger {
            Some(idx) => idx,
            None => {
                let Some(allocation) = allocate(&self.voices, &self.sound, self.stealing) else {
                    return;
                };
                if let Allocation::Stolen(_) = allocation {
                    self.stolen += 1;
                }
                allocation.index()
            }
        };

        let age = self.note_counter;
        self.note_counter += 1;
        let pitch_wheel = self.pitch_wheel;
        self.voices[idx].start_note(channel, key, velocity_to_gain(velocity), pitch_wheel, age);
    }

    /// Release `key` on `channel`. Held by the sustain pedal if it is down.
    pub fn note_off(&mut self, channel: u8, key: u8, allow_tail_off: bool) {
        let pedal_down = self
            .sustain_pedal
            .get(channel as usize)
            .copied()
            .unwrap_or(false);

        for voice in &mut self.voices {
            if voice.is_active() && voice.is_key_down() && voice.is_playing(channel, key) {
                voice.set_key_down(false);
                if !pedal_down {
                    voice.stop_note(allow_tail_off);
                }
            }
        }
    }

    /// Bend every sounding voice; new notes start at this position too.
    pub fn pitch_wheel(&mut self, value: u16) {
        self.pitch_wheel = value.min(PITCH_BEND_MAX);
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.pitch_wheel_moved(self.pitch_wheel);
        }
    }

    pub fn channel_pressure(&mut self, pressure: u8) {
        let pressure = pressure.min(MIDI_MAX);
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.aftertouch_changed(pressure);
        }
    }

    pub fn poly_aftertouch(&mut self, channel: u8, key: u8, pressure: u8) {
        let pressure = pressure.min(MIDI_MAX);
        for voice in &mut self.voices {
            if voice.is_active() && voice.is_playing(channel, key) {
                voice.aftertouch_changed(pressure);
            }
        }
    }

    /// Sustain pedal and the channel-mode "off" messages; other controllers
    /// are ignored.
    pub fn controller(&mut self, channel: u8, controller: u8, value: u8) {
        match controller {
            cc::SUSTAIN_PEDAL => self.sustain_pedal(channel, value >= 64),
            cc::ALL_SOUND_OFF => self.all_notes_off(Some(channel), false),
            cc::ALL_NOTES_OFF => self.all_notes_off(Some(channel), true),
            _ => {}
        }
    }

    pub fn sustain_pedal(&mut self, channel: u8, down: bool) {
        let Some(pedal) = self.sustain_pedal.get_mut(channel as usize) else {
            return;
        };
        *pedal = down;

        if !down {
            for voice in &mut self.voices {
                if voice.is_active() && voice.channel() == channel && !voice.is_key_down() {
                    voice.stop_note(true);
                }
            }
        }
    }

    /// Release every voice, or only those on `channel`.
    pub fn all_notes_off(&mut self, channel: Option<u8>, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() && channel.map_or(true, |c| voice.channel() == c) {
                voice.set_key_down(false);
                voice.stop_note(allow_tail_off);
            }
        }

        match channel {
            Some(c) => {
                if let Some(pedal) = self.sustain_pedal.get_mut(c as usize) {
                    *pedal = false;
                }
            }
            None => self.sustain_pedal = [false; MIDI_CHANNELS],
        }
    }

    /// Render `num_samples` frames from `start_sample`, applying each event at
    /// its offset within the block.
    ///
    /// Voices are mixed on top of whatever `out` already holds. Events whose
    /// offset lies past the block are applied after the last frame.
    pub fn render_next_block(
        &mut self,
        out: &mut AudioBuffer,
        events: &[BlockEvent],
        start_sample: usize,
        num_samples: usize,
    ) {
        let range = out.clip(start_sample, num_samples);
        let mut position = range.start;

        for block_event in events {
            let at = range
                .start
                .saturating_add(block_event.offset)
                .min(range.end);
            if at > position {
                self.render_voices(out, position, at - position);
                position = at;
            }
            self.handle_event(&block_event.event);
        }

        if position < range.end {
            self.render_voices(out, position, range.end - position);
        }
    }

    fn render_voices(&mut self, out: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.render_next_block(out, start_sample, num_samples);
        }
    }

    pub fn voices(&self) -> &[WavetableVoice] {
        &self.voices
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Notes that had to take over a busy voice since construction.
    pub fn stolen_count(&self) -> u64 {
        self.stolen
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn sound(&self) -> Sound {
        self.sound
    }

    pub fn stealing(&self) -> StealingStrategy {
        self.stealing
    }

    pub fn is_sustain_pedal_down(&self, channel: u8) -> bool {
        self.sustain_pedal
            .get(channel as usize)
            .copied()
            .unwrap_or(false)
    }
}
