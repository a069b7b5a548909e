use crate::io::converter::MIDI_MAX;

/// What the voice pool is allowed to play, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sound {
    /// The shared wavetable on every note of every channel.
    #[default]
    Wavetable,
    /// The shared wavetable inside a key range on a single channel.
    WavetableZone {
        low_note: u8,
        high_note: u8,
        channel: u8,
    },
    /// Accepts no notes. Sounding voices finish normally.
    Muted,
}

impl Sound {
    pub fn applies_to_note(&self, note: u8) -> bool {
        match *self {
            Sound::Wavetable => note <= MIDI_MAX,
            Sound::WavetableZone {
                low_note,
                high_note,
                ..
            } => (low_note..=high_note).contains(&note),
            Sound::Muted => false,
        }
    }

    pub fn applies_to_channel(&self, channel: u8) -> bool {
        match *self {
            Sound::Wavetable => channel < 16,
            Sound::WavetableZone { channel: own, .. } => own == channel,
            Sound::Muted => false,
        }
    }

    /// Whether this sound reads from the wavetable.
    pub fn uses_wavetable(&self) -> bool {
        matches!(self, Sound::Wavetable | Sound::WavetableZone { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omni_sound_accepts_every_note_and_channel() {
        let sound = Sound::Wavetable;
        assert!((0..=127).all(|n| sound.applies_to_note(n)));
        assert!((0..16).all(|c| sound.applies_to_channel(c)));
        assert!(!sound.applies_to_note(128));
    }

    #[test]
    fn zone_limits_keys_and_channel() {
        let sound = Sound::WavetableZone {
            low_note: 48,
            high_note: 72,
            channel: 1,
        };
        assert!(sound.applies_to_note(48) && sound.applies_to_note(72));
        assert!(!sound.applies_to_note(47) && !sound.applies_to_note(73));
        assert!(sound.applies_to_channel(1));
        assert!(!sound.applies_to_channel(0));
    }

    #[test]
    fn muted_sound_accepts_nothing() {
        assert!(!Sound::Muted.applies_to_note(60));
        assert!(!Sound::Muted.applies_to_channel(0));
        assert!(!Sound::Muted.uses_wavetable());
    }
}
