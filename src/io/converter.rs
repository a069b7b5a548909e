use crate::io::midi::{PITCH_BEND_CENTRE, PITCH_BEND_MAX};

/// Highest valid MIDI note / 7-bit data value.
pub const MIDI_MAX: u8 = 127;

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69. Notes above 127 are pinned to 127.
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    let note = note.min(MIDI_MAX);
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// MIDI velocity (0-127) to linear gain (0.0-1.0).
#[inline]
pub fn velocity_to_gain(velocity: u8) -> f32 {
    velocity.min(MIDI_MAX) as f32 / MIDI_MAX as f32
}

/// Map a 14-bit wheel position to -1.0..=1.0.
///
/// The two halves are scaled separately so that 0 and 16383 both reach full
/// deflection and 8192 is exactly zero.
#[inline]
pub fn normalize_pitch_wheel(value: u16) -> f32 {
    let value = value.min(PITCH_BEND_MAX) as f32;
    let centre = PITCH_BEND_CENTRE as f32;
    if value >= centre {
        (value - centre) / (PITCH_BEND_MAX as f32 - centre)
    } else {
        (value - centre) / centre
    }
}

/// Map a 7-bit pressure value to 0.0..=1.0.
#[inline]
pub fn normalize_aftertouch(value: u8) -> f32 {
    value.min(MIDI_MAX) as f32 / MIDI_MAX as f32
}

/// Frequency ratio for a shift in semitones: 2^(semitones / 12).
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    2.0_f32.powf(semitones / 12.0)
}
