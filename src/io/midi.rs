/// Channel-voice MIDI message. Channels are 0-based (0..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    /// Per-key pressure.
    PolyAftertouch { channel: u8, key: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Whole-channel pressure.
    ChannelPressure { channel: u8, pressure: u8 },
    /// 14-bit wheel position, 8192 is centre.
    PitchBend { channel: u8, value: u16 },
}

/// Controller numbers the synth reacts to.
pub mod cc {
    pub const SUSTAIN_PEDAL: u8 = 64;
    pub const ALL_SOUND_OFF: u8 = 120;
    pub const ALL_NOTES_OFF: u8 = 123;
}

pub const PITCH_BEND_CENTRE: u16 = 8192;
pub const PITCH_BEND_MAX: u16 = 16383;

impl MidiEvent {
    /// Decode one channel-voice message from raw bytes.
    ///
    /// Running status, system messages and program change are not handled and
    /// yield `None`. A note-on with velocity 0 decodes as note-off.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status < 0x80 {
            return None;
        }

        let channel = status & 0x0F;
        let data_byte = |i: usize| data.get(i).copied().filter(|b| *b < 0x80);

        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: data_byte(0)?,
                velocity: data_byte(1)?,
            },
            0x90 => {
                let key = data_byte(0)?;
                match data_byte(1)? {
                    0 => MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity: 0,
                    },
                    velocity => MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    },
                }
            }
            0xA0 => MidiEvent::PolyAftertouch {
                channel,
                key: data_byte(0)?,
                pressure: data_byte(1)?,
            },
            0xB0 => MidiEvent::ControlChange {
                channel,
                controller: data_byte(0)?,
                value: data_byte(1)?,
            },
            0xD0 => MidiEvent::ChannelPressure {
                channel,
                pressure: data_byte(0)?,
            },
            0xE0 => {
                let lsb = data_byte(0)? as u16;
                let msb = data_byte(1)? as u16;
                MidiEvent::PitchBend {
                    channel,
                    value: (msb << 7) | lsb,
                }
            }
            _ => return None,
        };

        Some(event)
    }
}

/// An event stamped with an absolute position on the engine's sample clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub event: MidiEvent,
    pub timestamp: u64,
}

impl TimedEvent {
    pub fn new(event: MidiEvent, timestamp: u64) -> Self {
        Self { event, timestamp }
    }
}

/// An event positioned inside the block being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEvent {
    /// Frames from the start of the block.
    pub offset: usize,
    pub event: MidiEvent,
}

/// Fixed-capacity list of events due in one block, ordered by offset.
///
/// Capacity is reserved up front; `push` refuses rather than grows.
#[derive(Debug, Clone)]
pub struct EventBlock {
    events: Vec<BlockEvent>,
    limit: usize,
}

impl EventBlock {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            limit: capacity,
        }
    }

    /// Append an event; returns `false` when full.
    pub fn push(&mut self, offset: usize, event: MidiEvent) -> bool {
        if self.is_full() {
            return false;
        }
        self.events.push(BlockEvent { offset, event });
        true
    }

    pub fn is_full(&self) -> bool {
        self.events.len() >= self.limit
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn as_slice(&self) -> &[BlockEvent] {
        &self.events
    }
}
