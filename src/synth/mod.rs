// Purpose: Voice management, polyphony, MIDI routing
// This layer sits above the DSP primitives and owns every sounding note

pub mod allocator;
pub mod poly;
pub mod sound;
pub mod voice;

pub use allocator::StealingStrategy;
pub use poly::PolySynth;
pub use sound::Sound;
pub use voice::{VoiceState, WavetableVoice};
