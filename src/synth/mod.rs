//! Synthesis engine for generating audio
//!
//! Contains oscillators, the drone voices, the voice bank and the master fader.

mod bank;
mod drone;
mod fader;
mod lfo;
mod oscillator;
mod voice;

pub use bank::{VoiceBank, DRONE_VOICES, VOICE_COUNT};
pub use drone::{DroneVoice, DroneVoiceSpec, ModulationSpec};
pub use fader::{MasterFader, Ramp};
pub use lfo::Lfo;
pub use oscillator::{Oscillator, Waveform};
pub use voice::Voice;
