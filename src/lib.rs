//! Murmur - Procedural ambient drones for narrative reading
//!
//! Five slowly drifting oscillators behind a master fader. The drone fades
//! in and out smoothly and swells or recedes with the reader's chapter.

pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod synth;

pub use config::MurmurConfig;
pub use engine::{Engine, EngineState};
pub use error::EngineError;
