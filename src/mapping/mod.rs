//! Mapping from story position to audio parameters

mod mood;

pub use mood::{Chapter, MoodModulator, APOCALYPSE_FROM, RAIN_FROM};
