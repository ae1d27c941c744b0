//! Mood mapping from narrative position to loudness
//!
//! The last chapters of the story swell, the rain chapters before them
//! sink back, everything else sits at the listener's chosen level.

use crate::synth::{MasterFader, Ramp};

/// A chapter number, always within 1..=20
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chapter(u8);

impl Chapter {
    pub const FIRST: Chapter = Chapter(1);
    pub const LAST: Chapter = Chapter(20);

    /// Clamp any integer into the valid chapter range
    pub fn clamped(chapter: i64) -> Self {
        Self(chapter.clamp(Self::FIRST.0 as i64, Self::LAST.0 as i64) as u8)
    }

    /// The chapter number
    pub fn get(self) -> u8 {
        self.0
    }

    /// The following chapter, saturating at the last one
    pub fn next(self) -> Self {
        Self::clamped(self.0 as i64 + 1)
    }
}

impl Default for Chapter {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chapters from which the drone intensifies
pub const APOCALYPSE_FROM: u8 = 18;
/// Chapters from which the drone recedes, until `APOCALYPSE_FROM`
pub const RAIN_FROM: u8 = 15;

/// Tracks the chapter and derives the volume multiplier from it
#[derive(Debug, Clone, Default)]
pub struct MoodModulator {
    chapter: Chapter,
}

impl MoodModulator {
    /// Create a modulator positioned at `chapter`
    pub fn new(chapter: Chapter) -> Self {
        Self { chapter }
    }

    /// Volume multiplier for a chapter
    pub fn multiplier_for(chapter: Chapter) -> f64 {
        match chapter.get() {
            c if c >= APOCALYPSE_FROM => 1.2,
            c if c >= RAIN_FROM => 0.8,
            _ => 1.0,
        }
    }

    /// Current chapter
    pub fn chapter(&self) -> Chapter {
        self.chapter
    }

    /// Move to a new chapter
    pub fn set_chapter(&mut self, chapter: Chapter) {
        self.chapter = chapter;
    }

    /// Multiplier for the current chapter
    pub fn multiplier(&self) -> f64 {
        Self::multiplier_for(self.chapter)
    }

    /// Mood-adjusted volume for `base_volume`
    pub fn target(&self, base_volume: f64) -> f64 {
        base_volume * self.multiplier()
    }

    /// Ramp `fader` towards the mood-adjusted volume
    pub fn apply(&self, fader: &mut MasterFader, base_volume: f64, duration: f64) -> Ramp {
        fader.ramp_to(self.target(base_volume), duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_clamping() {
        assert_eq!(Chapter::clamped(25).get(), 20);
        assert_eq!(Chapter::clamped(0).get(), 1);
        assert_eq!(Chapter::clamped(-4).get(), 1);
        assert_eq!(Chapter::clamped(7).get(), 7);
        assert_eq!(Chapter::LAST.next(), Chapter::LAST);
    }

    #[test]
    fn test_mood_multipliers() {
        let m = |c| MoodModulator::multiplier_for(Chapter::clamped(c));
        assert_eq!(m(1), 1.0);
        assert_eq!(m(14), 1.0);
        assert_eq!(m(15), 0.8);
        assert_eq!(m(17), 0.8);
        assert_eq!(m(18), 1.2);
        assert_eq!(m(20), 1.2);
    }

    #[test]
    fn test_target_scales_base_volume() {
        let mood = MoodModulator::new(Chapter::clamped(16));
        assert!((mood.target(0.5) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_apply_ramps_fader() {
        let mut fader = MasterFader::new(1000.0);
        fader.set_immediate(0.3);

        let mood = MoodModulator::new(Chapter::clamped(19));
        let ramp = mood.apply(&mut fader, 0.3, 2.0);

        assert!((ramp.target - 0.36).abs() < 1e-12);
        assert_eq!(ramp.duration, 2.0);
        assert!((ramp.start_value - 0.3).abs() < 1e-12);
    }
}
