//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for Murmur
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MurmurConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Initial listening state
    #[serde(default)]
    pub engine: EngineConfig,

    /// Transition timings
    #[serde(default)]
    pub fades: FadeConfig,
}

impl MurmurConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        if !(0.0..=MAX_VOLUME).contains(&self.engine.volume) {
            bail!("Volume must be between 0.0 and {}", MAX_VOLUME);
        }
        if !(1..=20).contains(&self.engine.chapter) {
            bail!("Chapter must be between 1 and 20");
        }

        for (name, secs) in self.fades.entries() {
            if !secs.is_finite() || secs < 0.0 {
                bail!("Fade '{}' must be a non-negative number of seconds", name);
            }
        }

        Ok(())
    }
}

/// Upper bound of the listener's base volume
pub const MAX_VOLUME: f64 = 0.5;

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz for offline rendering (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in frames (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 512 }

/// Initial engine state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base volume 0.0-0.5 (default: 0.3)
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Starting chapter 1-20 (default: 1)
    #[serde(default = "default_chapter")]
    pub chapter: i64,

    /// Seed for the voice modulation rates (None = random each run)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            chapter: default_chapter(),
            seed: None,
        }
    }
}

fn default_volume() -> f64 { 0.3 }
fn default_chapter() -> i64 { 1 }

/// Ramp durations in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeConfig {
    /// Fade in on activation (default: 1.0)
    #[serde(default = "default_fade_in")]
    pub fade_in: f64,

    /// Fade out on deactivation (default: 0.5)
    #[serde(default = "default_fade_out")]
    pub fade_out: f64,

    /// Chapter-driven mood changes (default: 2.0)
    #[serde(default = "default_mood_fade")]
    pub mood: f64,

    /// Direct volume changes (default: 0.1)
    #[serde(default = "default_volume_fade")]
    pub volume: f64,
}

impl FadeConfig {
    fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("fade_in", self.fade_in),
            ("fade_out", self.fade_out),
            ("mood", self.mood),
            ("volume", self.volume),
        ]
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_in: default_fade_in(),
            fade_out: default_fade_out(),
            mood: default_mood_fade(),
            volume: default_volume_fade(),
        }
    }
}

fn default_fade_in() -> f64 { 1.0 }
fn default_fade_out() -> f64 { 0.5 }
fn default_mood_fade() -> f64 { 2.0 }
fn default_volume_fade() -> f64 { 0.1 }
