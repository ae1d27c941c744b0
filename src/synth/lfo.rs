//! Low Frequency Oscillator for pitch drift
//!
//! A slow sine whose output is expressed directly in Hz of deviation, so
//! it can be added to a carrier frequency.

use std::f64::consts::PI;

/// Low Frequency Oscillator
#[derive(Debug, Clone)]
pub struct Lfo {
    frequency: f64,
    phase: f64,
    sample_rate: f64,
    /// Peak deviation in Hz
    depth: f64,
}

impl Lfo {
    /// Create a new LFO at `frequency` Hz swinging `depth` Hz either way
    pub fn new(frequency: f64, depth: f64, sample_rate: f64) -> Self {
        Self {
            frequency: frequency.clamp(0.01, 100.0),
            phase: 0.0,
            sample_rate,
            depth: depth.max(0.0),
        }
    }

    /// Get LFO frequency
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Get modulation depth in Hz
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Change the sample rate, keeping phase
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Generate next deviation (-depth to +depth)
    pub fn process(&mut self) -> f64 {
        let raw = (self.phase * 2.0 * PI).sin();

        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        raw * self.depth
    }
}
