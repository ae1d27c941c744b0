//! Basic oscillator implementation

use std::f64::consts::PI;

/// Waveform types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// A phase-accumulating oscillator
///
/// The frequency may be changed between samples without resetting phase,
/// which is what keeps frequency modulation free of discontinuities.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f64,
    frequency: f64,
    sample_rate: f64,
}

impl Oscillator {
    /// Create a new oscillator
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        Self {
            waveform,
            phase: 0.0,
            frequency,
            sample_rate,
        }
    }

    /// Set the frequency
    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Get the current frequency
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Get the waveform
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Change the sample rate, keeping phase
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Generate the next sample
    pub fn generate(&mut self) -> f64 {
        let sample = match self.waveform {
            Waveform::Sine => (self.phase * 2.0 * PI).sin(),
            Waveform::Triangle => self.triangle(),
        };

        self.phase += self.frequency / self.sample_rate;
        // rem_euclid also handles negative instantaneous frequencies
        if !(0.0..1.0).contains(&self.phase) {
            self.phase = self.phase.rem_euclid(1.0);
        }

        sample
    }

    fn triangle(&self) -> f64 {
        let p = self.phase;
        if p < 0.25 {
            4.0 * p
        } else if p < 0.75 {
            2.0 - 4.0 * p
        } else {
            4.0 * p - 4.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_oscillator() {
        let mut osc = Oscillator::new(Waveform::Sine, 440.0, 44100.0);

        // First sample should be 0 (sin(0))
        let sample = osc.generate();
        assert!((sample - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_triangle_oscillator() {
        let mut osc = Oscillator::new(Waveform::Triangle, 1.0, 8.0);

        let expected = [0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -0.5];
        for e in expected {
            assert!((osc.generate() - e).abs() < 1e-9);
        }
    }

    #[test]
    fn test_frequency_change_keeps_phase() {
        let mut osc = Oscillator::new(Waveform::Sine, 1.0, 4.0);
        osc.generate(); // phase now 0.25
        osc.set_frequency(2.0);
        assert_eq!(osc.frequency(), 2.0);

        // sin(0.25 * 2pi) = 1.0, no reset to zero
        assert!((osc.generate() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sine_range() {
        let mut osc = Oscillator::new(Waveform::Sine, 55.0, 44100.0);
        for _ in 0..44100 {
            let sample = osc.generate();
            assert!((-1.0..=1.0).contains(&sample), "Sample out of range: {}", sample);
        }
    }
}
