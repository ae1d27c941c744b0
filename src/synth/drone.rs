//! Drone voice implementation
//!
//! A single sustained tone whose pitch wanders slowly around its base
//! frequency, driven by its own LFO.

use rand::Rng;

use super::{Lfo, Oscillator, Voice, Waveform};

/// Fixed pitch, timbre and level of one drone layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneVoiceSpec {
    pub base_frequency: f64,
    pub waveform: Waveform,
    /// Level in (0, 1]
    pub relative_gain: f64,
}

/// Pitch drift of one drone layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationSpec {
    /// LFO rate in Hz
    pub rate: f64,
    /// Peak frequency deviation in Hz
    pub depth: f64,
}

impl ModulationSpec {
    /// Lowest modulation rate (inclusive)
    pub const MIN_RATE: f64 = 0.1;
    /// Highest modulation rate (exclusive)
    pub const MAX_RATE: f64 = 0.3;
    /// Deviation as a fraction of the base frequency
    pub const DEPTH_RATIO: f64 = 0.01;

    /// Build a modulation with an explicit rate
    pub fn new(spec: &DroneVoiceSpec, rate: f64) -> Self {
        Self {
            rate,
            depth: spec.base_frequency * Self::DEPTH_RATIO,
        }
    }

    /// Draw a rate from [0.1, 0.3)
    pub fn random<R: Rng + ?Sized>(spec: &DroneVoiceSpec, rng: &mut R) -> Self {
        Self::new(spec, rng.gen_range(Self::MIN_RATE..Self::MAX_RATE))
    }
}

/// A drone voice: one carrier oscillator with LFO pitch drift
pub struct DroneVoice {
    spec: DroneVoiceSpec,
    modulation: ModulationSpec,
    oscillator: Oscillator,
    lfo: Lfo,
    active: bool,
}

impl DroneVoice {
    /// Create a drone voice. It starts sounding immediately.
    pub fn new(spec: DroneVoiceSpec, modulation: ModulationSpec, sample_rate: f64) -> Self {
        Self {
            spec,
            modulation,
            oscillator: Oscillator::new(spec.waveform, spec.base_frequency, sample_rate),
            lfo: Lfo::new(modulation.rate, modulation.depth, sample_rate),
            active: true,
        }
    }

    /// The fixed voice parameters
    pub fn spec(&self) -> &DroneVoiceSpec {
        &self.spec
    }

    /// The modulation drawn for this voice
    pub fn modulation(&self) -> &ModulationSpec {
        &self.modulation
    }

    /// Carrier frequency used for the most recent sample
    pub fn frequency(&self) -> f64 {
        self.oscillator.frequency()
    }
}

impl Voice for DroneVoice {
    fn process(&mut self) -> f64 {
        if !self.active {
            return 0.0;
        }

        let drift = self.lfo.process();
        self.oscillator.set_frequency(self.spec.base_frequency + drift);
        self.oscillator.generate() * self.spec.relative_gain
    }

    fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.oscillator.set_sample_rate(sample_rate);
        self.lfo.set_sample_rate(sample_rate);
    }
}
