//! Voice bank: the fixed five-layer drone ensemble

use rand::Rng;
use tracing::debug;

use super::{DroneVoice, DroneVoiceSpec, ModulationSpec, Voice, Waveform};

/// Number of layers in the ensemble
pub const VOICE_COUNT: usize = 5;

/// Bass drone, fifth, octave, and two upper harmonics
pub const DRONE_VOICES: [DroneVoiceSpec; VOICE_COUNT] = [
    DroneVoiceSpec { base_frequency: 55.0, waveform: Waveform::Sine, relative_gain: 0.15 },
    DroneVoiceSpec { base_frequency: 82.5, waveform: Waveform::Sine, relative_gain: 0.10 },
    DroneVoiceSpec { base_frequency: 110.0, waveform: Waveform::Triangle, relative_gain: 0.08 },
    DroneVoiceSpec { base_frequency: 165.0, waveform: Waveform::Sine, relative_gain: 0.05 },
    DroneVoiceSpec { base_frequency: 220.0, waveform: Waveform::Sine, relative_gain: 0.03 },
];

/// Owns the five drone voices and sums them into one signal
pub struct VoiceBank {
    voices: [DroneVoice; VOICE_COUNT],
}

impl VoiceBank {
    /// Build and start all voices, drawing each modulation rate from `rng`
    pub fn new<R: Rng + ?Sized>(sample_rate: f64, rng: &mut R) -> Self {
        let modulations = DRONE_VOICES.map(|spec| ModulationSpec::random(&spec, &mut *rng));
        Self::with_modulations(sample_rate, modulations)
    }

    /// Build and start all voices with pre-drawn modulations
    pub fn with_modulations(sample_rate: f64, modulations: [ModulationSpec; VOICE_COUNT]) -> Self {
        let voices = std::array::from_fn(|i| {
            DroneVoice::new(DRONE_VOICES[i], modulations[i], sample_rate)
        });
        Self { voices }
    }

    /// Number of voices owned (always five)
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Always false; the bank is never empty
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Borrow the voices
    pub fn voices(&self) -> &[DroneVoice] {
        &self.voices
    }

    /// Number of voices still sounding
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Mixed output of every voice at its relative gain
    pub fn process(&mut self) -> f64 {
        self.voices.iter_mut().map(|v| v.process()).sum()
    }

    /// Propagate a new sample rate to every voice
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Stop every voice. Safe to call repeatedly; returns how many voices
    /// were actually running.
    pub fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for (index, voice) in self.voices.iter_mut().enumerate() {
            if voice.stop() {
                stopped += 1;
            } else {
                debug!(index, "voice already stopped");
            }
        }
        stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fixed_modulations() -> [ModulationSpec; VOICE_COUNT] {
        DRONE_VOICES.map(|spec| ModulationSpec::new(&spec, 0.2))
    }

    #[test]
    fn test_bank_has_five_voices_in_table_order() {
        let bank = VoiceBank::with_modulations(44100.0, fixed_modulations());
        assert_eq!(bank.len(), 5);
        assert_eq!(bank.active_count(), 5);

        let freqs: Vec<f64> = bank.voices().iter().map(|v| v.spec().base_frequency).collect();
        assert_eq!(freqs, vec![55.0, 82.5, 110.0, 165.0, 220.0]);
        assert_eq!(bank.voices()[2].spec().waveform, Waveform::Triangle);
    }

    #[test]
    fn test_bank_modulation_depth_is_one_percent() {
        let mut rng = Pcg32::seed_from_u64(42);
        let bank = VoiceBank::new(44100.0, &mut rng);
        for voice in bank.voices() {
            let expected = voice.spec().base_frequency * 0.01;
            assert!((voice.modulation().depth - expected).abs() < 1e-12);
            assert!((0.1..0.3).contains(&voice.modulation().rate));
        }
    }

    #[test]
    fn test_bank_seed_is_deterministic() {
        let a = VoiceBank::new(44100.0, &mut Pcg32::seed_from_u64(9));
        let b = VoiceBank::new(44100.0, &mut Pcg32::seed_from_u64(9));
        let rates_a: Vec<f64> = a.voices().iter().map(|v| v.modulation().rate).collect();
        let rates_b: Vec<f64> = b.voices().iter().map(|v| v.modulation().rate).collect();
        assert_eq!(rates_a, rates_b);
    }

    #[test]
    fn test_bank_output_bounded_by_gain_sum() {
        let mut bank = VoiceBank::with_modulations(44100.0, fixed_modulations());
        let mut max = 0.0f64;
        for _ in 0..44100 {
            max = max.max(bank.process().abs());
        }
        assert!(max > 0.0);
        assert!(max <= 0.41 + 1e-9);
    }

    #[test]
    fn test_stop_all_twice() {
        let mut bank = VoiceBank::with_modulations(44100.0, fixed_modulations());
        assert_eq!(bank.stop_all(), 5);
        assert_eq!(bank.stop_all(), 0);
        assert_eq!(bank.active_count(), 0);
        assert_eq!(bank.process(), 0.0);
    }
}
