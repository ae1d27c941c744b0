//! Signal graph: voice bank into master fader

use std::sync::{Arc, Mutex, MutexGuard};

use crate::synth::{MasterFader, VoiceBank};

/// Graph shared between the control plane and the render callback
pub type SharedGraph = Arc<Mutex<SignalGraph>>;

/// Lock a shared graph, recovering it if a render thread panicked
pub fn lock_graph(graph: &SharedGraph) -> MutexGuard<'_, SignalGraph> {
    graph.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The complete rendering chain
pub struct SignalGraph {
    bank: VoiceBank,
    fader: MasterFader,
    sample_rate: f64,
}

impl SignalGraph {
    /// Wire a bank into a fader that starts silent
    pub fn new(bank: VoiceBank, sample_rate: f64) -> Self {
        let mut fader = MasterFader::new(sample_rate);
        fader.set_immediate(0.0);
        Self {
            bank,
            fader,
            sample_rate,
        }
    }

    /// Wrap in the shared handle
    pub fn shared(self) -> SharedGraph {
        Arc::new(Mutex::new(self))
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Retune to the rate the output device actually runs at
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        if sample_rate == self.sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        self.bank.set_sample_rate(sample_rate);
        self.fader.set_sample_rate(sample_rate);
    }

    pub fn bank(&self) -> &VoiceBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut VoiceBank {
        &mut self.bank
    }

    pub fn fader(&self) -> &MasterFader {
        &self.fader
    }

    pub fn fader_mut(&mut self) -> &mut MasterFader {
        &mut self.fader
    }

    /// Generate the next output sample
    pub fn process(&mut self) -> f64 {
        let dry = self.bank.process();
        dry * self.fader.process()
    }

    /// Fill a mono buffer
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{ModulationSpec, DRONE_VOICES};

    fn graph(sample_rate: f64) -> SignalGraph {
        let modulations = DRONE_VOICES.map(|spec| ModulationSpec::new(&spec, 0.2));
        SignalGraph::new(VoiceBank::with_modulations(sample_rate, modulations), sample_rate)
    }

    #[test]
    fn test_graph_starts_silent() {
        let mut g = graph(44100.0);
        let mut buffer = vec![1.0f32; 512];
        g.fill_buffer(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_graph_output_follows_fader() {
        let mut g = graph(44100.0);
        g.fader_mut().set_immediate(0.5);

        let mut buffer = vec![0.0f32; 4410];
        g.fill_buffer(&mut buffer);

        let peak = buffer.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(peak > 0.0);
        assert!(peak <= 0.41 * 0.5 + 1e-6);
    }

    #[test]
    fn test_rendering_advances_clock() {
        let mut g = graph(1000.0);
        let mut buffer = vec![0.0f32; 250];
        g.fill_buffer(&mut buffer);
        assert!((g.fader().now() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let shared = graph(1000.0).shared();
        let clone = shared.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().unwrap();
            panic!("render thread died");
        })
        .join();

        assert!(shared.is_poisoned());
        assert_eq!(lock_graph(&shared).bank().len(), 5);
    }
}
