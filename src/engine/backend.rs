//! Audio output backends
//!
//! A backend owns the platform resource that pulls samples out of the
//! signal graph. The engine opens it once, resumes it on every activation
//! and closes it on dispose.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::graph::{lock_graph, SharedGraph};
use crate::error::EngineError;

/// Platform audio output
pub trait AudioBackend {
    /// Allocate the output and start pulling from `graph`.
    ///
    /// May retune the graph to the device's sample rate.
    fn open(&mut self, graph: SharedGraph) -> Result<(), EngineError>;

    /// Restart a suspended output. No-op when already running.
    fn resume(&mut self) -> Result<(), EngineError>;

    /// Release the output. Safe to call more than once.
    fn close(&mut self);

    /// Short name for log lines
    fn name(&self) -> &str;
}

#[derive(Default)]
struct OfflineShared {
    graph: Mutex<Option<SharedGraph>>,
    suspended: AtomicBool,
}

/// Backend without a device; frames are rendered on demand
pub struct OfflineBackend {
    sample_rate: f64,
    fail_open: bool,
    shared: Arc<OfflineShared>,
}

impl OfflineBackend {
    /// Create an offline backend rendering at `sample_rate`
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            fail_open: false,
            shared: Arc::new(OfflineShared::default()),
        }
    }

    /// Make `open` fail, as on a machine with no usable audio output
    pub fn unavailable(sample_rate: u32) -> Self {
        Self {
            fail_open: true,
            ..Self::new(sample_rate)
        }
    }

    /// Handle for pulling audio out of the opened graph
    pub fn renderer(&self) -> OfflineRenderer {
        OfflineRenderer {
            shared: self.shared.clone(),
        }
    }
}

impl AudioBackend for OfflineBackend {
    fn open(&mut self, graph: SharedGraph) -> Result<(), EngineError> {
        if self.fail_open {
            return Err(EngineError::PlatformAudioUnavailable(
                "offline output disabled".to_string(),
            ));
        }
        lock_graph(&graph).set_sample_rate(self.sample_rate);
        *self.shared.graph.lock().unwrap_or_else(|p| p.into_inner()) = Some(graph);
        self.shared.suspended.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.shared.suspended.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) {
        self.shared.graph.lock().unwrap_or_else(|p| p.into_inner()).take();
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Pulls frames from an [`OfflineBackend`]'s graph
#[derive(Clone)]
pub struct OfflineRenderer {
    shared: Arc<OfflineShared>,
}

impl OfflineRenderer {
    /// Fill `buffer` with mono samples.
    ///
    /// Returns the number of frames actually rendered: zero when the backend
    /// is closed or suspended, in which case the buffer is silence and the
    /// rendering clock does not move.
    pub fn render(&self, buffer: &mut [f32]) -> usize {
        let slot = self.shared.graph.lock().unwrap_or_else(|p| p.into_inner());
        match slot.as_ref() {
            Some(graph) if !self.is_suspended() => {
                lock_graph(graph).fill_buffer(buffer);
                buffer.len()
            }
            _ => {
                buffer.fill(0.0);
                0
            }
        }
    }

    /// Render and discard `seconds` of audio
    pub fn run_for(&self, seconds: f64) -> usize {
        let rate = match self.sample_rate() {
            Some(rate) => rate,
            None => return 0,
        };
        let mut buffer = vec![0.0f32; (seconds * rate).round() as usize];
        self.render(&mut buffer)
    }

    /// Stall the clock as a platform would when it suspends output
    pub fn set_suspended(&self, suspended: bool) {
        self.shared.suspended.store(suspended, Ordering::SeqCst);
    }

    pub fn is_suspended(&self) -> bool {
        self.shared.suspended.load(Ordering::SeqCst)
    }

    /// Whether a graph is currently attached
    pub fn is_open(&self) -> bool {
        self.shared.graph.lock().unwrap_or_else(|p| p.into_inner()).is_some()
    }

    fn sample_rate(&self) -> Option<f64> {
        let slot = self.shared.graph.lock().unwrap_or_else(|p| p.into_inner());
        let rate = slot.as_ref().map(|g| lock_graph(g).sample_rate());
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::SignalGraph;
    use crate::synth::{ModulationSpec, VoiceBank, DRONE_VOICES};

    fn shared_graph() -> SharedGraph {
        let modulations = DRONE_VOICES.map(|spec| ModulationSpec::new(&spec, 0.2));
        SignalGraph::new(VoiceBank::with_modulations(8000.0, modulations), 8000.0).shared()
    }

    #[test]
    fn test_open_retunes_graph() {
        let mut backend = OfflineBackend::new(1000);
        let graph = shared_graph();
        backend.open(graph.clone()).unwrap();

        assert_eq!(lock_graph(&graph).sample_rate(), 1000.0);
        assert!(backend.renderer().is_open());
    }

    #[test]
    fn test_unavailable_backend() {
        let mut backend = OfflineBackend::unavailable(1000);
        let err = backend.open(shared_graph()).unwrap_err();
        assert!(matches!(err, EngineError::PlatformAudioUnavailable(_)));
        assert!(!backend.renderer().is_open());
    }

    #[test]
    fn test_render_when_closed_is_silent() {
        let backend = OfflineBackend::new(1000);
        let mut buffer = vec![1.0f32; 64];
        assert_eq!(backend.renderer().render(&mut buffer), 0);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_suspend_stalls_clock() {
        let mut backend = OfflineBackend::new(1000);
        let graph = shared_graph();
        backend.open(graph.clone()).unwrap();
        let renderer = backend.renderer();

        assert_eq!(renderer.run_for(0.1), 100);
        renderer.set_suspended(true);
        assert_eq!(renderer.run_for(0.1), 0);
        assert!((lock_graph(&graph).fader().now() - 0.1).abs() < 1e-12);

        backend.resume().unwrap();
        assert!(!renderer.is_suspended());
        assert_eq!(renderer.run_for(0.1), 100);
    }

    #[test]
    fn test_close_twice() {
        let mut backend = OfflineBackend::new(1000);
        backend.open(shared_graph()).unwrap();
        backend.close();
        backend.close();
        assert!(!backend.renderer().is_open());
    }
}
