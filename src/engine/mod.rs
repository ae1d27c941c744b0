//! Audio engine for Murmur
//!
//! The [`Engine`] is the only thing callers talk to. It builds the signal
//! graph the first time it is activated, keeps it around across
//! deactivate/activate cycles, and tears it down on [`Engine::dispose`].
//! None of its operations fail: platform problems are logged and the
//! engine stays silent.

mod backend;
mod graph;
mod player;
mod recorder;

pub use backend::{AudioBackend, OfflineBackend, OfflineRenderer};
pub use graph::{lock_graph, SharedGraph, SignalGraph};
pub use player::{default_device_name, list_output_devices, CpalBackend};
pub use recorder::Recorder;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::{debug, info, warn};

use crate::config::{FadeConfig, MurmurConfig, MAX_VOLUME};
use crate::error::EngineError;
use crate::mapping::{Chapter, MoodModulator};
use crate::synth::{Ramp, VoiceBank};

/// Lifecycle of an [`Engine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Not playing; the graph may or may not exist yet
    Idle,
    /// Graph running and heading towards the target volume
    Active,
    /// Resources released for good
    Disposed,
}

/// The ambient drone engine
pub struct Engine {
    fades: FadeConfig,
    sample_rate: f64,
    seed: Option<u64>,
    backend: Box<dyn AudioBackend>,
    graph: Option<SharedGraph>,
    state: EngineState,
    base_volume: f64,
    mood: MoodModulator,
}

impl Engine {
    /// Create an engine that plays through the configured cpal device
    pub fn new(config: &MurmurConfig) -> Self {
        let backend = CpalBackend::new(config.audio.device.clone());
        Self::with_backend(config, Box::new(backend))
    }

    /// Create an engine on an explicit backend
    pub fn with_backend(config: &MurmurConfig, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            fades: config.fades.clone(),
            sample_rate: config.audio.sample_rate as f64,
            seed: config.engine.seed,
            backend,
            graph: None,
            state: EngineState::Idle,
            base_volume: clamp_volume(config.engine.volume),
            mood: MoodModulator::new(Chapter::clamped(config.engine.chapter)),
        }
    }

    /// Start (or resume) playback, fading in to the mood-adjusted volume.
    ///
    /// Returns whether the engine is playing afterwards.
    pub fn activate(&mut self) -> bool {
        if self.state != EngineState::Idle {
            return self.is_playing();
        }

        let graph = match self.graph.clone() {
            Some(graph) => graph,
            None => match self.build_graph() {
                Ok(graph) => graph,
                Err(e) => {
                    warn!("audio unavailable, staying silent: {}", e);
                    return false;
                }
            },
        };

        if let Err(e) = self.backend.resume() {
            warn!("could not resume audio output: {}", e);
            return false;
        }

        self.state = EngineState::Active;
        let ramp = self.mood.apply(lock_graph(&graph).fader_mut(), self.base_volume, self.fades.fade_in);
        info!(to = ramp.target, duration = ramp.duration, "drone activated");
        true
    }

    /// Fade to silence. The graph stays allocated so the next
    /// [`activate`](Self::activate) is cheap.
    ///
    /// Returns whether the engine is playing afterwards (always false).
    pub fn deactivate(&mut self) -> bool {
        if self.state != EngineState::Active {
            return false;
        }

        self.state = EngineState::Idle;
        if let Some(graph) = &self.graph {
            let ramp = lock_graph(graph).fader_mut().ramp_to(0.0, self.fades.fade_out);
            info!(from = ramp.start_value, duration = ramp.duration, "drone deactivated");
        }
        false
    }

    /// Set the listener's base volume, clamped to [0, 0.5].
    ///
    /// Returns the value actually applied.
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let volume = clamp_volume(volume);
        if volume == self.base_volume {
            return volume;
        }

        self.base_volume = volume;
        debug!(volume, "base volume changed");
        self.retarget(self.fades.volume);
        volume
    }

    /// Follow the reader to `chapter`, clamped to 1..=20
    pub fn on_chapter_change(&mut self, chapter: i64) {
        let chapter = Chapter::clamped(chapter);
        if chapter == self.mood.chapter() {
            return;
        }

        self.mood.set_chapter(chapter);
        debug!(%chapter, multiplier = self.mood.multiplier(), "chapter changed");
        self.retarget(self.fades.mood);
    }

    /// Stop every voice and release the audio output. Terminal and
    /// idempotent.
    pub fn dispose(&mut self) {
        if self.state == EngineState::Disposed {
            return;
        }

        if let Some(graph) = self.graph.take() {
            let stopped = lock_graph(&graph).bank_mut().stop_all();
            debug!(stopped, "voices stopped");
        }
        self.backend.close();
        self.state = EngineState::Disposed;
        info!("drone disposed");
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == EngineState::Active
    }

    /// Base volume without mood scaling
    pub fn volume(&self) -> f64 {
        self.base_volume
    }

    pub fn chapter(&self) -> Chapter {
        self.mood.chapter()
    }

    pub fn mood_multiplier(&self) -> f64 {
        self.mood.multiplier()
    }

    /// Volume the engine fades to while active
    pub fn target_volume(&self) -> f64 {
        self.mood.target(self.base_volume)
    }

    /// Number of drone voices allocated (0 before the first activation)
    pub fn voice_count(&self) -> usize {
        self.graph
            .as_ref()
            .map(|g| lock_graph(g).bank().len())
            .unwrap_or(0)
    }

    /// Master gain at the rendering clock's current time
    pub fn current_gain(&self) -> f64 {
        self.graph
            .as_ref()
            .map(|g| lock_graph(g).fader().value())
            .unwrap_or(0.0)
    }

    /// The master ramp still in progress, if any
    pub fn pending_ramp(&self) -> Option<Ramp> {
        self.graph
            .as_ref()
            .and_then(|g| lock_graph(g).fader().pending_ramp())
    }

    /// Seconds of audio rendered so far
    pub fn elapsed(&self) -> f64 {
        self.graph
            .as_ref()
            .map(|g| lock_graph(g).fader().now())
            .unwrap_or(0.0)
    }

    /// Ramp time for a fade-out, for callers that wait on it
    pub fn fade_out_secs(&self) -> f64 {
        self.fades.fade_out
    }

    fn retarget(&mut self, duration: f64) {
        if self.state != EngineState::Active {
            return;
        }
        if let Some(graph) = &self.graph {
            let ramp = self.mood.apply(lock_graph(graph).fader_mut(), self.base_volume, duration);
            debug!(to = ramp.target, duration = ramp.duration, "volume ramp");
        }
    }

    fn build_graph(&mut self) -> Result<SharedGraph, EngineError> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let bank = VoiceBank::new(self.sample_rate, &mut rng);
        let graph = SignalGraph::new(bank, self.sample_rate).shared();

        if let Err(e) = self.backend.open(graph.clone()) {
            lock_graph(&graph).bank_mut().stop_all();
            return Err(e);
        }

        info!(seed, backend = self.backend.name(), "signal graph built");
        self.graph = Some(graph.clone());
        Ok(graph)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, MAX_VOLUME)
    }
}
