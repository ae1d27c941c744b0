//! Voice trait for sound generators

/// Trait for continuously sounding generators
pub trait Voice: Send {
    /// Generate the next sample (0.0 once stopped)
    fn process(&mut self) -> f64;

    /// Stop generating. Returns `false` if the voice was already stopped.
    fn stop(&mut self) -> bool;

    /// Check if the voice is still generating
    fn is_active(&self) -> bool;

    /// Set the sample rate
    fn set_sample_rate(&mut self, sample_rate: f64);
}
