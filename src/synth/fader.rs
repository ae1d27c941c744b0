//! Master fader with scheduled linear ramps
//!
//! Time is measured in rendered frames, so the fader's clock only moves while
//! audio is actually being produced. A ramp requested while the clock is
//! stalled simply waits and picks up where it left off.

/// A linear transition of the gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    /// Gain at `start_time`
    pub start_value: f64,
    pub target: f64,
    /// Clock time (seconds) the ramp was issued at
    pub start_time: f64,
    pub duration: f64,
}

impl Ramp {
    /// Clock time at which the target is reached
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Gain at clock time `t`
    pub fn value_at(&self, t: f64) -> f64 {
        if self.duration <= 0.0 || t >= self.end_time() {
            return self.target;
        }
        if t <= self.start_time {
            return self.start_value;
        }
        let progress = (t - self.start_time) / self.duration;
        self.start_value + (self.target - self.start_value) * progress
    }
}

/// Single gain stage in front of the output
#[derive(Debug, Clone)]
pub struct MasterFader {
    sample_rate: f64,
    frames: u64,
    /// Gain held when no ramp is in flight
    value: f64,
    ramp: Option<Ramp>,
}

impl MasterFader {
    /// Create a fader at unity gain
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            frames: 0,
            value: 1.0,
            ramp: None,
        }
    }

    /// Current clock time in seconds
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate
    }

    /// Gain at the current clock time
    pub fn value(&self) -> f64 {
        match &self.ramp {
            Some(ramp) => ramp.value_at(self.now()),
            None => self.value,
        }
    }

    /// The ramp still in flight, if any
    pub fn pending_ramp(&self) -> Option<Ramp> {
        self.ramp.filter(|r| self.now() < r.end_time())
    }

    /// Jump to `value` without a transition, dropping any ramp
    pub fn set_immediate(&mut self, value: f64) {
        self.value = value;
        self.ramp = None;
    }

    /// Move linearly from the current gain to `target` over `duration` seconds.
    ///
    /// Replaces any ramp in flight; the new segment starts from wherever the
    /// old one had got to.
    pub fn ramp_to(&mut self, target: f64, duration: f64) -> Ramp {
        let ramp = Ramp {
            start_value: self.value(),
            target,
            start_time: self.now(),
            duration: duration.max(0.0),
        };
        self.ramp = Some(ramp);
        ramp
    }

    /// Advance the clock by `frames` without producing output
    pub fn advance(&mut self, frames: u64) {
        self.frames += frames;
        self.settle();
    }

    /// Gain for the current frame, then advance one frame
    pub fn process(&mut self) -> f64 {
        let gain = self.value();
        self.advance(1);
        gain
    }

    /// Change the clock rate, keeping the elapsed time
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        let now = self.now();
        self.sample_rate = sample_rate;
        self.frames = (now * sample_rate).round() as u64;
    }

    fn settle(&mut self) {
        if let Some(ramp) = self.ramp {
            if self.now() >= ramp.end_time() {
                self.value = ramp.target;
                self.ramp = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f64 = 1000.0;

    fn seconds(s: f64) -> u64 {
        (s * RATE).round() as u64
    }

    #[test]
    fn test_set_immediate() {
        let mut fader = MasterFader::new(RATE);
        fader.ramp_to(0.4, 1.0);
        fader.set_immediate(0.0);
        assert_eq!(fader.value(), 0.0);
        assert!(fader.pending_ramp().is_none());
    }

    #[test]
    fn test_linear_ramp() {
        let mut fader = MasterFader::new(RATE);
        fader.set_immediate(0.0);
        fader.ramp_to(0.3, 1.0);

        fader.advance(seconds(0.5));
        assert!((fader.value() - 0.15).abs() < 1e-9);

        fader.advance(seconds(0.5));
        assert!((fader.value() - 0.3).abs() < 1e-9);
        assert!(fader.pending_ramp().is_none());

        // Holds the target afterwards
        fader.advance(seconds(3.0));
        assert!((fader.value() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_new_ramp_starts_from_current_value() {
        let mut fader = MasterFader::new(RATE);
        fader.set_immediate(0.0);
        fader.ramp_to(0.3, 1.0);
        fader.advance(seconds(0.2));

        let held = fader.value();
        assert!(held > 0.0 && held < 0.3);
        assert!((held - 0.06).abs() < 1e-9);

        let ramp = fader.ramp_to(0.0, 0.5);
        assert!((ramp.start_value - held).abs() < 1e-12);
        assert!((ramp.start_time - 0.2).abs() < 1e-12);

        let mut last = held;
        for _ in 0..seconds(0.5) {
            let v = fader.process();
            assert!(v <= held + 1e-12, "overshoot: {} > {}", v, held);
            assert!(v <= last + 1e-12, "not monotonic: {} after {}", v, last);
            last = v;
        }
        // t = 0.7
        assert!(fader.value().abs() < 1e-9);
    }

    #[test]
    fn test_reinterpolated_midpoint() {
        let mut fader = MasterFader::new(RATE);
        fader.set_immediate(0.0);
        fader.ramp_to(0.3, 1.0);
        fader.advance(seconds(0.2));
        fader.ramp_to(0.0, 0.5);

        fader.advance(seconds(0.25));
        assert!((fader.value() - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_clock_does_not_move_without_frames() {
        let mut fader = MasterFader::new(RATE);
        fader.set_immediate(0.0);
        fader.ramp_to(0.5, 1.0);

        // No frames rendered: the ramp is frozen at its start
        assert_eq!(fader.value(), 0.0);
        assert_eq!(fader.now(), 0.0);
        assert!(fader.pending_ramp().is_some());

        fader.advance(seconds(0.5));
        assert!((fader.value() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_ramp() {
        let mut fader = MasterFader::new(RATE);
        fader.set_immediate(0.0);
        fader.ramp_to(0.2, 0.0);
        assert!((fader.value() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_sample_rate_change_keeps_time() {
        let mut fader = MasterFader::new(RATE);
        fader.set_immediate(0.0);
        fader.ramp_to(1.0, 1.0);
        fader.advance(seconds(0.5));

        fader.set_sample_rate(48000.0);
        assert!((fader.now() - 0.5).abs() < 1e-9);
        assert!((fader.value() - 0.5).abs() < 1e-9);
    }
}
