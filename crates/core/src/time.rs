//! Time bases.
//!
//! Two units flow through the simulation and they must never be mixed:
//! [`Millis`] (wall-clock milliseconds, used by every timer) and [`Frames`]
//! (elapsed time expressed in 60 Hz frames, used to integrate velocities into
//! displacement). [`Millis::to_frames`] is the only conversion.

use serde::{Deserialize, Serialize};

use crate::HZ;

/// Milliseconds.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millis(pub f64);

/// Elapsed time measured in frames of a 60 Hz clock.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frames(pub f64);

impl Millis {
    /// One 60 Hz frame.
    pub const FRAME: Millis = Millis(1000.0 / HZ);

    #[inline]
    pub fn to_frames(self) -> Frames {
        Frames(HZ * self.0 / 1000.0)
    }
}

/// Both time bases for a single update, converted once.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tick {
    pub ms: Millis,
    pub frames: Frames,
}

impl Tick {
    pub fn new(ms: Millis) -> Self {
        Self { ms, frames: ms.to_frames() }
    }
}

/// Count-down timer in milliseconds. Covers both "cooldown" (ready once
/// drained) and "window" (live until drained) uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    duration: Millis,
    remaining: Millis,
}

impl Countdown {
    /// Starts drained.
    pub fn new(duration: Millis) -> Self {
        Self { duration, remaining: Millis(0.0) }
    }

    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, dt: Millis) {
        self.remaining = Millis((self.remaining.0 - dt.0).max(0.0));
    }

    pub fn expired(&self) -> bool {
        self.remaining.0 <= 0.0
    }

    pub fn reset(&mut self) {
        self.remaining = Millis(0.0);
    }

    pub fn remaining(&self) -> Millis {
        self.remaining
    }

    pub fn duration(&self) -> Millis {
        self.duration
    }

    /// Takes effect on the next `start`.
    pub fn set_duration(&mut self, duration: Millis) {
        self.duration = duration;
    }
}

/// Fixed timestep accumulator.
/// Turns variable host frame times into a whole number of simulation ticks.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    dt: Millis,
    accumulator: f64,
}

impl FixedTimestep {
    /// Upper bound on ticks per `accumulate` call, so a long stall does not
    /// snowball into ever longer catch-up frames.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: Millis) -> Self {
        Self { dt, accumulator: 0.0 }
    }

    /// Add host frame time. Returns the number of fixed ticks to run.
    pub fn accumulate(&mut self, frame: Millis) -> u32 {
        self.accumulator += frame.0.max(0.0);
        self.accumulator = self.accumulator.min(self.dt.0 * Self::MAX_STEPS as f64);
        let steps = (self.accumulator / self.dt.0) as u32;
        self.accumulator -= steps as f64 * self.dt.0;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt.0
    }

    pub fn dt(&self) -> Millis {
        self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_conversion() {
        assert_eq!(Millis(50.0).to_frames(), Frames(3.0));
        assert_eq!(Millis(1000.0).to_frames(), Frames(60.0));
        assert!((Millis::FRAME.to_frames().0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn countdown_floors_at_zero() {
        let mut c = Countdown::new(Millis(100.0));
        assert!(c.expired());
        c.start();
        assert!(!c.expired());
        c.tick(Millis(60.0));
        assert_eq!(c.remaining(), Millis(40.0));
        c.tick(Millis(60.0));
        assert_eq!(c.remaining(), Millis(0.0));
        assert!(c.expired());
    }

    #[test]
    fn countdown_duration_change_applies_on_next_start() {
        let mut c = Countdown::new(Millis(100.0));
        c.start();
        c.set_duration(Millis(30.0));
        assert_eq!(c.remaining(), Millis(100.0));
        c.reset();
        c.start();
        assert_eq!(c.remaining(), Millis(30.0));
    }

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(Millis(20.0));
        assert_eq!(ts.accumulate(Millis(20.0)), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(Millis(20.0));
        assert_eq!(ts.accumulate(Millis(8.0)), 0);
        assert_eq!(ts.accumulate(Millis(14.0)), 1);
        assert!((ts.alpha() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(Millis(20.0));
        assert_eq!(ts.accumulate(Millis(1000.0)), FixedTimestep::MAX_STEPS);
        assert_eq!(ts.accumulate(Millis(0.0)), 0);
    }
}
