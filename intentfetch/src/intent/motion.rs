//! Pointer motion tracking.
//!
//! Maintains an exponentially smoothed velocity over the incoming deltas.
//! The first few samples use lighter smoothing so the velocity ramps up
//! quickly from rest instead of lagging behind a fast initial flick.
//!
//! Debounce bookkeeping lives here too because it is measured in samples:
//! a trigger needs more than [`DEBOUNCE_SAMPLES`] samples since the last one.

use crate::geometry::Vec2;

use super::target::MotionSample;

/// Smoothing factor while the velocity is ramping up.
pub const RAMP_UP_SMOOTHING: f64 = 0.3;

/// Smoothing factor once the ramp-up window has passed.
pub const STEADY_SMOOTHING: f64 = 0.6;

/// Number of samples that use [`RAMP_UP_SMOOTHING`].
pub const RAMP_UP_SAMPLES: u64 = 3;

/// Samples that must pass after a trigger before the next one may fire.
pub const DEBOUNCE_SAMPLES: u64 = 1;

/// Direction of travel derived from the smoothed velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    /// Pointer position the ray starts from.
    pub origin: Vec2,
    /// Unit vector along the smoothed velocity.
    pub direction: Vec2,
    /// Smoothed speed in px/sample.
    pub speed: f64,
}

/// Mutable per-engine motion state.
#[derive(Debug, Clone, Default)]
pub struct MotionState {
    /// Position reported by the latest sample.
    position: Vec2,
    /// Smoothed velocity in px/sample.
    velocity: Vec2,
    /// Samples processed so far (the first sample is number 1).
    sample_count: u64,
    /// Sample number of the most recent trigger, 0 if none yet.
    last_trigger_sample: u64,
}

impl MotionState {
    /// Create a motion state at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Smoothing factor applied to the given (1-based) sample number.
    pub fn smoothing_factor(sample_number: u64) -> f64 {
        // Ramp-up covers samples 1 through 3 inclusive, not just 1 and 2.
        if sample_number <= RAMP_UP_SAMPLES {
            RAMP_UP_SMOOTHING
        } else {
            STEADY_SMOOTHING
        }
    }

    /// Fold a sample into the state and return the new smoothed speed.
    pub fn update(&mut self, sample: &MotionSample) -> f64 {
        self.sample_count = self.sample_count.saturating_add(1);

        let smooth = Self::smoothing_factor(self.sample_count);
        self.velocity = Vec2::new(
            self.velocity.x * smooth + sample.dx * (1.0 - smooth),
            self.velocity.y * smooth + sample.dy * (1.0 - smooth),
        );
        self.position = sample.position();

        let speed = self.speed();
        tracing::trace!(
            sample = self.sample_count,
            vx = self.velocity.x,
            vy = self.velocity.y,
            speed,
            "Motion sample"
        );
        speed
    }

    /// Heading along the smoothed velocity, or `None` when the pointer is
    /// slower than `min_speed` or the velocity cannot be normalized. A
    /// non-finite speed never yields a heading.
    pub fn heading(&self, min_speed: f64) -> Option<Heading> {
        let speed = self.speed();
        if !speed.is_finite() || speed < min_speed || speed == 0.0 {
            return None;
        }

        Some(Heading {
            origin: self.position,
            direction: self.velocity.scale(1.0 / speed),
            speed,
        })
    }

    /// Whether enough samples have passed since the last trigger.
    pub fn debounce_elapsed(&self) -> bool {
        self.sample_count - self.last_trigger_sample > DEBOUNCE_SAMPLES
    }

    /// Record that the current sample produced a trigger.
    pub fn record_trigger(&mut self) {
        self.last_trigger_sample = self.sample_count;
    }

    /// Position from the latest sample.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Smoothed velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Smoothed speed.
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Samples processed so far.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Sample number of the last trigger (0 if none).
    pub fn last_trigger_sample(&self) -> u64 {
        self.last_trigger_sample
    }
}
