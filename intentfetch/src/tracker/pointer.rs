//! Raw pointer events to motion samples.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::intent::MotionSample;

/// A raw pointer position as reported by the input system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    /// Create a new pointer event.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Throttles raw pointer events into motion samples.
///
/// Only every `stride`-th event is forwarded. Deltas are measured from the
/// previously forwarded position, which starts at the origin.
#[derive(Debug, Clone)]
pub struct PointerThrottle {
    stride: u64,
    events_seen: u64,
    last: Vec2,
}

impl PointerThrottle {
    /// Create a throttle forwarding every `stride`-th event.
    ///
    /// A stride of 0 is treated as 1.
    pub fn new(stride: u32) -> Self {
        Self {
            stride: u64::from(stride.max(1)),
            events_seen: 0,
            last: Vec2::ZERO,
        }
    }

    /// Feed one raw event; returns a sample when this event is forwarded.
    pub fn sample(&mut self, event: PointerEvent) -> Option<MotionSample> {
        self.events_seen = self.events_seen.wrapping_add(1);
        if self.events_seen % self.stride != 0 {
            return None;
        }

        let dx = event.x - self.last.x;
        let dy = event.y - self.last.y;
        self.last = Vec2::new(event.x, event.y);

        Some(MotionSample::new(event.x, event.y, dx, dy))
    }

    /// Events seen so far, forwarded or not.
    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }
}
