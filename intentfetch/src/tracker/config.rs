//! Configuration for the intent tracker adapter.

use std::time::Duration;

use crate::intent::ConfigError;

/// Default pointer event stride: forward every 4th event (~66ms at 60fps).
pub const DEFAULT_POINTER_STRIDE: u32 = 4;

/// Default interval between batched rectangle refreshes in milliseconds.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 300;

/// Configuration for [`IntentTracker`](super::IntentTracker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Forward one of every `pointer_stride` raw pointer events.
    ///
    /// The debounce is counted in forwarded samples, so this directly sets
    /// the trigger cadence. Default: 4.
    pub pointer_stride: u32,

    /// Interval between rectangle refreshes. Default: 300ms.
    pub refresh_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            pointer_stride: DEFAULT_POINTER_STRIDE,
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MS),
        }
    }
}

impl TrackerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pointer stride.
    pub fn with_pointer_stride(mut self, stride: u32) -> Self {
        self.pointer_stride = stride;
        self
    }

    /// Set the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Check that the stride and interval are non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pointer_stride == 0 {
            return Err(ConfigError::NonPositive {
                field: "pointer_stride",
                value: 0.0,
            });
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::NonPositive {
                field: "refresh_interval_ms",
                value: 0.0,
            });
        }
        Ok(())
    }
}
