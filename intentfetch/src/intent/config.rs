//! Configuration for the trajectory scorer.
//!
//! All three tuning options are optional and default to values that work
//! for mouse input sampled roughly every 66ms. Validation happens once, when
//! the engine is built; a running engine never rejects input.

use super::error::ConfigError;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default hard cutoff on the winning score.
pub const DEFAULT_MAX_REACH: f64 = 500.0;

/// Default multiplier applied to perpendicular offset when scoring.
pub const DEFAULT_PERP_WEIGHT: f64 = 5.0;

/// Default smoothed speed (px/sample) below which nothing is evaluated.
pub const DEFAULT_MIN_SPEED: f64 = 8.0;

/// Configuration for [`PrefetchIntent`](super::PrefetchIntent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentConfig {
    /// Maximum score a winner may have.
    ///
    /// Compared against the score (`along + perp * perp_weight`), not the
    /// raw distance, so off-axis targets reach the cutoff sooner.
    /// Default: 500.
    pub max_reach: f64,

    /// Penalty multiplier for perpendicular (off-axis) offset.
    ///
    /// Larger values demand tighter aim. Default: 5.
    pub perp_weight: f64,

    /// Minimum smoothed speed in px/sample.
    ///
    /// Below this the pointer is treated as idle. Default: 8.
    pub min_speed: f64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            max_reach: DEFAULT_MAX_REACH,
            perp_weight: DEFAULT_PERP_WEIGHT,
            min_speed: DEFAULT_MIN_SPEED,
        }
    }
}

impl IntentConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum reach.
    pub fn with_max_reach(mut self, max_reach: f64) -> Self {
        self.max_reach = max_reach;
        self
    }

    /// Set the perpendicular weight.
    pub fn with_perp_weight(mut self, perp_weight: f64) -> Self {
        self.perp_weight = perp_weight;
        self
    }

    /// Set the minimum speed.
    pub fn with_min_speed(mut self, min_speed: f64) -> Self {
        self.min_speed = min_speed;
        self
    }

    /// Check that every option is usable.
    ///
    /// - `max_reach` must be finite and greater than zero
    /// - `perp_weight` must be finite and non-negative
    /// - `min_speed` must be finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("max_reach", self.max_reach)?;
        require_finite("perp_weight", self.perp_weight)?;
        require_finite("min_speed", self.min_speed)?;

        if self.max_reach <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "max_reach",
                value: self.max_reach,
            });
        }
        require_non_negative("perp_weight", self.perp_weight)?;
        require_non_negative("min_speed", self.min_speed)?;

        Ok(())
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value < 0.0 {
        Err(ConfigError::Negative { field, value })
    } else {
        Ok(())
    }
}
