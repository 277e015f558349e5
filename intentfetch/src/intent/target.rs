//! Target and motion-sample value types.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Vec2};

/// Opaque identifier for a navigation target (typically an href).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Create a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for TargetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for TargetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TargetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A navigation target: an id plus its most recently measured rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub rect: Rect,
}

impl Target {
    /// Create a new target.
    pub fn new(id: impl Into<TargetId>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }
}

/// One pointer-motion sample: the new position and the raw delta since
/// the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl MotionSample {
    /// Create a new sample.
    pub const fn new(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self { x, y, dx, dy }
    }

    /// Pointer position.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Raw delta.
    pub fn delta(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }
}
