//! Screen-space geometry primitives.
//!
//! All coordinates are in CSS-pixel-like units with the origin at the
//! top-left corner of the viewport, `x` growing right and `y` growing down.
//! Nothing here validates its inputs: zero-area, inverted and non-finite
//! rectangles are all representable, and the scorer tolerates them.

use serde::{Deserialize, Serialize};

/// A two-dimensional vector (or point) in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a new vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scale both components by `factor`.
    pub fn scale(&self, factor: f64) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle given by its four bounds.
///
/// Rectangles are measured by the caller and replaced wholesale on every
/// refresh; the engine never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its bounds.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Horizontal extent (`right - left`).
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent (`bottom - top`).
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_origin_size() {
        let rect = Rect::from_origin_size(500.0, 300.0, 100.0, 40.0);
        assert_eq!(rect, Rect::new(500.0, 300.0, 600.0, 340.0));
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 40.0);
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(500.0, 280.0, 600.0, 320.0);
        assert_eq!(rect.center(), Vec2::new(550.0, 300.0));
    }

    #[test]
    fn test_degenerate_rect() {
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 0.0);
        assert_eq!(rect.center(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_inverted_rect_has_negative_extent() {
        let rect = Rect::new(100.0, 50.0, 0.0, 0.0);
        assert_eq!(rect.width(), -100.0);
        assert_eq!(rect.height(), -50.0);
        assert_eq!(rect.center(), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_vec2_ops() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.dot(Vec2::new(1.0, 0.0)), 3.0);
        assert_eq!(v.scale(2.0), Vec2::new(6.0, 8.0));
        assert_eq!(v - Vec2::new(1.0, 1.0), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_length_of_huge_vector_stays_finite() {
        let v = Vec2::new(1e200, 1e200);
        assert!(v.length().is_finite());
        assert!((v.length() / 1e200 - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
