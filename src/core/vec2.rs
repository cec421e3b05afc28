//! 2D Geometry
//!
//! `Point` and `Rect` are integer room-space coordinates (everything the room
//! generator draws is an integer). `Vec2` is a float vector used for
//! projectile velocities and fire directions.

use std::fmt;
use serde::{Serialize, Deserialize};

// =============================================================================
// POINT
// =============================================================================

/// Integer position in room space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }

    /// Offset by a delta.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// RECT
// =============================================================================

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

// =============================================================================
// VEC2
// =============================================================================

/// 2D float vector.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Unit vector pointing right (+X)
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };

    /// Unit vector pointing down (+Y in screen space)
    pub const DOWN: Self = Self { x: 0.0, y: 1.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Normalize to unit length.
    /// Returns ZERO if length is zero or not finite.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// True if either component is non-zero.
    #[inline]
    pub fn is_nonzero(self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }

    /// Both components finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Reflect the dominant axis and scale both components.
    ///
    /// The component with the larger magnitude (x wins only when strictly
    /// larger) is negated; then the whole vector is multiplied by `retention`.
    #[inline]
    pub fn reflect_dominant(self, retention: f64) -> Self {
        let reflected = if self.x.abs() > self.y.abs() {
            Self::new(-self.x, self.y)
        } else {
            Self::new(self.x, -self.y)
        };
        reflected.scale(retention)
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({:.3}, {:.3})", self.x, self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_point_distance_full_range() {
        // Differences are taken in f64, so opposite corners of the i32 range
        // neither overflow nor panic
        let a = Point::new(i32::MIN, i32::MIN);
        let b = Point::new(i32::MAX, i32::MAX);
        let expected = (u32::MAX as f64) * std::f64::consts::SQRT_2;
        assert!((a.distance(b) - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_point_offset_saturates() {
        let p = Point::new(i32::MAX - 1, 0).offset(5, -3);
        assert_eq!(p, Point::new(i32::MAX, -3));
    }

    #[test]
    fn test_vec2_length() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.scale(2.0), Vec2::new(6.0, 8.0));
    }

    #[test]
    fn test_vec2_normalize() {
        let norm = Vec2::new(3.0, 4.0).normalize();
        assert!((norm.length() - 1.0).abs() < 1e-12);
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        assert_eq!(Vec2::new(f64::NAN, 1.0).normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_reflect_dominant_x() {
        let v = Vec2::new(100.0, 50.0).reflect_dominant(0.8);
        assert_eq!(v, Vec2::new(-80.0, 40.0));
    }

    #[test]
    fn test_reflect_dominant_y_on_tie() {
        // Equal magnitudes reflect y
        let v = Vec2::new(10.0, -10.0).reflect_dominant(0.5);
        assert_eq!(v, Vec2::new(5.0, 5.0));
    }
}
