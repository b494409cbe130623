//! Plain geometry values shared by the model and the renderer.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector, used for positions and sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Rotate this point around `center` by `rotation`.
    #[must_use]
    pub fn rotate_around(self, center: Self, rotation: Rotation) -> Self {
        let (sin, cos) = rotation.radian().sin_cos();
        let d = self - center;
        Self::new(
            center.x + d.x * cos - d.y * sin,
            center.y + d.x * sin + d.y * cos,
        )
    }

    /// Check both components are within `epsilon` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect2 {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest rectangle containing all `points`.
    ///
    /// Returns an empty rectangle at the origin when `points` is empty.
    #[must_use]
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));

        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// The smallest rectangle containing every rectangle in `rects`.
    #[must_use]
    pub fn union(rects: &[Self]) -> Self {
        let points: Vec<Vec2> = rects
            .iter()
            .flat_map(|r| [r.top_left(), r.bottom_right()])
            .collect();
        Self::from_points(&points)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Size as a vector.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Shrink the rectangle by `dx` on the left and right and `dy` on top and bottom.
    ///
    /// The size never goes below zero.
    #[must_use]
    pub fn deflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            (self.width - 2.0 * dx).max(0.0),
            (self.height - 2.0 * dy).max(0.0),
        )
    }
}

/// A rotation angle stored in degrees and normalized to `[0, 360)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Rotation {
    degree: f32,
}

impl Rotation {
    /// No rotation.
    pub const ZERO: Self = Self { degree: 0.0 };

    /// Create a rotation from degrees.
    #[must_use]
    pub fn from_degree(degree: f32) -> Self {
        let degree = if degree.is_finite() {
            degree.rem_euclid(360.0)
        } else {
            0.0
        };
        Self { degree }
    }

    /// Create a rotation from radians.
    #[must_use]
    pub fn from_radian(radian: f32) -> Self {
        Self::from_degree(radian.to_degrees())
    }

    /// The angle in degrees.
    #[must_use]
    pub const fn degree(self) -> f32 {
        self.degree
    }

    /// The angle in radians.
    #[must_use]
    pub fn radian(self) -> f32 {
        self.degree.to_radians()
    }
}

impl Add for Rotation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_degree(self.degree + rhs.degree)
    }
}

impl From<f32> for Rotation {
    fn from(degree: f32) -> Self {
        Self::from_degree(degree)
    }
}

impl From<Rotation> for f32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_normalizes() {
        assert!((Rotation::from_degree(370.0).degree() - 10.0).abs() < 1e-4);
        assert!((Rotation::from_degree(-90.0).degree() - 270.0).abs() < 1e-4);
        assert_eq!(Rotation::from_degree(f32::NAN), Rotation::ZERO);
    }

    #[test]
    fn test_rotate_around_quarter_turn() {
        let p = Vec2::new(10.0, 0.0).rotate_around(Vec2::ZERO, Rotation::from_degree(90.0));
        assert!(p.approx_eq(Vec2::new(0.0, 10.0), 1e-4));
    }

    #[test]
    fn test_rect_from_points() {
        let rect = Rect2::from_points(&[Vec2::new(5.0, 1.0), Vec2::new(-2.0, 4.0)]);
        assert_eq!(rect, Rect2::new(-2.0, 1.0, 7.0, 3.0));
        assert_eq!(Rect2::from_points(&[]), Rect2::default());
    }

    #[test]
    fn test_deflate_never_negative() {
        let rect = Rect2::new(0.0, 0.0, 10.0, 4.0).deflate(3.0, 3.0);
        assert_eq!(rect, Rect2::new(3.0, 3.0, 4.0, 0.0));
    }
}
