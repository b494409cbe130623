//! Position, size and rotation of a diagram item.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect2, Rotation, Vec2};

/// Immutable placement of an item: center position, size and rotation.
///
/// Every mutator returns a new value. The size is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransform")]
pub struct Transform {
    position: Vec2,
    size: Vec2,
    rotation: Rotation,
}

#[derive(Deserialize)]
struct RawTransform {
    position: Vec2,
    size: Vec2,
    #[serde(default)]
    rotation: Rotation,
}

impl From<RawTransform> for Transform {
    fn from(raw: RawTransform) -> Self {
        Self::new(raw.position, raw.size, raw.rotation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ZERO, Rotation::ZERO)
    }
}

impl Transform {
    /// Create a new transform. Negative or non-finite size components become zero.
    #[must_use]
    pub fn new(position: Vec2, size: Vec2, rotation: Rotation) -> Self {
        Self {
            position,
            size: sanitize_size(size),
            rotation,
        }
    }

    /// Create an unrotated transform covering `rect`.
    #[must_use]
    pub fn create_from_rect(rect: Rect2) -> Self {
        Self::new(rect.center(), rect.size(), Rotation::ZERO)
    }

    /// Center position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Size.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Rotation around the center.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Top-left corner of the unrotated rectangle.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        self.position - self.size * 0.5
    }

    /// The unrotated rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect2 {
        let tl = self.top_left();
        Rect2::new(tl.x, tl.y, self.size.x, self.size.y)
    }

    /// Axis-aligned bounding box of the rotated rectangle.
    #[must_use]
    pub fn aabb(&self) -> Rect2 {
        let rect = self.rect();
        if self.rotation == Rotation::ZERO {
            return rect;
        }

        let corners = [
            rect.top_left(),
            Vec2::new(rect.x + rect.width, rect.y),
            rect.bottom_right(),
            Vec2::new(rect.x, rect.y + rect.height),
        ]
        .map(|p| p.rotate_around(self.position, self.rotation));

        Rect2::from_points(&corners)
    }

    /// Replace the position.
    #[must_use]
    pub fn with_position(&self, position: Vec2) -> Self {
        Self::new(position, self.size, self.rotation)
    }

    /// Replace the size.
    #[must_use]
    pub fn with_size(&self, size: Vec2) -> Self {
        Self::new(self.position, size, self.rotation)
    }

    /// Replace the rotation.
    #[must_use]
    pub fn with_rotation(&self, rotation: Rotation) -> Self {
        Self::new(self.position, self.size, rotation)
    }

    /// Move by `delta`.
    #[must_use]
    pub fn move_by(&self, delta: Vec2) -> Self {
        self.with_position(self.position + delta)
    }

    /// Resize to `size`, keeping the top-left corner in place.
    #[must_use]
    pub fn resize_to(&self, size: Vec2) -> Self {
        let size = sanitize_size(size);
        let top_left = self.top_left();
        Self::new(top_left + size * 0.5, size, self.rotation)
    }

    /// Add `delta` to the rotation.
    #[must_use]
    pub fn rotate_by(&self, delta: Rotation) -> Self {
        self.with_rotation(self.rotation + delta)
    }

    /// Re-express this transform relative to `old_bounds` and apply the same
    /// fractional offsets and sizes inside `new_bounds`.
    ///
    /// A zero width or height in `old_bounds` maps the corresponding fractions
    /// to 0. Rotation is unchanged.
    #[must_use]
    pub fn transform_by_bounds(&self, old_bounds: &Transform, new_bounds: &Transform) -> Self {
        let old_tl = old_bounds.top_left();
        let new_tl = new_bounds.top_left();
        let offset = self.top_left() - old_tl;

        let fraction = |value: f32, extent: f32| {
            if extent.abs() <= f32::EPSILON {
                0.0
            } else {
                value / extent
            }
        };

        let fx = fraction(offset.x, old_bounds.size.x);
        let fy = fraction(offset.y, old_bounds.size.y);
        let fw = fraction(self.size.x, old_bounds.size.x);
        let fh = fraction(self.size.y, old_bounds.size.y);

        let size = Vec2::new(fw * new_bounds.size.x, fh * new_bounds.size.y);
        let top_left = new_tl + Vec2::new(fx * new_bounds.size.x, fy * new_bounds.size.y);

        Self::new(top_left + size * 0.5, size, self.rotation)
    }

    /// Compare with `other` within `epsilon` on every component.
    #[must_use]
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.position.approx_eq(other.position, epsilon)
            && self.size.approx_eq(other.size, epsilon)
            && (self.rotation.degree() - other.rotation.degree()).abs() <= epsilon
    }
}

fn sanitize_size(size: Vec2) -> Vec2 {
    let clamp = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    Vec2::new(clamp(size.x), clamp(size.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(x: f32, y: f32, w: f32, h: f32) -> Transform {
        Transform::new(Vec2::new(x, y), Vec2::new(w, h), Rotation::ZERO)
    }

    #[test]
    fn test_size_is_never_negative() {
        let t = transform(0.0, 0.0, -5.0, 10.0);
        assert_eq!(t.size(), Vec2::new(0.0, 10.0));

        let t = t.with_size(Vec2::new(3.0, f32::INFINITY));
        assert_eq!(t.size(), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_bounds_scale_doubles_item() {
        // Item occupies the right half of the old bounds.
        let old_bounds = transform(50.0, 50.0, 100.0, 100.0);
        let new_bounds = transform(100.0, 100.0, 200.0, 200.0);
        let item = transform(75.0, 50.0, 50.0, 100.0);

        let mapped = item.transform_by_bounds(&old_bounds, &new_bounds);
        assert!(mapped.approx_eq(&transform(150.0, 100.0, 100.0, 200.0), 1e-3));
    }

    #[test]
    fn test_bounds_mapping_round_trips() {
        let old_bounds = transform(120.0, 80.0, 240.0, 160.0);
        let new_bounds = transform(300.0, 40.0, 90.0, 410.0);
        let item = transform(100.0, 90.0, 30.0, 20.0).with_rotation(Rotation::from_degree(33.0));

        let there = item.transform_by_bounds(&old_bounds, &new_bounds);
        let back = there.transform_by_bounds(&new_bounds, &old_bounds);

        assert!(back.approx_eq(&item, 1e-3));
        assert_eq!(there.rotation(), item.rotation());
    }

    #[test]
    fn test_zero_width_bounds_use_zero_fraction() {
        let old_bounds = transform(10.0, 50.0, 0.0, 100.0);
        let new_bounds = transform(100.0, 50.0, 40.0, 100.0);
        let item = transform(10.0, 50.0, 0.0, 20.0);

        let mapped = item.transform_by_bounds(&old_bounds, &new_bounds);
        assert!(mapped.position().x.is_finite());
        assert!((mapped.size().x).abs() < f32::EPSILON);
        assert!((mapped.top_left().x - new_bounds.top_left().x).abs() < 1e-4);
        assert!((mapped.size().y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_keeps_top_left() {
        let t = transform(50.0, 50.0, 100.0, 100.0).resize_to(Vec2::new(20.0, 40.0));
        assert!(t.top_left().approx_eq(Vec2::ZERO, 1e-4));
        assert!(t.position().approx_eq(Vec2::new(10.0, 20.0), 1e-4));
    }

    #[test]
    fn test_aabb_of_rotated_square() {
        let t = transform(0.0, 0.0, 10.0, 10.0).with_rotation(Rotation::from_degree(90.0));
        let aabb = t.aabb();
        assert!((aabb.width - 10.0).abs() < 1e-3);
        assert!((aabb.x + 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_deserialize_clamps_size() {
        let t: Transform = serde_json::from_str(
            r#"{"position":{"x":1.0,"y":2.0},"size":{"x":-4.0,"y":3.0},"rotation":45.0}"#,
        )
        .expect("should parse");
        assert_eq!(t.size(), Vec2::new(0.0, 3.0));
        assert!((t.rotation().degree() - 45.0).abs() < 1e-4);
    }
}
