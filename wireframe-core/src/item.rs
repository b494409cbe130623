//! Diagram items - the shapes and groups a diagram is built from.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::appearance::Appearance;
use crate::{DiagramContainer, Transform};

/// Unique identifier for an item within a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new unique item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Key of a registered shape plugin, e.g. `"Button"`.
pub type RendererId = String;

/// A drawable leaf bound to a renderer plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier.
    pub id: ItemId,
    /// Renderer plugin that draws this shape.
    pub renderer: RendererId,
    /// Position, size and rotation.
    pub transform: Transform,
    /// Style values keyed by appearance key.
    #[serde(default)]
    pub appearance: Appearance,
    /// Opacity from 0 (invisible) to 1.
    #[serde(default = "default_opacity", deserialize_with = "deserialize_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

/// Clamp to `[0, 1]`; non-finite values become fully opaque.
fn sanitize_opacity(opacity: f32) -> f32 {
    if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        default_opacity()
    }
}

/// `null` is how JSON writers encode a NaN opacity.
fn deserialize_opacity<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let opacity = Option::<f32>::deserialize(deserializer)?;
    Ok(opacity.map_or_else(default_opacity, sanitize_opacity))
}

impl Shape {
    /// Create a fully opaque shape with an empty appearance.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, renderer: impl Into<RendererId>, transform: Transform) -> Self {
        Self {
            id: id.into(),
            renderer: renderer.into(),
            transform,
            appearance: Appearance::new(),
            opacity: 1.0,
        }
    }

    /// Set an appearance value.
    #[must_use]
    pub fn with_appearance(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.appearance.insert(key.into(), value);
        self
    }

    /// Replace the whole appearance map.
    #[must_use]
    pub fn with_appearance_map(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Set the opacity, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = sanitize_opacity(opacity);
        self
    }

    /// Replace the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// String appearance value.
    #[must_use]
    pub fn appearance_str(&self, key: &str) -> Option<&str> {
        self.appearance.get(key).and_then(serde_json::Value::as_str)
    }

    /// Numeric appearance value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn appearance_f32(&self, key: &str) -> Option<f32> {
        self.appearance
            .get(key)
            .and_then(serde_json::Value::as_f64)
            .map(|v| v as f32)
    }

    /// Boolean appearance value.
    #[must_use]
    pub fn appearance_bool(&self, key: &str) -> Option<bool> {
        self.appearance.get(key).and_then(serde_json::Value::as_bool)
    }
}

/// A non-drawable container of child items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier.
    pub id: ItemId,
    /// Bounds of the group.
    pub transform: Transform,
    /// Children in paint order.
    #[serde(default)]
    pub child_ids: DiagramContainer,
}

impl Group {
    /// Create a group.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, transform: Transform, child_ids: DiagramContainer) -> Self {
        Self {
            id: id.into(),
            transform,
            child_ids,
        }
    }
}

/// An item in a diagram: a shape or a group.
///
/// The payload is reference counted so diagram snapshots share unchanged items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DiagramItem {
    /// A drawable shape.
    Shape(Arc<Shape>),
    /// A group of items.
    Group(Arc<Group>),
}

impl DiagramItem {
    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Shape(shape) => &shape.id,
            Self::Group(group) => &group.id,
        }
    }

    /// Position, size and rotation.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        match self {
            Self::Shape(shape) => &shape.transform,
            Self::Group(group) => &group.transform,
        }
    }

    /// The shape payload, if this is a shape.
    #[must_use]
    pub fn as_shape(&self) -> Option<&Arc<Shape>> {
        match self {
            Self::Shape(shape) => Some(shape),
            Self::Group(_) => None,
        }
    }

    /// The group payload, if this is a group.
    #[must_use]
    pub fn as_group(&self) -> Option<&Arc<Group>> {
        match self {
            Self::Group(group) => Some(group),
            Self::Shape(_) => None,
        }
    }

    /// Whether both values point at the same payload allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &DiagramItem) -> bool {
        match (self, other) {
            (Self::Shape(a), Self::Shape(b)) => Arc::ptr_eq(a, b),
            (Self::Group(a), Self::Group(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Copy with a different transform.
    #[must_use]
    pub fn with_transform(&self, transform: Transform) -> Self {
        match self {
            Self::Shape(shape) => {
                Self::Shape(Arc::new(Shape::clone(shape).with_transform(transform)))
            }
            Self::Group(group) => Self::Group(Arc::new(Group {
                transform,
                ..Group::clone(group)
            })),
        }
    }

    /// Copy with the transform re-mapped from `old_bounds` to `new_bounds`.
    #[must_use]
    pub fn transform_by_bounds(&self, old_bounds: &Transform, new_bounds: &Transform) -> Self {
        self.with_transform(self.transform().transform_by_bounds(old_bounds, new_bounds))
    }
}

impl From<Shape> for DiagramItem {
    fn from(shape: Shape) -> Self {
        Self::Shape(Arc::new(shape))
    }
}

impl From<Group> for DiagramItem {
    fn from(group: Group) -> Self {
        Self::Group(Arc::new(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rotation, Vec2};

    #[test]
    fn test_item_ids_are_unique() {
        assert_ne!(ItemId::new(), ItemId::new());
    }

    #[test]
    fn test_opacity_is_clamped() {
        let shape = Shape::new("a", "Button", Transform::default()).with_opacity(3.0);
        assert!((shape.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_loaded_opacity_is_sanitized() {
        let load = |opacity: serde_json::Value| -> f32 {
            let json = serde_json::json!({
                "type": "Shape",
                "id": "a",
                "renderer": "Button",
                "transform": { "position": { "x": 0.0, "y": 0.0 }, "size": { "x": 1.0, "y": 1.0 } },
                "opacity": opacity
            });
            let item: DiagramItem = serde_json::from_value(json).expect("deserialize");
            item.as_shape().expect("shape").opacity
        };

        assert!((load(serde_json::json!(7.5)) - 1.0).abs() < f32::EPSILON);
        assert!(load(serde_json::json!(-2.0)).abs() < f32::EPSILON);
        assert!((load(serde_json::json!(0.25)) - 0.25).abs() < f32::EPSILON);
        assert!((load(serde_json::Value::Null) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_nan_opacity_survives_a_save() {
        let mut shape = Shape::new("a", "Button", Transform::default());
        shape.opacity = f32::NAN;
        let json = serde_json::to_string(&DiagramItem::from(shape)).expect("serialize");

        let back: DiagramItem = serde_json::from_str(&json).expect("deserialize");
        let restored = back.as_shape().expect("shape");
        assert!((restored.opacity - 1.0).abs() < f32::EPSILON);
        assert_eq!(Shape::clone(restored), **restored);
    }

    #[test]
    fn test_with_transform_keeps_original() {
        let item = DiagramItem::from(Shape::new("a", "Button", Transform::default()));
        let moved = item.with_transform(Transform::new(
            Vec2::new(5.0, 5.0),
            Vec2::new(1.0, 1.0),
            Rotation::ZERO,
        ));

        assert!(!item.ptr_eq(&moved));
        assert_eq!(item.transform(), &Transform::default());
        assert_eq!(moved.id(), item.id());
    }

    #[test]
    fn test_shape_serializes_with_type_tag() {
        let item = DiagramItem::from(
            Shape::new("a", "Button", Transform::default())
                .with_appearance("TEXT", serde_json::json!("Ok")),
        );
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["type"], "Shape");
        assert_eq!(json["appearance"]["TEXT"], "Ok");

        let back: DiagramItem = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, item);
    }
}
