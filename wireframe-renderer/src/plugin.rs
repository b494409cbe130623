//! Shape plugin contract.
//!
//! One [`ShapePlugin`] implementation exists per shape kind. Plugins declare
//! their defaults and draw into a [`RenderContext`]: the shape being drawn,
//! its local content rectangle and a node on the surface to draw into.

use std::sync::Arc;

use wireframe_core::{Appearance, Rect2, Shape, Vec2};

use crate::configurable::{Configurable, ConfigurableFactory};
use crate::constraint::{Constraint, ConstraintFactory};
use crate::surface::{NodeId, NodeKind, Stroke, Surface, TextAlignment};

/// Drawing logic and defaults for one kind of shape.
pub trait ShapePlugin: Send + Sync {
    /// Registry key, stored in [`Shape::renderer`].
    fn identifier(&self) -> &str;

    /// Every appearance key this plugin understands, with its default value.
    fn default_appearance(&self) -> Appearance;

    /// Size of a newly placed shape.
    fn default_size(&self) -> Vec2;

    /// Optional content-driven sizing policy.
    fn constraint(&self, _factory: &ConstraintFactory) -> Option<Arc<dyn Constraint>> {
        None
    }

    /// Editable properties for a property panel.
    fn configurables(&self, _factory: &ConfigurableFactory) -> Vec<Configurable> {
        Vec::new()
    }

    /// Draw the shape into `ctx`, in local coordinates of [`RenderContext::rect`].
    fn render(&self, ctx: &mut RenderContext<'_>);
}

/// What a plugin draws into.
pub struct RenderContext<'a> {
    shape: &'a Shape,
    rect: Rect2,
    surface: &'a mut Surface,
    target: NodeId,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(shape: &'a Shape, surface: &'a mut Surface, target: NodeId) -> Self {
        let size = shape.transform.size();
        Self {
            shape,
            rect: Rect2::new(0.0, 0.0, size.x, size.y),
            surface,
            target,
        }
    }

    /// The shape being drawn.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        self.shape
    }

    /// Content rectangle: origin at zero, sized like the shape.
    #[must_use]
    pub fn rect(&self) -> Rect2 {
        self.rect
    }

    /// Direct access to the surface.
    pub fn surface(&mut self) -> &mut Surface {
        &mut *self.surface
    }

    /// The node primitives are appended to.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// String appearance value, or `default`.
    #[must_use]
    pub fn str_value<'s>(&'s self, key: &str, default: &'s str) -> &'s str {
        self.shape.appearance_str(key).unwrap_or(default)
    }

    /// Numeric appearance value, or `default`.
    #[must_use]
    pub fn f32_value(&self, key: &str, default: f32) -> f32 {
        self.shape.appearance_f32(key).unwrap_or(default)
    }

    /// Color appearance value as a CSS color, or `default`.
    ///
    /// Accepts strings and packed `0xRRGGBB` numbers.
    #[must_use]
    pub fn color_value(&self, key: &str, default: &str) -> String {
        match self.shape.appearance.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .map_or_else(|| default.to_string(), |v| format!("#{:06x}", v & 0x00ff_ffff)),
            _ => default.to_string(),
        }
    }

    /// Draw a rectangle.
    pub fn rectangle(&mut self, bounds: Rect2, radius: f32) -> Primitive<'_> {
        let kind = NodeKind::Rect {
            radius: radius.max(0.0),
        };
        self.primitive(kind, bounds)
    }

    /// Draw an ellipse inscribed in `bounds`.
    pub fn ellipse(&mut self, bounds: Rect2) -> Primitive<'_> {
        self.primitive(NodeKind::Ellipse, bounds)
    }

    /// Draw text laid out in `bounds`.
    pub fn text(
        &mut self,
        bounds: Rect2,
        content: &str,
        font_size: f32,
        font_family: &str,
        alignment: TextAlignment,
    ) -> Primitive<'_> {
        let kind = NodeKind::Text {
            content: content.to_string(),
            font_size,
            font_family: font_family.to_string(),
            alignment,
        };
        self.primitive(kind, bounds)
    }

    /// Draw an SVG path.
    pub fn path(&mut self, data: &str) -> Primitive<'_> {
        let kind = NodeKind::Path {
            data: data.to_string(),
        };
        let bounds = self.rect;
        self.primitive(kind, bounds)
    }

    fn primitive(&mut self, kind: NodeKind, bounds: Rect2) -> Primitive<'_> {
        let id = self.surface.create(kind);
        self.surface.append(self.target, id);
        if let Some(node) = self.surface.node_mut(id) {
            node.set_bounds(bounds);
        }
        Primitive {
            surface: &mut *self.surface,
            id,
        }
    }
}

/// Styling handle for a primitive just drawn by a [`RenderContext`].
pub struct Primitive<'a> {
    surface: &'a mut Surface,
    id: NodeId,
}

impl Primitive<'_> {
    /// Node handle of the primitive.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Set the fill color.
    pub fn fill(&mut self, color: &str) -> &mut Self {
        if let Some(node) = self.surface.node_mut(self.id) {
            node.set_fill(Some(color.to_string()));
        }
        self
    }

    /// Set the stroke. Non-positive widths remove the stroke.
    pub fn stroke(&mut self, color: &str, width: f32) -> &mut Self {
        let stroke = (width > 0.0).then(|| Stroke {
            color: color.to_string(),
            width,
        });
        if let Some(node) = self.surface.node_mut(self.id) {
            node.set_stroke(stroke);
        }
        self
    }

    /// Set the opacity.
    pub fn opacity(&mut self, opacity: f32) -> &mut Self {
        if let Some(node) = self.surface.node_mut(self.id) {
            node.set_opacity(opacity);
        }
        self
    }
}
