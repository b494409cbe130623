//! Retained drawing handle for one shape.

use std::sync::Arc;

use wireframe_core::Shape;

use crate::control::{Control, RenderOptions};
use crate::surface::{NodeId, Surface};

/// A shape's node on the surface plus what was last drawn into it.
#[derive(Debug)]
pub struct ShapeRef {
    control: Control,
    node: Option<NodeId>,
    index: Option<usize>,
    shape: Option<Arc<Shape>>,
    preview: Option<Arc<Shape>>,
    options: RenderOptions,
}

impl ShapeRef {
    /// Create an undrawn handle bound to `control`.
    #[must_use]
    pub fn new(control: Control, options: RenderOptions) -> Self {
        Self {
            control,
            node: None,
            index: None,
            shape: None,
            preview: None,
            options,
        }
    }

    /// The plugin drawing this shape.
    #[must_use]
    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Node on the surface, once drawn.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Position in paint order recorded by the last [`ShapeRef::check_index`].
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The committed shape last drawn.
    #[must_use]
    pub fn shape(&self) -> Option<&Arc<Shape>> {
        self.shape.as_ref()
    }

    /// The active preview override.
    #[must_use]
    pub fn preview(&self) -> Option<&Arc<Shape>> {
        self.preview.as_ref()
    }

    /// Record `index` as the new paint position.
    ///
    /// Returns `false` if a different position was recorded before.
    pub fn check_index(&mut self, index: usize) -> bool {
        let unchanged = !matches!(self.index, Some(previous) if previous != index);
        self.index = Some(index);
        unchanged
    }

    /// Detach the node, keeping it for reuse.
    pub fn remove(&self, surface: &mut Surface) {
        if let Some(node) = self.node {
            surface.detach(node);
        }
    }

    /// Destroy the node.
    pub fn destroy(&mut self, surface: &mut Surface) {
        if let Some(node) = self.node.take() {
            surface.destroy(node);
        }
    }

    /// Draw `shape` and make sure the node is attached to `container`.
    ///
    /// Skips the plugin when the same shape value is already drawn and attached
    /// with no preview active. Returns whether the plugin ran.
    pub fn render(&mut self, surface: &mut Surface, container: NodeId, shape: &Arc<Shape>) -> bool {
        let attached = self.node.is_some_and(|n| surface.is_attached(n));
        let same = self
            .shape
            .as_ref()
            .is_some_and(|s| Arc::ptr_eq(s, shape) || **s == **shape);

        self.shape = Some(Arc::clone(shape));

        if same && attached && self.preview.is_none() {
            return false;
        }

        let drawn = self.preview.clone().unwrap_or_else(|| Arc::clone(shape));
        self.draw(surface, container, &drawn);
        true
    }

    /// Override the drawn state with `preview`, or restore the committed shape
    /// with `None`. Returns whether the plugin ran.
    pub fn set_preview(
        &mut self,
        surface: &mut Surface,
        container: NodeId,
        preview: Option<Arc<Shape>>,
    ) -> bool {
        let changed = match (&self.preview, &preview) {
            (None, None) => false,
            (Some(a), Some(b)) => !(Arc::ptr_eq(a, b) || **a == **b),
            _ => true,
        };
        self.preview = preview;

        if !changed {
            return false;
        }

        let Some(drawn) = self.preview.clone().or_else(|| self.shape.clone()) else {
            return false;
        };
        self.draw(surface, container, &drawn);
        true
    }

    fn draw(&mut self, surface: &mut Surface, container: NodeId, shape: &Shape) {
        let node = self
            .control
            .set_context(surface, container)
            .render(shape, self.node, self.options);

        if !surface.is_attached(node) {
            surface.append(container, node);
        }
        self.node = Some(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{RenderContext, ShapePlugin};
    use wireframe_core::{Appearance, Rotation, Transform, Vec2};

    struct Plain;

    impl ShapePlugin for Plain {
        fn identifier(&self) -> &str {
            "Plain"
        }

        fn default_appearance(&self) -> Appearance {
            Appearance::new()
        }

        fn default_size(&self) -> Vec2 {
            Vec2::new(10.0, 10.0)
        }

        fn render(&self, ctx: &mut RenderContext<'_>) {
            let rect = ctx.rect();
            ctx.rectangle(rect, 0.0).fill("#000000");
        }
    }

    fn shape(x: f32) -> Arc<Shape> {
        let t = Transform::new(Vec2::new(x, 10.0), Vec2::new(10.0, 10.0), Rotation::ZERO);
        Arc::new(Shape::new("a", "Plain", t))
    }

    #[test]
    fn test_check_index_first_time_is_unchanged() {
        let mut r = ShapeRef::new(Control::new(Plain), RenderOptions::default());
        assert!(r.check_index(3));
        assert!(r.check_index(3));
        assert!(!r.check_index(1));
        assert_eq!(r.index(), Some(1));
    }

    #[test]
    fn test_render_skips_unchanged_shape() {
        let mut surface = Surface::new(100.0, 100.0);
        let root = surface.root();
        let mut r = ShapeRef::new(Control::new(Plain), RenderOptions::default());
        let s = shape(10.0);

        assert!(r.render(&mut surface, root, &s));
        assert!(!r.render(&mut surface, root, &s));
        assert!(r.render(&mut surface, root, &shape(20.0)));
        assert_eq!(surface.children(root).len(), 1);
    }

    #[test]
    fn test_render_reattaches_after_remove() {
        let mut surface = Surface::new(100.0, 100.0);
        let root = surface.root();
        let mut r = ShapeRef::new(Control::new(Plain), RenderOptions::default());
        let s = shape(10.0);

        r.render(&mut surface, root, &s);
        let node = r.node().expect("node");
        r.remove(&mut surface);
        assert!(!surface.is_attached(node));

        r.render(&mut surface, root, &s);
        assert_eq!(r.node(), Some(node));
        assert!(surface.is_attached(node));
    }

    #[test]
    fn test_preview_overrides_and_restores() {
        let mut surface = Surface::new(100.0, 100.0);
        let root = surface.root();
        let mut r = ShapeRef::new(Control::new(Plain), RenderOptions::default());
        r.render(&mut surface, root, &shape(10.0));
        let node = r.node().expect("node");

        assert!(r.set_preview(&mut surface, root, Some(shape(50.0))));
        let moved = surface.node(node).expect("node").placement().translate;
        assert_eq!(moved, Vec2::new(45.0, 5.0));

        assert!(r.set_preview(&mut surface, root, None));
        let restored = surface.node(node).expect("node").placement().translate;
        assert_eq!(restored, Vec2::new(5.0, 5.0));

        assert!(!r.set_preview(&mut surface, root, None));
    }

    #[test]
    fn test_destroy_frees_node() {
        let mut surface = Surface::new(100.0, 100.0);
        let root = surface.root();
        let mut r = ShapeRef::new(Control::new(Plain), RenderOptions::default());
        r.render(&mut surface, root, &shape(10.0));

        r.destroy(&mut surface);
        assert!(r.node().is_none());
        assert_eq!(surface.node_count(), 1);
    }
}
