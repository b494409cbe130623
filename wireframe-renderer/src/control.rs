//! Plugin wrapper that owns the shared parts of drawing a shape.
//!
//! Every shape node has the same layout:
//!
//! ```text
//! group (placement, opacity)
//! ├── background rect   near-transparent hit area
//! ├── debug outline     only when requested
//! └── content group     cleared and redrawn by the plugin on every render
//! ```

use std::fmt;
use std::sync::Arc;

use wireframe_core::{Appearance, ItemId, Rect2, RendererId, Rotation, Shape, Transform, Vec2};

use crate::configurable::{Configurable, ConfigurableFactory};
use crate::constraint::{Constraint, ConstraintFactory};
use crate::plugin::{RenderContext, ShapePlugin};
use crate::surface::{NodeId, NodeKind, Placement, Stroke, Surface};

const BACKGROUND_FILL: &str = "#ffffff";
const BACKGROUND_OPACITY: f32 = 0.001;
const DEBUG_STROKE: &str = "#ff0000";

/// Per-call render switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Add a red outline to newly created nodes.
    pub debug: bool,
    /// Leave the node opacity untouched.
    pub no_opacity: bool,
    /// Leave the node placement untouched.
    pub no_transform: bool,
}

/// Everything needed to place a new shape of one kind.
#[derive(Debug, Clone)]
pub struct ShapeDefaults {
    /// Renderer key.
    pub renderer: RendererId,
    /// Initial size.
    pub size: Vec2,
    /// Initial appearance.
    pub appearance: Appearance,
    /// Editable properties.
    pub configurables: Vec<Configurable>,
    /// Sizing policy, if any.
    pub constraint: Option<Arc<dyn Constraint>>,
}

impl ShapeDefaults {
    /// Build a shape centered at `position`, sized by the constraint if one exists.
    #[must_use]
    pub fn into_shape(self, id: impl Into<ItemId>, position: Vec2) -> Shape {
        let transform = Transform::new(position, self.size, Rotation::ZERO);
        let shape = Shape::new(id, self.renderer, transform).with_appearance_map(self.appearance);

        match &self.constraint {
            Some(constraint) => {
                let size = constraint.update_size(&shape, self.size, None);
                let transform = shape.transform.with_size(size);
                shape.with_transform(transform)
            }
            None => shape,
        }
    }
}

/// A registered shape plugin.
#[derive(Clone)]
pub struct Control {
    plugin: Arc<dyn ShapePlugin>,
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("identifier", &self.identifier())
            .finish()
    }
}

impl Control {
    /// Wrap a plugin.
    #[must_use]
    pub fn new<P: ShapePlugin + 'static>(plugin: P) -> Self {
        Self {
            plugin: Arc::new(plugin),
        }
    }

    /// Registry key of the plugin.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.plugin.identifier()
    }

    /// Default appearance of the plugin.
    #[must_use]
    pub fn default_appearance(&self) -> Appearance {
        self.plugin.default_appearance()
    }

    /// Defaults for a new shape. Its constraint measures text like `surface`.
    #[must_use]
    pub fn create_default_shape(&self, surface: &Surface) -> ShapeDefaults {
        let constraints = ConstraintFactory::for_surface(surface);
        ShapeDefaults {
            renderer: self.identifier().to_string(),
            size: self.plugin.default_size(),
            appearance: self.plugin.default_appearance(),
            configurables: self.plugin.configurables(&ConfigurableFactory),
            constraint: self.plugin.constraint(&constraints),
        }
    }

    /// Bind subsequent renders to `parent` on `surface`.
    pub fn set_context<'a>(&'a self, surface: &'a mut Surface, parent: NodeId) -> ControlContext<'a> {
        ControlContext {
            control: self,
            surface,
            parent,
        }
    }
}

/// A [`Control`] bound to an attachment point.
pub struct ControlContext<'a> {
    control: &'a Control,
    surface: &'a mut Surface,
    parent: NodeId,
}

impl ControlContext<'_> {
    /// Draw `shape`, reusing `existing` if it is still alive.
    ///
    /// New nodes are appended to the context parent; existing nodes keep their
    /// attachment. Rendering the same shape twice yields the same node tree.
    pub fn render(&mut self, shape: &Shape, existing: Option<NodeId>, options: RenderOptions) -> NodeId {
        let reused = existing.filter(|id| self.surface.contains(*id));
        let node = reused.unwrap_or_else(|| self.create_base(options.debug));

        let size = shape.transform.size();
        let rect = Rect2::new(0.0, 0.0, size.x, size.y);
        let content = self.prepare_content(node, rect);

        let mut ctx = RenderContext::new(shape, self.surface, content);
        self.control.plugin.render(&mut ctx);

        if let Some(group) = self.surface.node_mut(node) {
            if !options.no_transform {
                let transform = &shape.transform;
                group.set_placement(Placement {
                    translate: transform.top_left(),
                    rotation: transform.rotation(),
                    center: transform.position(),
                });
            }
            if !options.no_opacity {
                group.set_opacity(shape.opacity);
            }
        }

        if reused.is_none() {
            self.surface.append(self.parent, node);
        }
        node
    }

    fn create_base(&mut self, debug: bool) -> NodeId {
        let group = self.surface.create(NodeKind::Group);

        let background = self.surface.create(NodeKind::Rect { radius: 0.0 });
        if let Some(node) = self.surface.node_mut(background) {
            node.set_fill(Some(BACKGROUND_FILL.to_string()))
                .set_opacity(BACKGROUND_OPACITY);
        }
        self.surface.append(group, background);

        if debug {
            let outline = self.surface.create(NodeKind::Rect { radius: 0.0 });
            if let Some(node) = self.surface.node_mut(outline) {
                node.set_fill(Some(BACKGROUND_FILL.to_string()))
                    .set_stroke(Some(Stroke {
                        color: DEBUG_STROKE.to_string(),
                        width: 1.0,
                    }));
            }
            self.surface.append(group, outline);
        }

        let content = self.surface.create(NodeKind::Group);
        self.surface.append(group, content);
        group
    }

    /// Size the base rects to `rect` and return the emptied content group.
    fn prepare_content(&mut self, node: NodeId, rect: Rect2) -> NodeId {
        let children = self.surface.children(node).to_vec();

        let is_group = |id: &NodeId| {
            self.surface
                .node(*id)
                .is_some_and(|n| matches!(n.kind(), NodeKind::Group))
        };

        let content = match children.last() {
            Some(last) if is_group(last) => *last,
            _ => {
                let content = self.surface.create(NodeKind::Group);
                self.surface.append(node, content);
                content
            }
        };

        for base in children.iter().filter(|c| **c != content) {
            if let Some(n) = self.surface.node_mut(*base) {
                n.set_bounds(rect);
            }
        }
        self.surface.truncate_children(content, 0);
        content
    }
}
