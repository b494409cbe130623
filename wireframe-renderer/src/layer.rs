//! Incremental reconciler between a diagram and its retained shape nodes.
//!
//! A [`RenderLayer`] keeps one [`ShapeRef`] per drawn shape across passes. Each
//! pass runs in a fixed order so the handle map and the surface agree at every
//! step:
//!
//! ```text
//! flatten ─► remove stale refs ─► create missing refs ─► order check
//!                                                         │
//!            callback ◄── preview overlay ◄── draw ◄── full re-link (on mismatch)
//! ```
//!
//! Surface paint order is attachment order, so any index change detaches every
//! node and the draw step re-appends them in the new order.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use wireframe_core::{flatten_optional, Diagram, DiagramItem, ItemId, Shape};

use crate::control::RenderOptions;
use crate::error::{RenderError, RenderResult};
use crate::registry::RendererService;
use crate::shape_ref::ShapeRef;
use crate::surface::{NodeId, Surface};

/// Render layer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderLayerConfig {
    /// Draw a red outline around every newly created shape node.
    pub debug_outlines: bool,
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Handles created for shapes that appeared.
    pub created: usize,
    /// Handles destroyed for shapes that disappeared.
    pub removed: usize,
    /// Whether every handle was detached and re-attached to fix paint order.
    pub relinked: bool,
    /// Plugin render calls for committed shapes.
    pub drawn: usize,
    /// Plugin render calls caused by preview changes.
    pub previewed: usize,
    /// Shapes skipped because their renderer is not registered.
    pub skipped_unregistered: usize,
}

/// Completion callback invoked once per pass.
pub type RenderCallback = Box<dyn FnMut(&RenderStats)>;

/// Retained renderer for one diagram view.
pub struct RenderLayer {
    refs: HashMap<ItemId, ShapeRef>,
    container: NodeId,
    config: RenderLayerConfig,
    on_render: Option<RenderCallback>,
}

impl fmt::Debug for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLayer")
            .field("refs", &self.refs.len())
            .field("container", &self.container)
            .field("config", &self.config)
            .field("on_render", &self.on_render.is_some())
            .finish()
    }
}

impl RenderLayer {
    /// Create a layer drawing into `container`.
    #[must_use]
    pub fn new(container: NodeId) -> Self {
        Self::with_config(container, RenderLayerConfig::default())
    }

    /// Create a layer with explicit configuration.
    #[must_use]
    pub fn with_config(container: NodeId, config: RenderLayerConfig) -> Self {
        Self {
            refs: HashMap::new(),
            container,
            config,
            on_render: None,
        }
    }

    /// Set the completion callback.
    #[must_use]
    pub fn on_render<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&RenderStats) + 'static,
    {
        self.on_render = Some(Box::new(callback));
        self
    }

    /// Replace or clear the completion callback.
    pub fn set_on_render(&mut self, callback: Option<RenderCallback>) {
        self.on_render = callback;
    }

    /// The node shapes are attached to.
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> RenderLayerConfig {
        self.config
    }

    /// Number of retained handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether no handles are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Whether a handle exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.refs.contains_key(id)
    }

    /// The handle for `id`.
    #[must_use]
    pub fn shape_ref(&self, id: &ItemId) -> Option<&ShapeRef> {
        self.refs.get(id)
    }

    /// IDs of all retained handles, unordered.
    #[must_use]
    pub fn ids(&self) -> HashSet<&ItemId> {
        self.refs.keys().collect()
    }

    /// Run one reconciliation pass.
    ///
    /// With no diagram every handle is removed. Shapes whose renderer is not
    /// registered are skipped and logged. `preview` overrides the drawn state
    /// of the listed shapes; `None` clears every override.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StaleNode`] if the container node no longer
    /// exists. Nothing is changed in that case.
    pub fn render(
        &mut self,
        surface: &mut Surface,
        diagram: Option<&Diagram>,
        preview: Option<&[DiagramItem]>,
        registry: &RendererService,
    ) -> RenderResult<RenderStats> {
        if !surface.contains(self.container) {
            return Err(RenderError::StaleNode(format!("{:?}", self.container)));
        }

        let ordered = flatten_optional(diagram);
        let mut stats = RenderStats::default();

        self.remove_stale(surface, &ordered, &mut stats);
        let surviving = self.refs.len();
        self.create_missing(&ordered, registry, &mut stats);

        let drawable: Vec<&Arc<Shape>> = ordered
            .iter()
            .filter(|s| self.refs.contains_key(&s.id))
            .collect();

        if self.check_order(&drawable, surviving) {
            tracing::debug!(shapes = drawable.len(), "Paint order changed, re-linking all shapes");
            for shape_ref in self.refs.values() {
                shape_ref.remove(surface);
            }
            stats.relinked = true;
        }

        for shape in &drawable {
            if let Some(shape_ref) = self.refs.get_mut(&shape.id) {
                if shape_ref.render(surface, self.container, shape) {
                    stats.drawn += 1;
                }
            }
        }

        self.apply_preview(surface, preview, &mut stats);

        tracing::trace!(
            created = stats.created,
            removed = stats.removed,
            relinked = stats.relinked,
            drawn = stats.drawn,
            skipped = stats.skipped_unregistered,
            "Render pass complete"
        );

        if let Some(callback) = self.on_render.as_mut() {
            callback(&stats);
        }
        Ok(stats)
    }

    /// Destroy every handle and its node.
    pub fn clear(&mut self, surface: &mut Surface) {
        for (_, mut shape_ref) in self.refs.drain() {
            shape_ref.destroy(surface);
        }
    }

    /// Destroy handles whose shape disappeared or switched renderer.
    fn remove_stale(&mut self, surface: &mut Surface, ordered: &[Arc<Shape>], stats: &mut RenderStats) {
        let current: HashMap<&ItemId, &str> = ordered
            .iter()
            .map(|s| (&s.id, s.renderer.as_str()))
            .collect();

        let stale: Vec<ItemId> = self
            .refs
            .iter()
            .filter(|(id, shape_ref)| match current.get(*id) {
                Some(renderer) => *renderer != shape_ref.control().identifier(),
                None => true,
            })
            .map(|(id, _)| id.clone())
            .collect();

        for id in stale {
            if let Some(mut shape_ref) = self.refs.remove(&id) {
                shape_ref.destroy(surface);
                stats.removed += 1;
            }
        }
    }

    fn create_missing(&mut self, ordered: &[Arc<Shape>], registry: &RendererService, stats: &mut RenderStats) {
        let options = RenderOptions {
            debug: self.config.debug_outlines,
            ..RenderOptions::default()
        };

        for shape in ordered {
            if self.refs.contains_key(&shape.id) {
                continue;
            }
            match registry.get(&shape.renderer) {
                Some(control) => {
                    self.refs
                        .insert(shape.id.clone(), ShapeRef::new(control.clone(), options));
                    stats.created += 1;
                }
                None => {
                    tracing::warn!(item = %shape.id, renderer = %shape.renderer, "Unknown renderer, skipping shape");
                    stats.skipped_unregistered += 1;
                }
            }
        }
    }

    /// Record new indices; returns whether paint order needs a full re-link.
    ///
    /// A new handle only avoids a re-link when it lands after every surviving
    /// handle, because new nodes are appended on top.
    fn check_order(&mut self, drawable: &[&Arc<Shape>], surviving: usize) -> bool {
        let mut mismatch = false;

        for (index, shape) in drawable.iter().enumerate() {
            if let Some(shape_ref) = self.refs.get_mut(&shape.id) {
                let is_new = shape_ref.index().is_none();
                if !shape_ref.check_index(index) || (is_new && index < surviving) {
                    mismatch = true;
                }
            }
        }
        mismatch
    }

    fn apply_preview(&mut self, surface: &mut Surface, preview: Option<&[DiagramItem]>, stats: &mut RenderStats) {
        match preview {
            Some(items) => {
                for shape in items.iter().filter_map(DiagramItem::as_shape) {
                    if let Some(shape_ref) = self.refs.get_mut(&shape.id) {
                        if shape_ref.set_preview(surface, self.container, Some(Arc::clone(shape))) {
                            stats.previewed += 1;
                        }
                    }
                }
            }
            None => {
                for shape_ref in self.refs.values_mut() {
                    if shape_ref.set_preview(surface, self.container, None) {
                        stats.previewed += 1;
                    }
                }
            }
        }
    }
}
