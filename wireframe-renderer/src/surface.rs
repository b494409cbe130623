//! Retained vector drawing surface.
//!
//! A [`Surface`] is a tree of nodes addressed by generation-checked
//! [`NodeId`] handles. Paint order among siblings is attachment order: there is
//! no z-index, so reordering means detaching and re-appending nodes. The tree
//! serializes to SVG for export.

use std::fmt::Write;

use wireframe_core::{Rect2, Rotation, Vec2};

use crate::metrics::TextMetrics;

/// Handle to a node on a [`Surface`].
///
/// Handles of destroyed nodes are never reused: a stale handle fails every
/// lookup instead of aliasing a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlignment {
    /// Align to the left edge.
    Left,
    /// Center in the bounds.
    #[default]
    Center,
    /// Align to the right edge.
    Right,
}

impl TextAlignment {
    /// Parse `left`, `center` or `right`, falling back to center.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Center,
        }
    }
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Container of child nodes.
    Group,
    /// Rectangle filling the node bounds.
    Rect {
        /// Corner radius.
        radius: f32,
    },
    /// Ellipse inscribed in the node bounds.
    Ellipse,
    /// Single- or multi-line text laid out in the node bounds.
    Text {
        /// Text content.
        content: String,
        /// Font size in pixels.
        font_size: f32,
        /// Font family.
        font_family: String,
        /// Horizontal alignment.
        alignment: TextAlignment,
    },
    /// SVG path data in node coordinates.
    Path {
        /// Path data.
        data: String,
    },
}

/// Stroke style.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f32,
}

/// Translation plus rotation around a point, applied to a group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    /// Translation of the group origin.
    pub translate: Vec2,
    /// Rotation, applied after translation, around `center`.
    pub rotation: Rotation,
    /// Rotation center in parent coordinates.
    pub center: Vec2,
}

/// A drawing node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    bounds: Rect2,
    placement: Placement,
    fill: Option<String>,
    stroke: Option<Stroke>,
    opacity: f32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            bounds: Rect2::default(),
            placement: Placement::default(),
            fill: None,
            stroke: None,
            opacity: 1.0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// What the node draws.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Geometry of a rect, ellipse or text node.
    #[must_use]
    pub fn bounds(&self) -> Rect2 {
        self.bounds
    }

    /// Placement of a group node.
    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Fill color, `None` for no fill.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        self.fill.as_deref()
    }

    /// Stroke, `None` for no stroke.
    #[must_use]
    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Opacity from 0 to 1.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Attached parent.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in paint order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Set the geometry.
    pub fn set_bounds(&mut self, bounds: Rect2) -> &mut Self {
        self.bounds = bounds;
        self
    }

    /// Set the group placement.
    pub fn set_placement(&mut self, placement: Placement) -> &mut Self {
        self.placement = placement;
        self
    }

    /// Set the fill color.
    pub fn set_fill(&mut self, fill: Option<String>) -> &mut Self {
        self.fill = fill;
        self
    }

    /// Set the stroke.
    pub fn set_stroke(&mut self, stroke: Option<Stroke>) -> &mut Self {
        self.stroke = stroke;
        self
    }

    /// Set the opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) -> &mut Self {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }
}

/// Attach/detach counters, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Nodes created.
    pub created: u64,
    /// Nodes destroyed.
    pub destroyed: u64,
    /// Append operations.
    pub attached: u64,
    /// Detach operations on attached nodes.
    pub detached: u64,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A retained tree of drawing nodes.
#[derive(Debug)]
pub struct Surface {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    root: NodeId,
    size: Vec2,
    metrics: TextMetrics,
    stats: SurfaceStats,
}

impl Surface {
    /// Create a surface of the given size with an empty root group.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_metrics(width, height, TextMetrics::default())
    }

    /// Create a surface that measures text with `metrics`.
    #[must_use]
    pub fn with_metrics(width: f32, height: f32, metrics: TextMetrics) -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(NodeKind::Group)),
            }],
            free_list: Vec::new(),
            root,
            size: Vec2::new(width, height),
            metrics,
            stats: SurfaceStats::default(),
        }
    }

    /// The root group.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Surface size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Text metrics used for layout and measurement.
    #[must_use]
    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// Counters since creation.
    #[must_use]
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Number of live nodes, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Children of `id` in paint order; empty for unknown nodes.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[][..], Node::children)
    }

    /// Whether `id` is attached to a parent.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.parent.is_some())
    }

    /// Position of `id` among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id)?.parent?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Create a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.stats.created += 1;
        let node = Some(Node::new(kind));

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = node;
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node,
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Append `child` as the topmost child of `parent`, detaching it from any
    /// previous parent first. Returns `false` if either node is unknown or the
    /// append would create a cycle.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_ancestor(child, parent) {
            return false;
        }

        self.detach(child);

        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        self.stats.attached += 1;
        true
    }

    /// Detach `id` from its parent, keeping it alive. No-op when detached.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };

        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        self.stats.detached += 1;
    }

    /// Detach and free `id` and its whole subtree. The root cannot be destroyed.
    pub fn destroy(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index as usize) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(current.index);
                self.stats.destroyed += 1;
            }
        }
    }

    /// Destroy every child of `id` after the first `keep`.
    pub fn truncate_children(&mut self, id: NodeId, keep: usize) {
        let extra: Vec<NodeId> = self.children(id).iter().skip(keep).copied().collect();
        for child in extra {
            self.destroy(child);
        }
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = self.node(of).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Serialize the subtree under `id` as SVG markup.
    #[must_use]
    pub fn to_svg_fragment(&self, id: NodeId) -> String {
        let mut svg = String::with_capacity(1024);
        self.write_node(&mut svg, id);
        svg
    }

    /// Serialize the whole surface as a standalone SVG document.
    #[must_use]
    pub fn to_svg_document(&self, background: Option<&str>) -> String {
        let (w, h) = (self.size.x, self.size.y);
        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        );
        if let Some(color) = background {
            let _ = write!(
                svg,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(color)
            );
        }
        self.write_node(&mut svg, self.root);
        svg.push_str("</svg>");
        svg
    }

    fn write_node(&self, svg: &mut String, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let b = node.bounds;

        match &node.kind {
            NodeKind::Group => {
                let p = node.placement;
                svg.push_str("<g");
                if p.rotation == Rotation::ZERO {
                    let _ = write!(svg, " transform=\"translate({} {})\"", p.translate.x, p.translate.y);
                } else {
                    let _ = write!(
                        svg,
                        " transform=\"rotate({} {} {}) translate({} {})\"",
                        p.rotation.degree(),
                        p.center.x,
                        p.center.y,
                        p.translate.x,
                        p.translate.y
                    );
                }
                write_opacity(svg, node.opacity);
                svg.push('>');
                for child in &node.children {
                    self.write_node(svg, *child);
                }
                svg.push_str("</g>");
            }
            NodeKind::Rect { radius } => {
                let _ = write!(
                    svg,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    b.x, b.y, b.width, b.height
                );
                if *radius > 0.0 {
                    let _ = write!(svg, " rx=\"{radius}\"");
                }
                write_paint(svg, node);
                svg.push_str("/>");
            }
            NodeKind::Ellipse => {
                let c = b.center();
                let _ = write!(
                    svg,
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
                    c.x,
                    c.y,
                    b.width * 0.5,
                    b.height * 0.5
                );
                write_paint(svg, node);
                svg.push_str("/>");
            }
            NodeKind::Text {
                content,
                font_size,
                font_family,
                alignment,
            } => {
                let (x, anchor) = match alignment {
                    TextAlignment::Left => (b.x, "start"),
                    TextAlignment::Center => (b.x + b.width * 0.5, "middle"),
                    TextAlignment::Right => (b.x + b.width, "end"),
                };
                let line_height = self.metrics.line_height(*font_size);
                let lines: Vec<&str> = content.lines().collect();
                #[allow(clippy::cast_precision_loss)]
                let block = line_height * lines.len().max(1) as f32;
                let top = b.y + (b.height - block) * 0.5;

                let family = match (font_family.as_str(), self.metrics.font()) {
                    ("inherit", Some(font)) => font.family(),
                    _ => font_family.as_str(),
                };
                let _ = write!(
                    svg,
                    "<text font-size=\"{font_size}\" font-family=\"{}\" text-anchor=\"{anchor}\"",
                    escape_xml(family)
                );
                write_paint(svg, node);
                svg.push('>');
                for (i, line) in lines.iter().enumerate() {
                    #[allow(clippy::cast_precision_loss)]
                    let y = top + line_height * i as f32 + font_size;
                    let _ = write!(svg, "<tspan x=\"{x}\" y=\"{y}\">{}</tspan>", escape_xml(line));
                }
                svg.push_str("</text>");
            }
            NodeKind::Path { data } => {
                let _ = write!(svg, "<path d=\"{}\"", escape_xml(data));
                write_paint(svg, node);
                svg.push_str("/>");
            }
        }
    }
}

fn write_paint(svg: &mut String, node: &Node) {
    match &node.fill {
        Some(fill) => {
            let _ = write!(svg, " fill=\"{}\"", escape_xml(fill));
        }
        None => svg.push_str(" fill=\"none\""),
    }
    if let Some(stroke) = &node.stroke {
        let _ = write!(
            svg,
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape_xml(&stroke.color),
            stroke.width
        );
    }
    write_opacity(svg, node.opacity);
}

fn write_opacity(svg: &mut String, opacity: f32) {
    if opacity < 1.0 {
        let _ = write!(svg, " opacity=\"{opacity}\"");
    }
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
