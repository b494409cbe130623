//! Content-driven sizing policies.
//!
//! A [`Constraint`] derives a shape's displayed size from its content. It is a
//! pure function of the shape, the proposed size and the previous shape state;
//! the editor applies the result and locks the axes the constraint computes.

use std::fmt;
use std::sync::Arc;

use wireframe_core::appearance::keys;
use wireframe_core::{Shape, Vec2};

use crate::metrics::TextMetrics;
use crate::surface::Surface;

/// Font size used when a shape does not declare one.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Line height multiple used by [`TextHeightConstraint`].
const TEXT_HEIGHT_RATIO: f32 = 1.2;

/// A sizing policy.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Compute the size for `shape` given the proposed `size` and the shape as
    /// it was before the edit, if any.
    fn update_size(&self, shape: &Shape, size: Vec2, previous: Option<&Shape>) -> Vec2;

    /// Whether the width is derived by this constraint.
    fn calculate_size_x(&self) -> bool;

    /// Whether the height is derived by this constraint.
    fn calculate_size_y(&self) -> bool;
}

fn font_size(shape: &Shape) -> f32 {
    shape
        .appearance_f32(keys::FONT_SIZE)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

/// Size kept when text cannot be measured: the previous size if known,
/// otherwise the proposed one.
fn unmeasured(shape: &Shape, size: Vec2, previous: Option<&Shape>, font_size: f32) -> Vec2 {
    tracing::warn!(item = %shape.id, font_size, "Text measurement failed, keeping previous size");
    let size = previous.map_or(size, |p| p.transform.size());
    Vec2::new(size.x.max(0.0), size.y.max(0.0))
}

/// Fixes width and/or height to constant values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeConstraint {
    width: Option<f32>,
    height: Option<f32>,
}

impl SizeConstraint {
    /// Create a constraint fixing the given dimensions.
    #[must_use]
    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        let sanitize = |v: Option<f32>| v.filter(|v| v.is_finite()).map(|v| v.max(0.0));
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }
}

impl Constraint for SizeConstraint {
    fn update_size(&self, _shape: &Shape, size: Vec2, _previous: Option<&Shape>) -> Vec2 {
        Vec2::new(
            self.width.unwrap_or(size.x),
            self.height.unwrap_or(size.y),
        )
    }

    fn calculate_size_x(&self) -> bool {
        self.width.is_some()
    }

    fn calculate_size_y(&self) -> bool {
        self.height.is_some()
    }
}

/// Forces a square whose side is the smaller proposed dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinSizeConstraint;

impl Constraint for MinSizeConstraint {
    fn update_size(&self, _shape: &Shape, size: Vec2, _previous: Option<&Shape>) -> Vec2 {
        let side = size.x.min(size.y).max(0.0);
        Vec2::new(side, side)
    }

    fn calculate_size_x(&self) -> bool {
        false
    }

    fn calculate_size_y(&self) -> bool {
        false
    }
}

/// Sets the height to one measured line of text plus vertical padding.
#[derive(Debug, Clone)]
pub struct TextHeightConstraint {
    metrics: TextMetrics,
    padding: f32,
}

impl TextHeightConstraint {
    /// Create a constraint measuring with `metrics`, with `padding` above and
    /// below the text.
    #[must_use]
    pub fn new(metrics: TextMetrics, padding: f32) -> Self {
        Self {
            metrics,
            padding: if padding.is_finite() { padding.max(0.0) } else { 0.0 },
        }
    }
}

impl Constraint for TextHeightConstraint {
    fn update_size(&self, shape: &Shape, size: Vec2, previous: Option<&Shape>) -> Vec2 {
        let font_size = font_size(shape);
        let Some(line) = self.metrics.measure("", font_size, TEXT_HEIGHT_RATIO) else {
            return unmeasured(shape, size, previous, font_size);
        };

        let height = (line.height + self.padding * 2.0).floor().max(0.0);
        Vec2::new(size.x, height)
    }

    fn calculate_size_x(&self) -> bool {
        false
    }

    fn calculate_size_y(&self) -> bool {
        true
    }
}

/// Sizes a shape to fit its measured text.
///
/// The height always follows the text. The width only follows the text when
/// `resize_width` is set, and only when the text changed, so a user-chosen
/// width survives unrelated edits.
#[derive(Debug, Clone)]
pub struct TextSizeConstraint {
    metrics: TextMetrics,
    padding_x: f32,
    padding_y: f32,
    line_height: f32,
    resize_width: bool,
    min_width: f32,
}

impl TextSizeConstraint {
    /// Create a text size constraint measuring with `metrics`.
    #[must_use]
    pub fn new(
        metrics: TextMetrics,
        padding_x: f32,
        padding_y: f32,
        line_height: f32,
        resize_width: bool,
        min_width: f32,
    ) -> Self {
        Self {
            metrics,
            padding_x: padding_x.max(0.0),
            padding_y: padding_y.max(0.0),
            line_height,
            resize_width,
            min_width: min_width.max(0.0),
        }
    }
}

impl Constraint for TextSizeConstraint {
    fn update_size(&self, shape: &Shape, size: Vec2, previous: Option<&Shape>) -> Vec2 {
        let text = shape.appearance_str(keys::TEXT).unwrap_or_default();
        let font_size = font_size(shape);

        let Some(measured) = self.metrics.measure(text, font_size, self.line_height) else {
            return unmeasured(shape, size, previous, font_size);
        };

        let text_changed = match previous {
            Some(p) => p.appearance_str(keys::TEXT).unwrap_or_default() != text,
            None => true,
        };

        let width = if self.resize_width && text_changed {
            (measured.width + self.padding_x * 2.0).max(self.min_width)
        } else {
            size.x
        };
        let height = measured.height + self.padding_y * 2.0;

        Vec2::new(width, height)
    }

    fn calculate_size_x(&self) -> bool {
        self.resize_width
    }

    fn calculate_size_y(&self) -> bool {
        true
    }
}

/// Builds constraints for shape plugins.
///
/// Text constraints measure with the factory's metrics; build the factory from
/// the surface that renders the shapes so measured and drawn text agree.
#[derive(Debug, Clone, Default)]
pub struct ConstraintFactory {
    metrics: TextMetrics,
}

impl ConstraintFactory {
    /// Create a factory measuring text with `metrics`.
    #[must_use]
    pub fn new(metrics: TextMetrics) -> Self {
        Self { metrics }
    }

    /// Create a factory measuring text like `surface`.
    #[must_use]
    pub fn for_surface(surface: &Surface) -> Self {
        Self::new(surface.metrics().clone())
    }

    /// See [`SizeConstraint`].
    #[must_use]
    pub fn size(&self, width: Option<f32>, height: Option<f32>) -> Arc<dyn Constraint> {
        Arc::new(SizeConstraint::new(width, height))
    }

    /// See [`MinSizeConstraint`].
    #[must_use]
    pub fn min_size(&self) -> Arc<dyn Constraint> {
        Arc::new(MinSizeConstraint)
    }

    /// See [`TextHeightConstraint`].
    #[must_use]
    pub fn text_height(&self, padding: f32) -> Arc<dyn Constraint> {
        Arc::new(TextHeightConstraint::new(self.metrics.clone(), padding))
    }

    /// See [`TextSizeConstraint`].
    #[must_use]
    pub fn text_size(
        &self,
        padding_x: f32,
        padding_y: f32,
        line_height: f32,
        resize_width: bool,
        min_width: f32,
    ) -> Arc<dyn Constraint> {
        Arc::new(TextSizeConstraint::new(
            self.metrics.clone(),
            padding_x,
            padding_y,
            line_height,
            resize_width,
            min_width,
        ))
    }
}
