//! # Wireframe Renderer
//!
//! Incremental renderer for wireframe diagrams. Shapes are drawn by pluggable
//! shape plugins onto a retained vector surface, and a reconciler keeps the
//! surface in sync with each new diagram snapshot.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   flatten   ┌─────────────┐   ShapeRef per shape   ┌─────────┐
//! │ Diagram  │ ──────────► │ RenderLayer │ ─────────────────────► │ Surface │
//! └──────────┘             └──────┬──────┘                        └────┬────┘
//!                                 │ RendererService lookup             │ to_svg
//!                          ┌──────▼──────┐                        ┌────▼────┐
//!                          │ ShapePlugin │                        │   SVG   │
//!                          └─────────────┘                        └─────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod configurable;
pub mod constraint;
pub mod control;
pub mod error;
pub mod export;
pub mod layer;
pub mod metrics;
pub mod plugin;
pub mod registry;
pub mod shape_ref;
pub mod shapes;
pub mod surface;

pub use configurable::{Configurable, ConfigurableFactory};
pub use constraint::{
    Constraint, ConstraintFactory, MinSizeConstraint, SizeConstraint, TextHeightConstraint,
    TextSizeConstraint,
};
pub use control::{Control, ControlContext, RenderOptions, ShapeDefaults};
pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportedPage, PageExporter};
pub use layer::{RenderCallback, RenderLayer, RenderLayerConfig, RenderStats};
pub use metrics::{FontFace, TextMetrics, TextSize};
pub use plugin::{Primitive, RenderContext, ShapePlugin};
pub use registry::RendererService;
pub use shape_ref::ShapeRef;
pub use shapes::register_default_shapes;
pub use surface::{NodeId, NodeKind, Placement, Stroke, Surface, SurfaceStats, TextAlignment};

/// Wireframe renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
