//! # Wireframe Core
//!
//! Scene model for wireframe diagrams: a tree of shapes and groups that is
//! edited copy-on-write and flattened into paint order for rendering.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                wireframe-core               │
//! ├─────────────────────────────────────────────┤
//! │  Model           │  Operations              │
//! │  - Transform     │  - flatten (paint order) │
//! │  - Container     │  - change_appearance     │
//! │  - Shape / Group │  - transform_items       │
//! │  - Diagram       │  - Action records        │
//! ├─────────────────────────────────────────────┤
//! │  EditorState: ordered diagrams, canvas size │
//! │  and color                                  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod appearance;
pub mod color;
pub mod container;
pub mod diagram;
pub mod editor;
pub mod error;
pub mod flatten;
pub mod geometry;
pub mod item;
pub mod item_set;
pub mod mutate;
pub mod transform;

pub use action::Action;
pub use appearance::{Appearance, AppearanceLookup};
pub use color::Color;
pub use container::DiagramContainer;
pub use diagram::{Diagram, DiagramId};
pub use editor::EditorState;
pub use error::{DiagramError, DiagramResult};
pub use flatten::{flatten, flatten_optional};
pub use geometry::{Rect2, Rotation, Vec2};
pub use item::{DiagramItem, Group, ItemId, RendererId, Shape};
pub use item_set::ItemSet;
pub use mutate::{change_appearance, transform_items};
pub use transform::Transform;

/// Wireframe core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
