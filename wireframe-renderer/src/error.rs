//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Page size is zero, negative or not finite.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),

    /// A drawing node handle no longer refers to a live node.
    #[error("Stale surface node: {0}")]
    StaleNode(String),

    /// Exporting a page failed.
    #[error("Export failed: {0}")]
    Export(String),
}
