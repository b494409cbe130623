//! Error types for diagram operations.

use thiserror::Error;

/// Result type for diagram operations.
pub type DiagramResult<T> = Result<T, DiagramError>;

/// Errors that can occur while editing diagrams and editor state.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// Item not found in the diagram.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// An item with this ID already exists in the diagram.
    #[error("Duplicate item: {0}")]
    DuplicateItem(String),

    /// Diagram not found in the editor state.
    #[error("Diagram not found: {0}")]
    DiagramNotFound(String),

    /// The edit would make an item reachable twice or create a cycle.
    #[error("Item tree would not be a tree: {0}")]
    MalformedTree(String),

    /// Invalid structural operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
