//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found on the canvas.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An element with the same id is already placed.
    #[error("Duplicate element id: {0}")]
    DuplicateElement(String),

    /// Element ids must be non-empty.
    #[error("Element id must not be empty")]
    EmptyElementId,

    /// The property editor has no field with this key for the element type.
    #[error("Unknown field '{key}' for {kind} element")]
    UnknownField {
        /// Field key that was requested.
        key: String,
        /// Element type name.
        kind: String,
    },

    /// The value is not acceptable for the field's control.
    #[error("Invalid value '{value}' for field '{key}'")]
    InvalidFieldValue {
        /// Field key.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// Canvas serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
