//! Code generator error types.
//!
//! Generation itself never fails; errors only arise when parsing requests.

use thiserror::Error;

/// Result type for code generator operations.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur when preparing a generation request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    /// The requested output target is not supported.
    #[error("Unknown generation target: {0}")]
    UnknownTarget(String),
}
