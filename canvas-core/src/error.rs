//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Mutations of the canvas never fail; only conversions in and out of the
/// model can.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
