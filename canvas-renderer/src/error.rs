//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested output format is not compiled in.
    #[error("Export format not supported: {0}")]
    UnsupportedFormat(String),

    /// Export encoding failed.
    #[error("Export failed: {0}")]
    Export(String),
}
