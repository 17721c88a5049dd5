//! Harness error types.
//!
//! Script faults are not errors here: they are reported through the message
//! log. These variants cover requests the harness refuses to run at all.

use thiserror::Error;

/// Result type for harness operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors returned to the caller of the harness.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The submitted source was empty or whitespace only.
    #[error("Script source is empty")]
    EmptySource,

    /// No Tokio runtime is available to run the background worker.
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    /// The execution context has already finished.
    #[error("Execution context {0} is already done")]
    ContextDone(String),
}
