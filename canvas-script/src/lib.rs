//! # Canvas Script
//!
//! Runs user scripts against a [`canvas_core::CanvasStore`] and reports
//! everything that happens through an observable [`MessageLog`].
//!
//! ## Architecture
//!
//! ```text
//! source ──► ScriptHarness::submit ──► spawn_blocking
//!                                         │
//!                     TopLevelContext ──► ExecutionContext (fresh scope)
//!                                         │
//!                          DrawRect(..) ──► CanvasBridge ──► CanvasStore
//!                                         │
//!                      result / fault ──► MessageLog
//! ```
//!
//! Scripts are written in [Rhai](https://rhai.rs). The drawing primitives
//! are registered under their catalog names (`DrawRect`, `DrawCircle`, ...)
//! with trailing parameters optional. `HORIZONTAL` and `VERTICAL` are
//! predefined constants.
//!
//! Faults never reach the caller as errors: they are rendered as console
//! lines with a stable code, an optional help link, the failing source line
//! and a stack trace.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod bridge;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod fault;
pub mod harness;

pub use api::{register_primitives, PRIMITIVES};
pub use bridge::CanvasBridge;
pub use config::HarnessConfig;
pub use console::{ConsoleMessage, LogChange, MessageLog, Severity};
pub use context::{ExecutionContext, ExecutionId, TopLevelContext};
pub use error::{ScriptError, ScriptResult};
pub use fault::{FaultCode, ScriptFault, SourceLocation, StackFrame};
pub use harness::{ExecutionHandle, ExecutionOutcome, ScriptHarness};
