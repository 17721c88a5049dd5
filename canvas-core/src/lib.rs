//! # Saorsa Canvas Core
//!
//! The drawing command model for scriptable canvases.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 canvas-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Shapes          │  Canvas State            │
//! │  - 18 kinds      │  - Size                  │
//! │  - Colors/fonts  │  - Ordered shapes        │
//! │  - Gradients     │  - Transforms, shadow    │
//! ├─────────────────────────────────────────────┤
//! │  CanvasStore     │  Observers               │
//! │  - Shared handle │  - Subscribe/notify      │
//! │  - Snapshots     │  - Synchronous delivery  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Scripts append to a [`CanvasStore`]; renderers read a [`CanvasState`]
//! snapshot and repaint whenever a [`CanvasChange`] arrives.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod observer;
pub mod shape;
pub mod state;
pub mod store;

pub use error::{CanvasError, CanvasResult};
pub use event::CanvasChange;
pub use observer::{ObserverCallback, Observers, SubscriptionId};
pub use shape::{
    CanvasShadow, CanvasShape, CanvasTransform, GradientDirection, Point, ShapeKind,
    DEFAULT_COLOR, DEFAULT_FONT, DEFAULT_LINE_WIDTH,
};
pub use state::{CanvasState, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use store::CanvasStore;

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
