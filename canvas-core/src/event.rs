//! Change notifications emitted by the canvas store.

use serde::{Deserialize, Serialize};

/// What changed on a canvas.
///
/// Observers receive one event per mutation, on the thread that performed
/// the mutation. Consumers that need the full picture read a fresh snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasChange {
    /// A shape was appended at `index`.
    ShapeAdded {
        /// Position of the new shape in the shape list.
        index: usize,
    },
    /// The shape list was emptied.
    ShapesCleared,
    /// The canvas dimensions were replaced.
    Resized {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// The shadow was set or replaced.
    ShadowSet,
    /// The shadow was removed.
    ShadowCleared,
    /// A transform was appended.
    TransformAdded,
    /// The transform list was emptied.
    TransformsReset,
}

impl CanvasChange {
    /// Whether this change affects the shape list.
    #[must_use]
    pub const fn touches_shapes(&self) -> bool {
        matches!(self, Self::ShapeAdded { .. } | Self::ShapesCleared)
    }
}
