//! Canvas state - the accumulated command list.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, CanvasShadow, CanvasShape, CanvasTransform};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: f64 = 400.0;

/// Everything a renderer needs to paint the canvas.
///
/// Every mutation is a whole-entity append, replace or clear. Sizes are not
/// validated: zero or negative dimensions are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    shapes: Vec<CanvasShape>,
    transforms: Vec<CanvasTransform>,
    shadow: Option<CanvasShadow>,
}

impl CanvasState {
    /// Create an empty canvas with the given dimensions.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
            transforms: Vec::new(),
            shadow: None,
        }
    }

    /// Append a shape. Returns its index.
    pub fn add_shape(&mut self, shape: CanvasShape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Remove all shapes. Transforms and shadow are kept.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace the canvas dimensions.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Set or replace the shadow.
    pub fn set_shadow(&mut self, shadow: CanvasShadow) {
        self.shadow = Some(shadow);
    }

    /// Remove the shadow.
    pub fn clear_shadow(&mut self) {
        self.shadow = None;
    }

    /// Append a transform.
    pub fn add_transform(&mut self, transform: CanvasTransform) {
        self.transforms.push(transform);
    }

    /// Remove all transforms. Shapes and shadow are kept.
    pub fn reset_transform(&mut self) {
        self.transforms.clear();
    }

    /// Shapes in insertion order.
    #[must_use]
    pub fn shapes(&self) -> &[CanvasShape] {
        &self.shapes
    }

    /// Transforms in insertion order.
    #[must_use]
    pub fn transforms(&self) -> &[CanvasTransform] {
        &self.transforms
    }

    /// The active shadow, if any.
    #[must_use]
    pub fn shadow(&self) -> Option<&CanvasShadow> {
        self.shadow.as_ref()
    }

    /// Check if no shapes have been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Serialize the state to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a state from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}
