//! The primitive bridge between script calls and the canvas store.
//!
//! Every method takes fully-resolved arguments and performs exactly one
//! store mutation. With no store attached every method is a silent no-op,
//! since primitives can be invoked before a canvas exists.

use std::sync::{Arc, RwLock};

use canvas_core::{
    CanvasShadow, CanvasShape, CanvasStore, CanvasTransform, GradientDirection, Point,
};

/// Cloneable handle through which registered primitives reach the canvas.
#[derive(Debug, Clone, Default)]
pub struct CanvasBridge {
    target: Arc<RwLock<Option<CanvasStore>>>,
}

impl CanvasBridge {
    /// Create a detached bridge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bridge already attached to `store`.
    #[must_use]
    pub fn attached(store: CanvasStore) -> Self {
        let bridge = Self::new();
        bridge.attach(store);
        bridge
    }

    /// Route primitives to `store`, replacing any previous target.
    pub fn attach(&self, store: CanvasStore) {
        *self
            .target
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(store);
        tracing::debug!("Canvas attached to bridge");
    }

    /// Stop routing primitives. Returns the previous target.
    pub fn detach(&self) -> Option<CanvasStore> {
        let previous = self
            .target
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        tracing::debug!("Canvas detached from bridge");
        previous
    }

    /// Whether a store is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.target
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }

    /// The attached store, if any.
    #[must_use]
    pub fn store(&self) -> Option<CanvasStore> {
        self.target
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn with_store(&self, primitive: &str, f: impl FnOnce(&CanvasStore)) {
        // Clone the handle so the store's observers run without our lock held.
        match self.store() {
            Some(store) => f(&store),
            None => tracing::trace!("{primitive} ignored: no canvas attached"),
        }
    }

    fn add(&self, primitive: &str, shape: CanvasShape) {
        self.with_store(primitive, |store| store.add_shape(shape));
    }

    /// `DrawRect`.
    pub fn draw_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str, filled: bool) {
        let color = color.to_string();
        let shape = if filled {
            CanvasShape::FilledRect {
                x,
                y,
                width,
                height,
                color,
            }
        } else {
            CanvasShape::Rect {
                x,
                y,
                width,
                height,
                color,
            }
        };
        self.add("DrawRect", shape);
    }

    /// `DrawCircle`.
    pub fn draw_circle(&self, x: f64, y: f64, radius: f64, color: &str, filled: bool) {
        let color = color.to_string();
        let shape = if filled {
            CanvasShape::FilledCircle {
                x,
                y,
                radius,
                color,
            }
        } else {
            CanvasShape::Circle {
                x,
                y,
                radius,
                color,
            }
        };
        self.add("DrawCircle", shape);
    }

    /// `DrawLine`.
    pub fn draw_line(&self, from: Point, to: Point, color: &str, line_width: f64) {
        self.add(
            "DrawLine",
            CanvasShape::Line {
                x1: from.x,
                y1: from.y,
                x2: to.x,
                y2: to.y,
                color: color.to_string(),
                line_width,
            },
        );
    }

    /// `DrawText`.
    pub fn draw_text(&self, text: &str, x: f64, y: f64, color: &str, font: &str) {
        self.add(
            "DrawText",
            CanvasShape::Text {
                text: text.to_string(),
                x,
                y,
                color: color.to_string(),
                font: font.to_string(),
            },
        );
    }

    /// `Clear`: empties the shape list.
    pub fn clear(&self) {
        self.with_store("Clear", CanvasStore::clear);
    }

    /// `SetSize`.
    pub fn set_size(&self, width: f64, height: f64) {
        self.with_store("SetSize", |store| store.set_size(width, height));
    }

    /// `DrawEllipse`.
    pub fn draw_ellipse(
        &self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        color: &str,
        filled: bool,
    ) {
        let color = color.to_string();
        let shape = if filled {
            CanvasShape::FilledEllipse {
                x,
                y,
                radius_x,
                radius_y,
                color,
            }
        } else {
            CanvasShape::Ellipse {
                x,
                y,
                radius_x,
                radius_y,
                color,
            }
        };
        self.add("DrawEllipse", shape);
    }

    /// `DrawPolygon`.
    pub fn draw_polygon(&self, points: Vec<Point>, color: &str, filled: bool) {
        let color = color.to_string();
        let shape = if filled {
            CanvasShape::FilledPolygon { points, color }
        } else {
            CanvasShape::Polygon { points, color }
        };
        self.add("DrawPolygon", shape);
    }

    /// `DrawBezier`.
    pub fn draw_bezier(
        &self,
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
        color: &str,
        line_width: f64,
    ) {
        self.add(
            "DrawBezier",
            CanvasShape::Bezier {
                start,
                control1,
                control2,
                end,
                color: color.to_string(),
                line_width,
            },
        );
    }

    /// `DrawArc`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_arc(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: &str,
        line_width: f64,
    ) {
        self.add(
            "DrawArc",
            CanvasShape::Arc {
                x,
                y,
                radius,
                start_angle,
                end_angle,
                color: color.to_string(),
                line_width,
            },
        );
    }

    /// `DrawGradientRect`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_gradient_rect(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color1: &str,
        color2: &str,
        direction: GradientDirection,
    ) {
        self.add(
            "DrawGradientRect",
            CanvasShape::GradientRect {
                x,
                y,
                width,
                height,
                color: color1.to_string(),
                color2: color2.to_string(),
                direction,
            },
        );
    }

    /// `SetShadow`.
    pub fn set_shadow(&self, offset_x: f64, offset_y: f64, blur: f64, color: &str) {
        let shadow = CanvasShadow {
            offset_x,
            offset_y,
            blur,
            color: color.to_string(),
        };
        self.with_store("SetShadow", |store| store.set_shadow(shadow));
    }

    /// `ClearShadow`.
    pub fn clear_shadow(&self) {
        self.with_store("ClearShadow", CanvasStore::clear_shadow);
    }

    /// `Rotate`, angle in radians.
    pub fn rotate(&self, angle: f64) {
        self.with_store("Rotate", |store| {
            store.add_transform(CanvasTransform::Rotate { angle });
        });
    }

    /// `Translate`.
    pub fn translate(&self, dx: f64, dy: f64) {
        self.with_store("Translate", |store| {
            store.add_transform(CanvasTransform::Translate { dx, dy });
        });
    }

    /// `Scale`.
    pub fn scale(&self, sx: f64, sy: f64) {
        self.with_store("Scale", |store| {
            store.add_transform(CanvasTransform::Scale { sx, sy });
        });
    }

    /// `ResetTransform`.
    pub fn reset_transform(&self) {
        self.with_store("ResetTransform", CanvasStore::reset_transform);
    }

    /// `DrawImage`. Zero width or height means natural size.
    pub fn draw_image(&self, url: &str, x: f64, y: f64, width: f64, height: f64) {
        self.add(
            "DrawImage",
            CanvasShape::Image {
                url: url.to_string(),
                x,
                y,
                width,
                height,
            },
        );
    }
}
