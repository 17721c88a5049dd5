//! # Saorsa Canvas Renderer
//!
//! Paints a [`CanvasState`] onto any [`Surface`].
//!
//! ## Rendering Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        Renderer::render(state, surface)     │
//! ├─────────────────────────────────────────────┤
//! │ clear → background → transforms → shadow    │
//! │ → shapes in insertion order                 │
//! ├─────────────┬───────────────────────────────┤
//! │ SvgSurface  │ SceneExporter                 │
//! │ (SVG text)  │ (SVG, PNG via resvg)          │
//! └─────────────┴───────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod surface;
pub mod svg;

pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportFormat, SceneExporter};
pub use surface::{LinearGradient, PathShape, Surface};
pub use svg::SvgSurface;

use canvas_core::{CanvasShape, CanvasState, CanvasTransform, Point, DEFAULT_COLOR, DEFAULT_FONT};

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Background colour painted before any shape.
    pub background_color: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
        }
    }
}

/// Replays a canvas command list onto a surface.
#[derive(Debug, Default)]
pub struct Renderer {
    config: RendererConfig,
    frame_count: u64,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            frame_count: 0,
        }
    }

    /// Render a frame.
    ///
    /// The surface is cleared, the background painted, every transform
    /// applied in list order, then the shadow, then each shape in order.
    /// Transforms are not reset between shapes.
    pub fn render<S: Surface + ?Sized>(&mut self, state: &CanvasState, surface: &mut S) {
        surface.clear(state.width, state.height);
        surface.fill_background(&self.config.background_color);

        for transform in state.transforms() {
            match *transform {
                CanvasTransform::Translate { dx, dy } => surface.translate(dx, dy),
                CanvasTransform::Rotate { angle } => surface.rotate(angle),
                CanvasTransform::Scale { sx, sy } => surface.scale(sx, sy),
            }
        }

        if let Some(shadow) = state.shadow() {
            surface.set_shadow(shadow);
        }

        for shape in state.shapes() {
            paint_shape(surface, shape);
        }

        self.frame_count += 1;
        tracing::trace!(
            "Rendered frame {} ({} shapes)",
            self.frame_count,
            state.shapes().len()
        );
    }

    /// Get the number of frames rendered so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

fn color_or_default(color: &str) -> &str {
    if color.is_empty() {
        DEFAULT_COLOR
    } else {
        color
    }
}

#[allow(clippy::too_many_lines)]
fn paint_shape<S: Surface + ?Sized>(surface: &mut S, shape: &CanvasShape) {
    let color = color_or_default(shape.color().unwrap_or(DEFAULT_COLOR));
    let line_width = shape.line_width();
    let line_width = if line_width > 0.0 { line_width } else { 1.0 };
    let full_turn = std::f64::consts::TAU;

    match shape {
        CanvasShape::Rect {
            x,
            y,
            width,
            height,
            ..
        } => surface.stroke(rect(*x, *y, *width, *height), color, line_width),
        CanvasShape::FilledRect {
            x,
            y,
            width,
            height,
            ..
        } => surface.fill(rect(*x, *y, *width, *height), color),
        CanvasShape::Circle { x, y, radius, .. } => surface.stroke(
            arc(*x, *y, *radius, 0.0, full_turn),
            color,
            line_width,
        ),
        CanvasShape::FilledCircle { x, y, radius, .. } => {
            surface.fill(arc(*x, *y, *radius, 0.0, full_turn), color);
        }
        CanvasShape::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
            ..
        } => surface.stroke(
            PathShape::Ellipse {
                cx: *x,
                cy: *y,
                rx: *radius_x,
                ry: *radius_y,
            },
            color,
            line_width,
        ),
        CanvasShape::FilledEllipse {
            x,
            y,
            radius_x,
            radius_y,
            ..
        } => surface.fill(
            PathShape::Ellipse {
                cx: *x,
                cy: *y,
                rx: *radius_x,
                ry: *radius_y,
            },
            color,
        ),
        CanvasShape::Line { x1, y1, x2, y2, .. } => surface.stroke(
            PathShape::Line {
                from: Point::new(*x1, *y1),
                to: Point::new(*x2, *y2),
            },
            color,
            line_width,
        ),
        CanvasShape::Polygon { points, .. } => {
            if points.len() >= 2 {
                surface.stroke(PathShape::Polygon(points), color, line_width);
            }
        }
        CanvasShape::FilledPolygon { points, .. } => {
            if points.len() >= 2 {
                surface.fill(PathShape::Polygon(points), color);
            }
        }
        CanvasShape::Bezier {
            start,
            control1,
            control2,
            end,
            ..
        } => surface.stroke(
            PathShape::Bezier {
                start: *start,
                control1: *control1,
                control2: *control2,
                end: *end,
            },
            color,
            line_width,
        ),
        CanvasShape::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            ..
        } => surface.stroke(
            arc(*x, *y, *radius, *start_angle, *end_angle),
            color,
            line_width,
        ),
        CanvasShape::Text {
            text, x, y, font, ..
        } => {
            let font = if font.is_empty() { DEFAULT_FONT } else { font };
            surface.fill_text(text, *x, *y, font, color);
        }
        CanvasShape::GradientRect {
            x,
            y,
            width,
            height,
            color2,
            direction,
            ..
        } => surface.fill_gradient_rect(
            *x,
            *y,
            *width,
            *height,
            LinearGradient {
                from: color,
                to: color2,
                direction: *direction,
            },
        ),
        CanvasShape::Image {
            url,
            x,
            y,
            width,
            height,
        } => {
            if url.is_empty() {
                return;
            }
            let size = (*width > 0.0 && *height > 0.0).then_some((*width, *height));
            surface.draw_image(url, *x, *y, size);
        }
    }
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> PathShape<'static> {
    PathShape::Rect {
        x,
        y,
        width,
        height,
    }
}

fn arc(cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> PathShape<'static> {
    PathShape::Arc {
        cx,
        cy,
        radius,
        start,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::{CanvasShadow, GradientDirection};

    /// Records every surface call as a readable line.
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, width: f64, height: f64) {
            self.calls.push(format!("clear {width}x{height}"));
        }
        fn fill_background(&mut self, color: &str) {
            self.calls.push(format!("background {color}"));
        }
        fn translate(&mut self, dx: f64, dy: f64) {
            self.calls.push(format!("translate {dx},{dy}"));
        }
        fn rotate(&mut self, radians: f64) {
            self.calls.push(format!("rotate {radians}"));
        }
        fn scale(&mut self, sx: f64, sy: f64) {
            self.calls.push(format!("scale {sx},{sy}"));
        }
        fn set_shadow(&mut self, shadow: &CanvasShadow) {
            self.calls.push(format!("shadow {}", shadow.color));
        }
        fn stroke(&mut self, path: PathShape<'_>, color: &str, line_width: f64) {
            self.calls.push(format!("stroke {path:?} {color} {line_width}"));
        }
        fn fill(&mut self, path: PathShape<'_>, color: &str) {
            self.calls.push(format!("fill {path:?} {color}"));
        }
        fn fill_gradient_rect(
            &mut self,
            _x: f64,
            _y: f64,
            _width: f64,
            _height: f64,
            gradient: LinearGradient<'_>,
        ) {
            self.calls.push(format!(
                "gradient {}->{} {}",
                gradient.from,
                gradient.to,
                gradient.direction.as_str()
            ));
        }
        fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) {
            self.calls.push(format!("text {text} {x},{y} {font} {color}"));
        }
        fn draw_image(&mut self, url: &str, _x: f64, _y: f64, size: Option<(f64, f64)>) {
            self.calls.push(format!("image {url} {size:?}"));
        }
    }

    fn render(state: &CanvasState) -> Vec<String> {
        let mut surface = RecordingSurface::default();
        Renderer::default().render(state, &mut surface);
        surface.calls
    }

    #[test]
    fn test_empty_canvas_paints_white_background() {
        let calls = render(&CanvasState::default());
        assert_eq!(calls, vec!["clear 600x400", "background #ffffff"]);
    }

    #[test]
    fn test_transforms_then_shadow_then_shapes() {
        let mut state = CanvasState::new(100.0, 100.0);
        state.add_transform(CanvasTransform::Translate { dx: 10.0, dy: 5.0 });
        state.add_transform(CanvasTransform::Rotate { angle: 0.5 });
        state.add_transform(CanvasTransform::Scale { sx: 2.0, sy: 3.0 });
        state.set_shadow(CanvasShadow {
            offset_x: 1.0,
            offset_y: 1.0,
            blur: 2.0,
            color: "gray".to_string(),
        });
        state.add_shape(CanvasShape::Rect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            color: String::new(),
        });

        let calls = render(&state);
        assert_eq!(calls[2], "translate 10,5");
        assert_eq!(calls[3], "rotate 0.5");
        assert_eq!(calls[4], "scale 2,3");
        assert_eq!(calls[5], "shadow gray");
        assert!(calls[6].starts_with("stroke Rect"));
        assert!(calls[6].ends_with("#000000 1"));
    }

    #[test]
    fn test_short_polygons_skipped() {
        let mut state = CanvasState::default();
        state.add_shape(CanvasShape::FilledPolygon {
            points: vec![Point::new(1.0, 1.0)],
            color: "red".to_string(),
        });
        state.add_shape(CanvasShape::Polygon {
            points: vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            color: "blue".to_string(),
        });

        let calls = render(&state);
        assert_eq!(calls.len(), 3);
        assert!(calls[2].starts_with("stroke Polygon"));
    }

    #[test]
    fn test_image_sizing_rules() {
        let mut state = CanvasState::default();
        let image = |url: &str, width: f64, height: f64| CanvasShape::Image {
            url: url.to_string(),
            x: 0.0,
            y: 0.0,
            width,
            height,
        };
        state.add_shape(image("", 10.0, 10.0));
        state.add_shape(image("a.png", 0.0, 0.0));
        state.add_shape(image("b.png", 20.0, 0.0));
        state.add_shape(image("c.png", 20.0, 30.0));

        let calls = render(&state);
        assert_eq!(
            &calls[2..],
            ["image a.png None", "image b.png None", "image c.png Some((20.0, 30.0))"]
        );
    }

    #[test]
    fn test_text_and_gradient() {
        let mut state = CanvasState::default();
        state.add_shape(CanvasShape::Text {
            text: "hi".to_string(),
            x: 5.0,
            y: 20.0,
            color: "#333".to_string(),
            font: String::new(),
        });
        state.add_shape(CanvasShape::GradientRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            color: "red".to_string(),
            color2: "blue".to_string(),
            direction: GradientDirection::Vertical,
        });

        let calls = render(&state);
        assert_eq!(calls[2], "text hi 5,20 16px Arial #333");
        assert_eq!(calls[3], "gradient red->blue vertical");
    }

    #[test]
    fn test_frame_count() {
        let mut renderer = Renderer::new(RendererConfig {
            background_color: "black".to_string(),
        });
        let mut surface = RecordingSurface::default();
        renderer.render(&CanvasState::default(), &mut surface);
        renderer.render(&CanvasState::default(), &mut surface);

        assert_eq!(renderer.frame_count(), 2);
        assert_eq!(surface.calls[1], "background black");
    }
}
