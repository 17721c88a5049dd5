//! SVG surface.
//!
//! Accumulates painted shapes as SVG markup. Each shape is wrapped in a group
//! carrying the transform list active when it was painted, so the output keeps
//! the canvas semantics of transforms applying in call order.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use canvas_core::{CanvasShadow, Point};

use crate::surface::{LinearGradient, PathShape, Surface};

const SHADOW_FILTER_ID: &str = "shadow";

/// A [`Surface`] that produces an SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    transform: String,
    shadowed: bool,
    gradient_count: usize,
    defs: String,
    body: String,
}

impl SvgSurface {
    /// Create an empty surface. Call [`Surface::clear`] to size it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface dimensions as last passed to [`Surface::clear`].
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Produce the SVG document for everything painted so far.
    #[must_use]
    pub fn finish(&self) -> String {
        let mut svg = String::with_capacity(self.body.len() + self.defs.len() + 256);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height,
        );
        if !self.defs.is_empty() {
            let _ = write!(svg, "<defs>{}</defs>", self.defs);
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }

    fn push_transform(&mut self, op: std::fmt::Arguments<'_>) {
        if !self.transform.is_empty() {
            self.transform.push(' ');
        }
        let _ = self.transform.write_fmt(op);
    }

    fn open_group(&mut self) {
        if self.transform.is_empty() && !self.shadowed {
            return;
        }
        self.body.push_str("<g");
        if !self.transform.is_empty() {
            let _ = write!(self.body, " transform=\"{}\"", self.transform);
        }
        if self.shadowed {
            let _ = write!(self.body, " filter=\"url(#{SHADOW_FILTER_ID})\"");
        }
        self.body.push('>');
    }

    fn close_group(&mut self) {
        if !self.transform.is_empty() || self.shadowed {
            self.body.push_str("</g>");
        }
    }

    fn paint(&mut self, path: PathShape<'_>, paint: &str) {
        self.open_group();
        match path {
            PathShape::Rect {
                x,
                y,
                width,
                height,
            } => {
                let _ = write!(
                    self.body,
                    "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" {paint}/>"
                );
            }
            PathShape::Arc {
                cx,
                cy,
                radius,
                start,
                end,
            } => {
                if end - start >= TAU {
                    let _ = write!(
                        self.body,
                        "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" {paint}/>"
                    );
                } else {
                    let d = arc_path(cx, cy, radius, start, end);
                    let _ = write!(self.body, "<path d=\"{d}\" {paint}/>");
                }
            }
            PathShape::Ellipse { cx, cy, rx, ry } => {
                let _ = write!(
                    self.body,
                    "<ellipse cx=\"{cx}\" cy=\"{cy}\" rx=\"{rx}\" ry=\"{ry}\" {paint}/>"
                );
            }
            PathShape::Line { from, to } => {
                let _ = write!(
                    self.body,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {paint}/>",
                    from.x, from.y, to.x, to.y
                );
            }
            PathShape::Polygon(points) => {
                let _ = write!(
                    self.body,
                    "<polygon points=\"{}\" {paint}/>",
                    point_list(points)
                );
            }
            PathShape::Bezier {
                start,
                control1,
                control2,
                end,
            } => {
                let _ = write!(
                    self.body,
                    "<path d=\"M{},{} C{},{} {},{} {},{}\" {paint}/>",
                    start.x, start.y, control1.x, control1.y, control2.x, control2.y, end.x, end.y
                );
            }
        }
        self.close_group();
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: f64, height: f64) {
        *self = Self {
            width,
            height,
            ..Self::default()
        };
    }

    fn fill_background(&mut self, color: &str) {
        let _ = write!(
            self.body,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(color)
        );
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push_transform(format_args!("translate({dx} {dy})"));
    }

    fn rotate(&mut self, radians: f64) {
        let degrees = radians.to_degrees();
        self.push_transform(format_args!("rotate({degrees})"));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.push_transform(format_args!("scale({sx} {sy})"));
    }

    fn set_shadow(&mut self, shadow: &CanvasShadow) {
        // Canvas blur is roughly twice the Gaussian standard deviation.
        let deviation = (shadow.blur / 2.0).max(0.0);
        let _ = write!(
            self.defs,
            "<filter id=\"{SHADOW_FILTER_ID}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\"><feDropShadow dx=\"{}\" dy=\"{}\" stdDeviation=\"{deviation}\" flood-color=\"{}\"/></filter>",
            shadow.offset_x,
            shadow.offset_y,
            escape_xml(&shadow.color),
        );
        self.shadowed = true;
    }

    fn stroke(&mut self, path: PathShape<'_>, color: &str, line_width: f64) {
        let paint = format!(
            "fill=\"none\" stroke=\"{}\" stroke-width=\"{line_width}\"",
            escape_xml(color)
        );
        self.paint(path, &paint);
    }

    fn fill(&mut self, path: PathShape<'_>, color: &str) {
        let paint = format!("fill=\"{}\"", escape_xml(color));
        self.paint(path, &paint);
    }

    fn fill_gradient_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        gradient: LinearGradient<'_>,
    ) {
        self.gradient_count += 1;
        let id = format!("gradient{}", self.gradient_count);
        let (x1, y1, x2, y2) = gradient.endpoints(x, y, width, height);
        let _ = write!(
            self.defs,
            "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\"><stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/></linearGradient>",
            escape_xml(gradient.from),
            escape_xml(gradient.to),
        );
        let paint = format!("fill=\"url(#{id})\"");
        self.paint(
            PathShape::Rect {
                x,
                y,
                width,
                height,
            },
            &paint,
        );
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) {
        self.open_group();
        let _ = write!(
            self.body,
            "<text x=\"{x}\" y=\"{y}\" fill=\"{}\" style=\"font: {}\">{}</text>",
            escape_xml(color),
            escape_xml(font),
            escape_xml(text),
        );
        self.close_group();
    }

    fn draw_image(&mut self, url: &str, x: f64, y: f64, size: Option<(f64, f64)>) {
        self.open_group();
        let _ = write!(self.body, "<image href=\"{}\" x=\"{x}\" y=\"{y}\"", escape_xml(url));
        if let Some((width, height)) = size {
            let _ = write!(
                self.body,
                " width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"none\""
            );
        }
        self.body.push_str("/>");
        self.close_group();
    }
}

fn arc_path(cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> String {
    let sweep = (end - start).rem_euclid(TAU);
    let end = start + sweep;
    let (x1, y1) = (cx + radius * start.cos(), cy + radius * start.sin());
    let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
    let large_arc = i32::from(sweep > PI);
    format!("M{x1},{y1} A{radius},{radius} 0 {large_arc},1 {x2},{y2}")
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::GradientDirection;

    fn sized() -> SvgSurface {
        let mut surface = SvgSurface::new();
        surface.clear(200.0, 100.0);
        surface
    }

    #[test]
    fn test_empty_document() {
        let svg = sized().finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("viewBox=\"0 0 200 100\""));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn test_shapes_without_state_are_ungrouped() {
        let mut surface = sized();
        surface.fill(
            PathShape::Rect {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
            },
            "#ff0000",
        );
        let svg = surface.finish();
        assert!(svg.contains("<rect x=\"1\" y=\"2\" width=\"3\" height=\"4\" fill=\"#ff0000\"/>"));
        assert!(!svg.contains("<g"));
    }

    #[test]
    fn test_transforms_accumulate_in_order() {
        let mut surface = sized();
        surface.translate(10.0, 20.0);
        surface.rotate(0.0);
        surface.stroke(
            PathShape::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(5.0, 5.0),
            },
            "#000000",
            2.0,
        );
        let svg = surface.finish();
        assert!(svg.contains("<g transform=\"translate(10 20) rotate(0)\">"));
        assert!(svg.contains("stroke-width=\"2\""));
    }

    #[test]
    fn test_shadow_filter() {
        let mut surface = sized();
        surface.set_shadow(&CanvasShadow {
            offset_x: 3.0,
            offset_y: 4.0,
            blur: 10.0,
            color: "rgba(0,0,0,0.5)".to_string(),
        });
        surface.fill(
            PathShape::Ellipse {
                cx: 5.0,
                cy: 5.0,
                rx: 2.0,
                ry: 1.0,
            },
            "blue",
        );
        let svg = surface.finish();
        assert!(svg.contains("<feDropShadow dx=\"3\" dy=\"4\" stdDeviation=\"5\""));
        assert!(svg.contains("filter=\"url(#shadow)\""));
    }

    #[test]
    fn test_gradient_defs() {
        let mut surface = sized();
        surface.fill_gradient_rect(
            0.0,
            0.0,
            50.0,
            20.0,
            LinearGradient {
                from: "red",
                to: "yellow",
                direction: GradientDirection::Vertical,
            },
        );
        let svg = surface.finish();
        assert!(svg.contains("<linearGradient id=\"gradient1\""));
        assert!(svg.contains("x2=\"0\" y2=\"20\""));
        assert!(svg.contains("fill=\"url(#gradient1)\""));
    }

    #[test]
    fn test_partial_arc_path() {
        let d = arc_path(0.0, 0.0, 10.0, 0.0, PI / 2.0);
        assert!(d.starts_with("M10,0 A10,10 0 0,1"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut surface = sized();
        surface.fill_text("A < B & C", 1.0, 2.0, "16px Arial", "#000000");
        let svg = surface.finish();
        assert!(svg.contains("A &lt; B &amp; C"));
        assert!(svg.contains("style=\"font: 16px Arial\""));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut surface = sized();
        surface.translate(1.0, 1.0);
        surface.fill_background("#ffffff");
        surface.clear(10.0, 10.0);
        surface.fill(
            PathShape::Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            },
            "black",
        );
        let svg = surface.finish();
        assert!(!svg.contains("translate"));
        assert!(!svg.contains("100%"));
        assert_eq!(surface.size(), (10.0, 10.0));
    }
}
