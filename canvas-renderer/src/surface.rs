//! Drawing surfaces.
//!
//! A [`Surface`] is the immediate-mode target the [`Renderer`](crate::Renderer)
//! paints onto. Its vocabulary mirrors a 2D canvas context: the transform
//! state accumulates until the next [`Surface::clear`].

use canvas_core::{CanvasShadow, GradientDirection, Point};

/// Geometry that can be stroked or filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathShape<'a> {
    /// Axis-aligned rectangle.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Circular arc, clockwise from `start` to `end` radians.
    Arc {
        /// Centre X.
        cx: f64,
        /// Centre Y.
        cy: f64,
        /// Radius.
        radius: f64,
        /// Start angle in radians.
        start: f64,
        /// End angle in radians.
        end: f64,
    },
    /// Full axis-aligned ellipse.
    Ellipse {
        /// Centre X.
        cx: f64,
        /// Centre Y.
        cy: f64,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
    },
    /// Straight segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// Closed polygon through at least two points.
    Polygon(&'a [Point]),
    /// Cubic Bezier curve.
    Bezier {
        /// Start point.
        start: Point,
        /// First control point.
        control1: Point,
        /// Second control point.
        control2: Point,
        /// End point.
        end: Point,
    },
}

/// Two-stop linear gradient spanning a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient<'a> {
    /// Colour at the start edge.
    pub from: &'a str,
    /// Colour at the end edge.
    pub to: &'a str,
    /// Axis the colours blend along.
    pub direction: GradientDirection,
}

impl LinearGradient<'_> {
    /// Gradient line `(x1, y1, x2, y2)` for a rectangle.
    #[must_use]
    pub fn endpoints(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
        match self.direction {
            GradientDirection::Horizontal => (x, y, x + width, y),
            GradientDirection::Vertical => (x, y, x, y + height),
        }
    }
}

/// Target of the rendering contract.
pub trait Surface {
    /// Discard all content and transform state, resizing to `width`x`height`.
    fn clear(&mut self, width: f64, height: f64);

    /// Fill the whole surface with a colour, ignoring transforms.
    fn fill_background(&mut self, color: &str);

    /// Move the origin.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotate the coordinate system by `radians`.
    fn rotate(&mut self, radians: f64);

    /// Scale the axes.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Apply a drop shadow to everything painted afterwards.
    fn set_shadow(&mut self, shadow: &CanvasShadow);

    /// Outline a path.
    fn stroke(&mut self, path: PathShape<'_>, color: &str, line_width: f64);

    /// Fill a path.
    fn fill(&mut self, path: PathShape<'_>, color: &str);

    /// Fill a rectangle with a linear gradient.
    fn fill_gradient_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        gradient: LinearGradient<'_>,
    );

    /// Draw text with its baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str);

    /// Draw an image; `size` of `None` means natural size.
    fn draw_image(&mut self, url: &str, x: f64, y: f64, size: Option<(f64, f64)>);
}
