//! Canvas shapes, transforms and shadow - the building blocks of a drawing.

use serde::{Deserialize, Serialize};

/// Colour used when a primitive is called without one.
pub const DEFAULT_COLOR: &str = "#000000";

/// Stroke width used when a primitive is called without one.
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Font used by text shapes when none is given.
pub const DEFAULT_FONT: &str = "16px Arial";

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (pixels from left).
    pub x: f64,
    /// Y coordinate (pixels from top).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build points from a flat `[x0, y0, x1, y1, ...]` list.
    ///
    /// A trailing unpaired coordinate is ignored.
    #[must_use]
    pub fn from_flat(coords: &[f64]) -> Vec<Self> {
        coords
            .chunks_exact(2)
            .map(|pair| Self::new(pair[0], pair[1]))
            .collect()
    }
}

/// Orientation of a two-stop gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl GradientDirection {
    /// Parse a direction name. Anything other than `"vertical"` is horizontal.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("vertical") {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    /// The lowercase name of this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// One committed drawing operation.
///
/// Stroke and fill variants are distinct kinds; renderers dispatch on the
/// kind, never on a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CanvasShape {
    /// Outlined rectangle.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Stroke colour.
        color: String,
    },
    /// Filled rectangle.
    FilledRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Fill colour.
        color: String,
    },
    /// Outlined circle.
    Circle {
        /// Centre X.
        x: f64,
        /// Centre Y.
        y: f64,
        /// Radius.
        radius: f64,
        /// Stroke colour.
        color: String,
    },
    /// Filled circle.
    FilledCircle {
        /// Centre X.
        x: f64,
        /// Centre Y.
        y: f64,
        /// Radius.
        radius: f64,
        /// Fill colour.
        color: String,
    },
    /// Outlined axis-aligned ellipse.
    Ellipse {
        /// Centre X.
        x: f64,
        /// Centre Y.
        y: f64,
        /// Horizontal radius.
        radius_x: f64,
        /// Vertical radius.
        radius_y: f64,
        /// Stroke colour.
        color: String,
    },
    /// Filled axis-aligned ellipse.
    FilledEllipse {
        /// Centre X.
        x: f64,
        /// Centre Y.
        y: f64,
        /// Horizontal radius.
        radius_x: f64,
        /// Vertical radius.
        radius_y: f64,
        /// Fill colour.
        color: String,
    },
    /// Straight line segment.
    Line {
        /// Start X.
        x1: f64,
        /// Start Y.
        y1: f64,
        /// End X.
        x2: f64,
        /// End Y.
        y2: f64,
        /// Stroke colour.
        color: String,
        /// Stroke width.
        line_width: f64,
    },
    /// Closed outlined polygon.
    Polygon {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Stroke colour.
        color: String,
    },
    /// Closed filled polygon.
    FilledPolygon {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Fill colour.
        color: String,
    },
    /// Cubic bezier curve.
    Bezier {
        /// Curve start.
        start: Point,
        /// First control point.
        control1: Point,
        /// Second control point.
        control2: Point,
        /// Curve end.
        end: Point,
        /// Stroke colour.
        color: String,
        /// Stroke width.
        line_width: f64,
    },
    /// Circular arc (angles in radians).
    Arc {
        /// Centre X.
        x: f64,
        /// Centre Y.
        y: f64,
        /// Radius.
        radius: f64,
        /// Start angle in radians.
        start_angle: f64,
        /// End angle in radians.
        end_angle: f64,
        /// Stroke colour.
        color: String,
        /// Stroke width.
        line_width: f64,
    },
    /// Filled text drawn at a baseline position.
    Text {
        /// Text content.
        text: String,
        /// Baseline X.
        x: f64,
        /// Baseline Y.
        y: f64,
        /// Fill colour.
        color: String,
        /// CSS-style font shorthand, e.g. `16px Arial`.
        font: String,
    },
    /// Rectangle filled with a two-stop linear gradient.
    GradientRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Start colour.
        color: String,
        /// End colour.
        color2: String,
        /// Gradient orientation.
        direction: GradientDirection,
    },
    /// Image referenced by URL.
    ///
    /// A non-positive width or height means "natural size".
    Image {
        /// Image source URL.
        url: String,
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Target width, or 0 for natural size.
        width: f64,
        /// Target height, or 0 for natural size.
        height: f64,
    },
}

/// Kind tag of a [`CanvasShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// `rect`
    Rect,
    /// `filledRect`
    FilledRect,
    /// `circle`
    Circle,
    /// `filledCircle`
    FilledCircle,
    /// `ellipse`
    Ellipse,
    /// `filledEllipse`
    FilledEllipse,
    /// `line`
    Line,
    /// `polygon`
    Polygon,
    /// `filledPolygon`
    FilledPolygon,
    /// `bezier`
    Bezier,
    /// `arc`
    Arc,
    /// `text`
    Text,
    /// `gradientRect`
    GradientRect,
    /// `image`
    Image,
}

impl ShapeKind {
    /// The tag used on the wire and by renderers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::FilledRect => "filledRect",
            Self::Circle => "circle",
            Self::FilledCircle => "filledCircle",
            Self::Ellipse => "ellipse",
            Self::FilledEllipse => "filledEllipse",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::FilledPolygon => "filledPolygon",
            Self::Bezier => "bezier",
            Self::Arc => "arc",
            Self::Text => "text",
            Self::GradientRect => "gradientRect",
            Self::Image => "image",
        }
    }

    /// Whether shapes of this kind are painted with a fill.
    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(
            self,
            Self::FilledRect
                | Self::FilledCircle
                | Self::FilledEllipse
                | Self::FilledPolygon
                | Self::Text
                | Self::GradientRect
        )
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CanvasShape {
    /// The kind tag of this shape.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect { .. } => ShapeKind::Rect,
            Self::FilledRect { .. } => ShapeKind::FilledRect,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::FilledCircle { .. } => ShapeKind::FilledCircle,
            Self::Ellipse { .. } => ShapeKind::Ellipse,
            Self::FilledEllipse { .. } => ShapeKind::FilledEllipse,
            Self::Line { .. } => ShapeKind::Line,
            Self::Polygon { .. } => ShapeKind::Polygon,
            Self::FilledPolygon { .. } => ShapeKind::FilledPolygon,
            Self::Bezier { .. } => ShapeKind::Bezier,
            Self::Arc { .. } => ShapeKind::Arc,
            Self::Text { .. } => ShapeKind::Text,
            Self::GradientRect { .. } => ShapeKind::GradientRect,
            Self::Image { .. } => ShapeKind::Image,
        }
    }

    /// The primary colour of this shape. Images have none.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Rect { color, .. }
            | Self::FilledRect { color, .. }
            | Self::Circle { color, .. }
            | Self::FilledCircle { color, .. }
            | Self::Ellipse { color, .. }
            | Self::FilledEllipse { color, .. }
            | Self::Line { color, .. }
            | Self::Polygon { color, .. }
            | Self::FilledPolygon { color, .. }
            | Self::Bezier { color, .. }
            | Self::Arc { color, .. }
            | Self::Text { color, .. }
            | Self::GradientRect { color, .. } => Some(color),
            Self::Image { .. } => None,
        }
    }

    /// Stroke width; kinds without one report [`DEFAULT_LINE_WIDTH`].
    #[must_use]
    pub fn line_width(&self) -> f64 {
        match self {
            Self::Line { line_width, .. }
            | Self::Bezier { line_width, .. }
            | Self::Arc { line_width, .. } => *line_width,
            _ => DEFAULT_LINE_WIDTH,
        }
    }
}

/// One committed coordinate-system operation.
///
/// Transforms are kept as an ordered list and applied in append order by the
/// renderer; they are never folded into a matrix here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasTransform {
    /// Move the origin.
    Translate {
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
    },
    /// Rotate the coordinate system.
    Rotate {
        /// Angle in radians.
        angle: f64,
    },
    /// Scale the axes.
    Scale {
        /// Horizontal factor.
        sx: f64,
        /// Vertical factor.
        sy: f64,
    },
}

/// Drop shadow applied to every painted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasShadow {
    /// Horizontal shadow offset.
    pub offset_x: f64,
    /// Vertical shadow offset.
    pub offset_y: f64,
    /// Blur radius.
    pub blur: f64,
    /// Shadow colour.
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_match_wire_names() {
        let shape = CanvasShape::FilledRect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            color: DEFAULT_COLOR.to_string(),
        };
        assert_eq!(shape.kind().as_str(), "filledRect");

        let json = serde_json::to_value(&shape).expect("serialize");
        assert_eq!(json["type"], "filledRect");
        assert_eq!(json["width"], 3.0);
    }

    #[test]
    fn test_camel_case_fields() {
        let shape = CanvasShape::Ellipse {
            x: 0.0,
            y: 0.0,
            radius_x: 5.0,
            radius_y: 7.0,
            color: "#123456".to_string(),
        };
        let json = serde_json::to_value(&shape).expect("serialize");
        assert_eq!(json["radiusX"], 5.0);
        assert_eq!(json["radiusY"], 7.0);

        let back: CanvasShape = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, shape);
    }

    #[test]
    fn test_line_width_defaults_for_area_shapes() {
        let circle = CanvasShape::Circle {
            x: 0.0,
            y: 0.0,
            radius: 3.0,
            color: DEFAULT_COLOR.to_string(),
        };
        assert!((circle.line_width() - DEFAULT_LINE_WIDTH).abs() < f64::EPSILON);

        let arc = CanvasShape::Arc {
            x: 0.0,
            y: 0.0,
            radius: 3.0,
            start_angle: 0.0,
            end_angle: 1.0,
            color: DEFAULT_COLOR.to_string(),
            line_width: 4.0,
        };
        assert!((arc.line_width() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_has_no_color() {
        let image = CanvasShape::Image {
            url: "cat.png".to_string(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
        assert!(image.color().is_none());
        assert!(!image.kind().is_filled());
    }

    #[test]
    fn test_points_from_flat_drops_odd_coordinate() {
        let points = Point::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_gradient_direction_parse() {
        assert_eq!(GradientDirection::parse("vertical"), GradientDirection::Vertical);
        assert_eq!(GradientDirection::parse("VERTICAL"), GradientDirection::Vertical);
        assert_eq!(GradientDirection::parse("horizontal"), GradientDirection::Horizontal);
        assert_eq!(GradientDirection::parse("diagonal"), GradientDirection::Horizontal);
    }

    #[test]
    fn test_transform_tags() {
        let json = serde_json::to_value(CanvasTransform::Rotate { angle: 0.5 }).expect("serialize");
        assert_eq!(json["type"], "rotate");
        assert_eq!(json["angle"], 0.5);
    }
}
