//! Registration of the drawing primitives with the script engine.
//!
//! Optional trailing parameters are registered as arity overloads filled with
//! the documented defaults. Numeric parameters accept integers or floats.

use canvas_core::{GradientDirection, Point, DEFAULT_COLOR, DEFAULT_FONT, DEFAULT_LINE_WIDTH};
use rhai::{Array, Dynamic, Engine, EvalAltResult, ImmutableString, Position};

use crate::bridge::CanvasBridge;

/// Names of every registered primitive.
pub const PRIMITIVES: [&str; 18] = [
    "DrawRect",
    "DrawCircle",
    "DrawLine",
    "DrawText",
    "Clear",
    "SetSize",
    "DrawEllipse",
    "DrawPolygon",
    "DrawBezier",
    "DrawArc",
    "DrawGradientRect",
    "SetShadow",
    "ClearShadow",
    "Rotate",
    "Translate",
    "Scale",
    "ResetTransform",
    "DrawImage",
];

type FnResult = Result<(), Box<EvalAltResult>>;

const RECT: [&str; 4] = ["x", "y", "width", "height"];
const CIRCLE: [&str; 3] = ["x", "y", "radius"];
const LINE: [&str; 4] = ["x1", "y1", "x2", "y2"];
const ELLIPSE: [&str; 4] = ["x", "y", "radiusX", "radiusY"];
const BEZIER: [&str; 8] = ["x1", "y1", "cp1x", "cp1y", "cp2x", "cp2y", "x2", "y2"];
const ARC: [&str; 5] = ["x", "y", "radius", "startAngle", "endAngle"];
const SHADOW: [&str; 3] = ["offsetX", "offsetY", "blur"];
const XY: [&str; 2] = ["x", "y"];

/// Convert a script value to a number, accepting integers and floats.
#[allow(clippy::cast_precision_loss)]
fn num(value: &Dynamic, param: &str) -> Result<f64, Box<EvalAltResult>> {
    if let Ok(v) = value.as_float() {
        return Ok(v);
    }
    if let Ok(v) = value.as_int() {
        return Ok(v as f64);
    }
    Err(Box::new(EvalAltResult::ErrorMismatchDataType(
        format!("number for '{param}'"),
        value.type_name().to_string(),
        Position::NONE,
    )))
}

fn nums<const N: usize>(
    values: [&Dynamic; N],
    params: [&str; N],
) -> Result<[f64; N], Box<EvalAltResult>> {
    let mut out = [0.0; N];
    for (slot, (value, param)) in out.iter_mut().zip(values.into_iter().zip(params)) {
        *slot = num(value, param)?;
    }
    Ok(out)
}

fn points(values: &Array) -> Result<Vec<Point>, Box<EvalAltResult>> {
    let coords = values
        .iter()
        .map(|v| num(v, "points"))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Point::from_flat(&coords))
}

/// Register the full primitive catalog on `engine`, routed through `bridge`.
#[allow(clippy::too_many_lines)]
pub fn register_primitives(engine: &mut Engine, bridge: &CanvasBridge) {
    // DrawRect(x, y, width, height, color = "#000000", filled = false)
    let b = bridge.clone();
    engine.register_fn(
        "DrawRect",
        move |x: Dynamic, y: Dynamic, w: Dynamic, h: Dynamic| -> FnResult {
            let [x, y, w, h] = nums([&x, &y, &w, &h], RECT)?;
            b.draw_rect(x, y, w, h, DEFAULT_COLOR, false);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawRect",
        move |x: Dynamic, y: Dynamic, w: Dynamic, h: Dynamic, color: ImmutableString| -> FnResult {
            let [x, y, w, h] = nums([&x, &y, &w, &h], RECT)?;
            b.draw_rect(x, y, w, h, &color, false);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawRect",
        move |x: Dynamic,
              y: Dynamic,
              w: Dynamic,
              h: Dynamic,
              color: ImmutableString,
              filled: bool|
              -> FnResult {
            let [x, y, w, h] = nums([&x, &y, &w, &h], RECT)?;
            b.draw_rect(x, y, w, h, &color, filled);
            Ok(())
        },
    );

    // DrawCircle(x, y, radius, color = "#000000", filled = false)
    let b = bridge.clone();
    engine.register_fn(
        "DrawCircle",
        move |x: Dynamic, y: Dynamic, r: Dynamic| -> FnResult {
            let [x, y, r] = nums([&x, &y, &r], CIRCLE)?;
            b.draw_circle(x, y, r, DEFAULT_COLOR, false);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawCircle",
        move |x: Dynamic, y: Dynamic, r: Dynamic, color: ImmutableString| -> FnResult {
            let [x, y, r] = nums([&x, &y, &r], CIRCLE)?;
            b.draw_circle(x, y, r, &color, false);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawCircle",
        move |x: Dynamic, y: Dynamic, r: Dynamic, color: ImmutableString, filled: bool| -> FnResult {
            let [x, y, r] = nums([&x, &y, &r], CIRCLE)?;
            b.draw_circle(x, y, r, &color, filled);
            Ok(())
        },
    );

    // DrawLine(x1, y1, x2, y2, color = "#000000", lineWidth = 1)
    let b = bridge.clone();
    engine.register_fn(
        "DrawLine",
        move |x1: Dynamic, y1: Dynamic, x2: Dynamic, y2: Dynamic| -> FnResult {
            let [x1, y1, x2, y2] = nums([&x1, &y1, &x2, &y2], LINE)?;
            b.draw_line(Point::new(x1, y1), Point::new(x2, y2), DEFAULT_COLOR, DEFAULT_LINE_WIDTH);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawLine",
        move |x1: Dynamic, y1: Dynamic, x2: Dynamic, y2: Dynamic, color: ImmutableString| -> FnResult {
            let [x1, y1, x2, y2] = nums([&x1, &y1, &x2, &y2], LINE)?;
            b.draw_line(Point::new(x1, y1), Point::new(x2, y2), &color, DEFAULT_LINE_WIDTH);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawLine",
        move |x1: Dynamic,
              y1: Dynamic,
              x2: Dynamic,
              y2: Dynamic,
              color: ImmutableString,
              lw: Dynamic|
              -> FnResult {
            let [x1, y1, x2, y2] = nums([&x1, &y1, &x2, &y2], LINE)?;
            let lw = num(&lw, "lineWidth")?;
            b.draw_line(Point::new(x1, y1), Point::new(x2, y2), &color, lw);
            Ok(())
        },
    );

    // DrawText(text, x, y, color = "#000000", font = "16px Arial")
    let b = bridge.clone();
    engine.register_fn(
        "DrawText",
        move |text: Dynamic, x: Dynamic, y: Dynamic| -> FnResult {
            let [x, y] = nums([&x, &y], XY)?;
            b.draw_text(&text.to_string(), x, y, DEFAULT_COLOR, DEFAULT_FONT);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawText",
        move |text: Dynamic, x: Dynamic, y: Dynamic, color: ImmutableString| -> FnResult {
            let [x, y] = nums([&x, &y], XY)?;
            b.draw_text(&text.to_string(), x, y, &color, DEFAULT_FONT);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawText",
        move |text: Dynamic,
              x: Dynamic,
              y: Dynamic,
              color: ImmutableString,
              font: ImmutableString|
              -> FnResult {
            let [x, y] = nums([&x, &y], XY)?;
            b.draw_text(&text.to_string(), x, y, &color, &font);
            Ok(())
        },
    );

    // Clear()
    let b = bridge.clone();
    engine.register_fn("Clear", move || b.clear());

    // SetSize(width, height)
    let b = bridge.clone();
    engine.register_fn("SetSize", move |w: Dynamic, h: Dynamic| -> FnResult {
        let [w, h] = nums([&w, &h], ["width", "height"])?;
        b.set_size(w, h);
        Ok(())
    });

    // DrawEllipse(x, y, radiusX, radiusY, color = "#000000", filled = false)
    let b = bridge.clone();
    engine.register_fn(
        "DrawEllipse",
        move |x: Dynamic, y: Dynamic, rx: Dynamic, ry: Dynamic| -> FnResult {
            let [x, y, rx, ry] = nums([&x, &y, &rx, &ry], ELLIPSE)?;
            b.draw_ellipse(x, y, rx, ry, DEFAULT_COLOR, false);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawEllipse",
        move |x: Dynamic, y: Dynamic, rx: Dynamic, ry: Dynamic, color: ImmutableString| -> FnResult {
            let [x, y, rx, ry] = nums([&x, &y, &rx, &ry], ELLIPSE)?;
            b.draw_ellipse(x, y, rx, ry, &color, false);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawEllipse",
        move |x: Dynamic,
              y: Dynamic,
              rx: Dynamic,
              ry: Dynamic,
              color: ImmutableString,
              filled: bool|
              -> FnResult {
            let [x, y, rx, ry] = nums([&x, &y, &rx, &ry], ELLIPSE)?;
            b.draw_ellipse(x, y, rx, ry, &color, filled);
            Ok(())
        },
    );

    // DrawPolygon(points, color = "#000000", filled = false)
    let b = bridge.clone();
    engine.register_fn("DrawPolygon", move |pts: Array| -> FnResult {
        b.draw_polygon(points(&pts)?, DEFAULT_COLOR, false);
        Ok(())
    });
    let b = bridge.clone();
    engine.register_fn(
        "DrawPolygon",
        move |pts: Array, color: ImmutableString| -> FnResult {
            b.draw_polygon(points(&pts)?, &color, false);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawPolygon",
        move |pts: Array, color: ImmutableString, filled: bool| -> FnResult {
            b.draw_polygon(points(&pts)?, &color, filled);
            Ok(())
        },
    );

    // DrawBezier(x1, y1, cp1x, cp1y, cp2x, cp2y, x2, y2, color = "#000000", lineWidth = 1)
    let bezier = |b: &CanvasBridge, v: [&Dynamic; 8], color: &str, lw: f64| -> FnResult {
        let [x1, y1, c1x, c1y, c2x, c2y, x2, y2] = nums(v, BEZIER)?;
        b.draw_bezier(
            Point::new(x1, y1),
            Point::new(c1x, c1y),
            Point::new(c2x, c2y),
            Point::new(x2, y2),
            color,
            lw,
        );
        Ok(())
    };
    let b = bridge.clone();
    engine.register_fn(
        "DrawBezier",
        move |x1: Dynamic,
              y1: Dynamic,
              c1x: Dynamic,
              c1y: Dynamic,
              c2x: Dynamic,
              c2y: Dynamic,
              x2: Dynamic,
              y2: Dynamic|
              -> FnResult {
            bezier(
                &b,
                [&x1, &y1, &c1x, &c1y, &c2x, &c2y, &x2, &y2],
                DEFAULT_COLOR,
                DEFAULT_LINE_WIDTH,
            )
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawBezier",
        move |x1: Dynamic,
              y1: Dynamic,
              c1x: Dynamic,
              c1y: Dynamic,
              c2x: Dynamic,
              c2y: Dynamic,
              x2: Dynamic,
              y2: Dynamic,
              color: ImmutableString|
              -> FnResult {
            bezier(
                &b,
                [&x1, &y1, &c1x, &c1y, &c2x, &c2y, &x2, &y2],
                &color,
                DEFAULT_LINE_WIDTH,
            )
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawBezier",
        move |x1: Dynamic,
              y1: Dynamic,
              c1x: Dynamic,
              c1y: Dynamic,
              c2x: Dynamic,
              c2y: Dynamic,
              x2: Dynamic,
              y2: Dynamic,
              color: ImmutableString,
              lw: Dynamic|
              -> FnResult {
            let lw = num(&lw, "lineWidth")?;
            bezier(
                &b,
                [&x1, &y1, &c1x, &c1y, &c2x, &c2y, &x2, &y2],
                &color,
                lw,
            )
        },
    );

    // DrawArc(x, y, radius, startAngle, endAngle, color = "#000000", lineWidth = 1)
    let b = bridge.clone();
    engine.register_fn(
        "DrawArc",
        move |x: Dynamic, y: Dynamic, r: Dynamic, start: Dynamic, end: Dynamic| -> FnResult {
            let [x, y, r, start, end] = nums([&x, &y, &r, &start, &end], ARC)?;
            b.draw_arc(x, y, r, start, end, DEFAULT_COLOR, DEFAULT_LINE_WIDTH);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawArc",
        move |x: Dynamic,
              y: Dynamic,
              r: Dynamic,
              start: Dynamic,
              end: Dynamic,
              color: ImmutableString|
              -> FnResult {
            let [x, y, r, start, end] = nums([&x, &y, &r, &start, &end], ARC)?;
            b.draw_arc(x, y, r, start, end, &color, DEFAULT_LINE_WIDTH);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawArc",
        move |x: Dynamic,
              y: Dynamic,
              r: Dynamic,
              start: Dynamic,
              end: Dynamic,
              color: ImmutableString,
              lw: Dynamic|
              -> FnResult {
            let [x, y, r, start, end] = nums([&x, &y, &r, &start, &end], ARC)?;
            let lw = num(&lw, "lineWidth")?;
            b.draw_arc(x, y, r, start, end, &color, lw);
            Ok(())
        },
    );

    // DrawGradientRect(x, y, width, height, color1, color2, direction = "horizontal")
    let b = bridge.clone();
    engine.register_fn(
        "DrawGradientRect",
        move |x: Dynamic,
              y: Dynamic,
              w: Dynamic,
              h: Dynamic,
              c1: ImmutableString,
              c2: ImmutableString|
              -> FnResult {
            let [x, y, w, h] = nums([&x, &y, &w, &h], RECT)?;
            b.draw_gradient_rect(x, y, w, h, &c1, &c2, GradientDirection::Horizontal);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawGradientRect",
        move |x: Dynamic,
              y: Dynamic,
              w: Dynamic,
              h: Dynamic,
              c1: ImmutableString,
              c2: ImmutableString,
              direction: ImmutableString|
              -> FnResult {
            let [x, y, w, h] = nums([&x, &y, &w, &h], RECT)?;
            b.draw_gradient_rect(x, y, w, h, &c1, &c2, GradientDirection::parse(&direction));
            Ok(())
        },
    );

    // SetShadow(offsetX, offsetY, blur, color) / ClearShadow()
    let b = bridge.clone();
    engine.register_fn(
        "SetShadow",
        move |dx: Dynamic, dy: Dynamic, blur: Dynamic, color: ImmutableString| -> FnResult {
            let [dx, dy, blur] = nums([&dx, &dy, &blur], SHADOW)?;
            b.set_shadow(dx, dy, blur, &color);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn("ClearShadow", move || b.clear_shadow());

    // Rotate(angle) / Translate(x, y) / Scale(x, y) / ResetTransform()
    let b = bridge.clone();
    engine.register_fn("Rotate", move |angle: Dynamic| -> FnResult {
        b.rotate(num(&angle, "angle")?);
        Ok(())
    });
    let b = bridge.clone();
    engine.register_fn("Translate", move |x: Dynamic, y: Dynamic| -> FnResult {
        let [x, y] = nums([&x, &y], XY)?;
        b.translate(x, y);
        Ok(())
    });
    let b = bridge.clone();
    engine.register_fn("Scale", move |x: Dynamic, y: Dynamic| -> FnResult {
        let [x, y] = nums([&x, &y], XY)?;
        b.scale(x, y);
        Ok(())
    });
    let b = bridge.clone();
    engine.register_fn("ResetTransform", move || b.reset_transform());

    // DrawImage(imageUrl, x, y, width = 0, height = 0)
    let b = bridge.clone();
    engine.register_fn(
        "DrawImage",
        move |url: ImmutableString, x: Dynamic, y: Dynamic| -> FnResult {
            let [x, y] = nums([&x, &y], XY)?;
            b.draw_image(&url, x, y, 0.0, 0.0);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawImage",
        move |url: ImmutableString, x: Dynamic, y: Dynamic, w: Dynamic| -> FnResult {
            let [x, y, w] = nums([&x, &y, &w], ["x", "y", "width"])?;
            b.draw_image(&url, x, y, w, 0.0);
            Ok(())
        },
    );
    let b = bridge.clone();
    engine.register_fn(
        "DrawImage",
        move |url: ImmutableString, x: Dynamic, y: Dynamic, w: Dynamic, h: Dynamic| -> FnResult {
            let [x, y, w, h] = nums([&x, &y, &w, &h], RECT)?;
            b.draw_image(&url, x, y, w, h);
            Ok(())
        },
    );

    tracing::debug!("Registered {} canvas primitives", PRIMITIVES.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::{CanvasShape, CanvasStore, CanvasTransform, ShapeKind};

    fn engine_with_canvas() -> (Engine, CanvasStore) {
        let store = CanvasStore::new();
        let mut engine = Engine::new();
        register_primitives(&mut engine, &CanvasBridge::attached(store.clone()));
        (engine, store)
    }

    fn kinds(store: &CanvasStore) -> Vec<ShapeKind> {
        store.read(|s| s.shapes().iter().map(CanvasShape::kind).collect())
    }

    #[test]
    fn test_defaults_fill_in() {
        let (engine, store) = engine_with_canvas();
        engine.run("DrawRect(10, 10, 50, 30);").expect("runs");

        let shape = store.read(|s| s.shapes()[0].clone());
        assert_eq!(
            shape,
            CanvasShape::Rect {
                x: 10.0,
                y: 10.0,
                width: 50.0,
                height: 30.0,
                color: "#000000".to_string(),
            }
        );
        assert!((shape.line_width() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_filled_overloads() {
        let (engine, store) = engine_with_canvas();
        engine
            .run(
                r##"
                DrawRect(10, 10, 50, 30, "#ff0000", true);
                DrawCircle(5, 5, 2.5, "blue", true);
                DrawEllipse(1, 2, 3, 4, "green");
                DrawPolygon([0, 0, 10, 0, 5, 8, 99], "red", true);
                "##,
            )
            .expect("runs");

        assert_eq!(
            kinds(&store),
            vec![
                ShapeKind::FilledRect,
                ShapeKind::FilledCircle,
                ShapeKind::Ellipse,
                ShapeKind::FilledPolygon,
            ]
        );
        let points = store.read(|s| match &s.shapes()[3] {
            CanvasShape::FilledPolygon { points, .. } => points.len(),
            _ => 0,
        });
        assert_eq!(points, 3);
    }

    #[test]
    fn test_every_primitive_is_callable() {
        let (engine, store) = engine_with_canvas();
        engine
            .run(
                r#"
                SetSize(800, 600);
                DrawLine(0, 0, 10, 10, "red", 3);
                DrawText("hi", 1, 2, "black", "12px serif");
                DrawText(42, 1, 2);
                DrawBezier(0, 0, 1, 1, 2, 2, 3, 3);
                DrawArc(50, 50, 10, 0, 3.14, "purple", 2);
                DrawGradientRect(0, 0, 10, 10, "red", "blue", "vertical");
                DrawImage("cat.png", 1, 2);
                DrawImage("dog.png", 1, 2, 30, 40);
                SetShadow(2, 2, 4, "gray");
                Rotate(0.5);
                Translate(10, 20);
                Scale(2, 2);
                "#,
            )
            .expect("runs");

        let state = store.snapshot();
        assert_eq!((state.width, state.height), (800.0, 600.0));
        assert_eq!(state.shapes().len(), 8);
        assert_eq!(
            state.transforms(),
            &[
                CanvasTransform::Rotate { angle: 0.5 },
                CanvasTransform::Translate { dx: 10.0, dy: 20.0 },
                CanvasTransform::Scale { sx: 2.0, sy: 2.0 },
            ]
        );
        assert!(state.shadow().is_some());
        assert!(matches!(
            &state.shapes()[1],
            CanvasShape::Text { font, .. } if font == "12px serif"
        ));
        assert!(matches!(
            &state.shapes()[2],
            CanvasShape::Text { text, font, .. } if text == "42" && font == DEFAULT_FONT
        ));
        assert!(matches!(
            state.shapes()[5],
            CanvasShape::GradientRect { direction: GradientDirection::Vertical, .. }
        ));

        engine
            .run("Clear(); ClearShadow(); ResetTransform();")
            .expect("runs");
        let state = store.snapshot();
        assert!(state.is_empty());
        assert!(state.shadow().is_none());
        assert!(state.transforms().is_empty());
    }

    #[test]
    fn test_non_numeric_argument_is_type_mismatch() {
        let (engine, store) = engine_with_canvas();
        let err = engine
            .run(r#"DrawCircle("ten", 10, 5);"#)
            .expect_err("string radius position");
        assert!(err.to_string().contains("number for 'x'"));
        assert_eq!(store.shape_count(), 0);
    }

    #[test]
    fn test_detached_primitives_are_silent() {
        let mut engine = Engine::new();
        register_primitives(&mut engine, &CanvasBridge::new());
        engine
            .run("DrawRect(1, 2, 3, 4); Rotate(1); Clear();")
            .expect("no-ops do not raise");
    }
}
