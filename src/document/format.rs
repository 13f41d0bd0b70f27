//! One-line-per-shape text format.
//!
//! ```text
//! Line,x1,y1,x2,y2,#rrggbb
//! Circle,cx,cy,px,py,#rrggbb
//! Capsule,c1x,c1y,c2x,c2y,px,py,#rrggbb
//! Polygon,#rrggbb,fill|none,texture|none,x;y,x;y,...
//! Rectangle,x1,y1,x2,y2,#rrggbb,fill|none,texture|none
//! ```
//!
//! Thickness and antialiasing are not part of the format; parsed shapes carry
//! the default style for those fields.

use crate::draw::{Color, Point, Shape, ShapeKind, Texture};

const NONE: &str = "none";

/// Formats one shape as a single line (without the trailing newline).
pub fn serialize(shape: &Shape) -> String {
    let style = shape.style();
    let border = style.border_color.to_hex();
    let fill = || style.fill_color.map_or_else(|| NONE.to_string(), |c| c.to_hex());
    let texture = || {
        style
            .texture
            .as_ref()
            .map_or(NONE, |texture| texture.path())
            .to_string()
    };

    match shape {
        Shape::Line(line) => format!(
            "Line,{},{},{},{},{border}",
            line.start.x, line.start.y, line.end.x, line.end.y
        ),
        Shape::Circle(circle) => format!(
            "Circle,{},{},{},{},{border}",
            circle.center.x, circle.center.y, circle.point_on_circle.x, circle.point_on_circle.y
        ),
        Shape::Capsule(capsule) => format!(
            "Capsule,{},{},{},{},{},{},{border}",
            capsule.center1.x,
            capsule.center1.y,
            capsule.center2.x,
            capsule.center2.y,
            capsule.radius_point.x,
            capsule.radius_point.y
        ),
        Shape::Polygon(polygon) => {
            let mut fields = vec![
                ShapeKind::Polygon.tag().to_string(),
                border,
                fill(),
                texture(),
            ];
            fields.extend(polygon.vertices.iter().map(|v| format!("{};{}", v.x, v.y)));
            fields.join(",")
        }
        Shape::Rectangle(rect) => format!(
            "Rectangle,{},{},{},{},{border},{},{}",
            rect.corner1.x,
            rect.corner1.y,
            rect.corner2.x,
            rect.corner2.y,
            fill(),
            texture()
        ),
    }
}

/// Parses one line. Anything malformed yields `None`, never a partial shape.
pub fn deserialize(line: &str) -> Option<Shape> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    let kind = ShapeKind::from_tag(fields.first()?)?;

    let mut shape = match kind {
        ShapeKind::Line if fields.len() == 6 => {
            let mut shape = Shape::line(point(&fields[1..3])?, point(&fields[3..5])?);
            shape.style_mut().border_color = Color::from_hex(fields[5])?;
            shape
        }
        ShapeKind::Circle if fields.len() == 6 => {
            let mut shape = Shape::circle(point(&fields[1..3])?, point(&fields[3..5])?);
            shape.style_mut().border_color = Color::from_hex(fields[5])?;
            shape
        }
        ShapeKind::Capsule if fields.len() == 8 => {
            let mut shape = Shape::capsule(
                point(&fields[1..3])?,
                point(&fields[3..5])?,
                point(&fields[5..7])?,
            );
            shape.style_mut().border_color = Color::from_hex(fields[7])?;
            shape
        }
        ShapeKind::Polygon if fields.len() >= 4 => {
            let vertices = fields[4..]
                .iter()
                .map(|field| vertex(field))
                .collect::<Option<Vec<_>>>()?;
            let mut shape = Shape::polygon(vertices);
            let style = shape.style_mut();
            style.border_color = Color::from_hex(fields[1])?;
            style.fill_color = optional_color(fields[2])?;
            style.texture = optional_texture(fields[3]);
            shape
        }
        ShapeKind::Rectangle if fields.len() == 8 => {
            let mut shape = Shape::rectangle(point(&fields[1..3])?, point(&fields[3..5])?);
            let style = shape.style_mut();
            style.border_color = Color::from_hex(fields[5])?;
            style.fill_color = optional_color(fields[6])?;
            style.texture = optional_texture(fields[7]);
            shape
        }
        _ => return None,
    };

    if let Shape::Polygon(polygon) = &mut shape {
        polygon.set_preview(false);
    }
    Some(shape)
}

fn point(fields: &[&str]) -> Option<Point> {
    match fields {
        [x, y] => Some(Point::new(x.parse().ok()?, y.parse().ok()?)),
        _ => None,
    }
}

fn vertex(field: &str) -> Option<Point> {
    let (x, y) = field.split_once(';')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// `Some(None)` for the explicit `none` token, `None` for garbage.
fn optional_color(field: &str) -> Option<Option<Color>> {
    if field == NONE {
        Some(None)
    } else {
        Color::from_hex(field).map(Some)
    }
}

fn optional_texture(field: &str) -> Option<Texture> {
    (field != NONE && !field.is_empty()).then(|| Texture::unloaded(field))
}

/// Result of parsing a whole document.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Shapes in file order (bottom to top)
    pub shapes: Vec<Shape>,
    /// 1-based numbers of lines that could not be parsed
    pub skipped_lines: Vec<usize>,
}

/// Parses a document, skipping blank and malformed lines.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut parsed = ParsedDocument::default();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match deserialize(line) {
            Some(shape) => parsed.shapes.push(shape),
            None => {
                log::warn!("Skipping malformed shape on line {}: {line}", index + 1);
                parsed.skipped_lines.push(index + 1);
            }
        }
    }
    parsed
}

/// Formats shapes one per line, each newline-terminated.
pub fn write_document<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> String {
    let mut out = String::new();
    for shape in shapes {
        out.push_str(&serialize(shape));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, GREEN, RED};

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn scenario_line_parses() {
        let shape = deserialize("Line,0,0,10,0,#000000").unwrap();
        assert_eq!(shape.vertices(), vec![p(0, 0), p(10, 0)]);
        assert_eq!(shape.style().border_color, Color::rgb(0, 0, 0));
    }

    #[test]
    fn every_variant_round_trips() {
        let mut filled = Shape::rectangle(p(9, 1), p(-3, 7));
        filled.style_mut().border_color = RED;
        filled.style_mut().fill_color = Some(GREEN);
        filled.style_mut().texture = Some(Texture::unloaded("tiles/brick.png"));

        let mut polygon = Shape::polygon(vec![p(0, 0), p(10, -4), p(6, 8)]);
        polygon.style_mut().border_color = BLUE;
        polygon.style_mut().texture = Some(Texture::unloaded("wood.png"));

        let shapes = [
            Shape::line(p(1, 2), p(-3, 4)),
            Shape::circle(p(20, 20), p(25, 20)),
            Shape::capsule(p(0, 0), p(30, 10), p(33, 14)),
            polygon,
            Shape::polygon(Vec::new()),
            filled,
            Shape::rectangle(p(0, 0), p(4, 4)),
        ];
        for shape in shapes {
            let line = serialize(&shape);
            let parsed = deserialize(&line).unwrap_or_else(|| panic!("failed to parse {line}"));
            assert_eq!(parsed, shape, "{line}");
            assert_eq!(serialize(&parsed), line);
        }
    }

    #[test]
    fn exact_line_formats() {
        let mut rect = Shape::rectangle(p(1, 2), p(3, 4));
        rect.style_mut().fill_color = Some(Color::rgb(0xAA, 0xBB, 0xCC));
        assert_eq!(serialize(&rect), "Rectangle,1,2,3,4,#000000,#aabbcc,none");

        let polygon = Shape::polygon(vec![p(1, 2), p(3, 4), p(5, 6)]);
        assert_eq!(serialize(&polygon), "Polygon,#000000,none,none,1;2,3;4,5;6");

        let capsule = Shape::capsule(p(1, 2), p(3, 4), p(5, 6));
        assert_eq!(serialize(&capsule), "Capsule,1,2,3,4,5,6,#000000");
    }

    #[test]
    fn colors_are_case_insensitive_on_input() {
        let shape = deserialize("Circle,0,0,3,4,#FF00aa").unwrap();
        assert_eq!(shape.style().border_color, Color::rgb(255, 0, 170));
        assert_eq!(serialize(&shape), "Circle,0,0,3,4,#ff00aa");
    }

    #[test]
    fn malformed_lines_produce_nothing() {
        for line in [
            "",
            "Triangle,0,0,1,1,#000000",
            "Line,0,0,10,0",
            "Line,0,0,10,0,#000000,extra",
            "Line,a,0,10,0,#000000",
            "Line,0,0,10,0,black",
            "Circle,0,0,1,#000000",
            "Capsule,0,0,1,1,2,2",
            "Rectangle,0,0,5,5,#000000",
            "Rectangle,0,0,5,5,#000000,maybe,none",
            "Polygon,#000000,none",
            "Polygon,#000000,none,none,1;2,3",
            "Polygon,#000000,none,none,1;2;3",
            "line,0,0,10,0,#000000",
        ] {
            assert!(deserialize(line).is_none(), "{line:?}");
        }
    }

    #[test]
    fn document_parse_skips_bad_lines_and_keeps_order() {
        let text = "Line,0,0,10,0,#000000\n\ngarbage\nCircle,5,5,8,5,#ff0000\n";
        let parsed = parse_document(text);
        assert_eq!(parsed.skipped_lines, vec![3]);
        assert_eq!(parsed.shapes.len(), 2);
        assert_eq!(parsed.shapes[0].kind(), ShapeKind::Line);
        assert_eq!(parsed.shapes[1].kind(), ShapeKind::Circle);
        assert_eq!(
            write_document(&parsed.shapes),
            "Line,0,0,10,0,#000000\nCircle,5,5,8,5,#ff0000\n"
        );
    }
}
