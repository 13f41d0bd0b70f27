//! Shape definitions and their geometric capabilities.
//!
//! Every variant owns its control points plus a shared [`Style`]. The control
//! points are what selection, vertex dragging and clipping see; they are not
//! necessarily the rendered outline (a circle exposes its center and the point
//! on its rim, not the rim itself).

use super::color::{BLACK, Color};
use super::texture::Texture;
use crate::util::{self, Rect};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Integer pixel coordinate. `+` and `-` saturate at the `i32` range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// Appearance shared by every shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Outline color
    pub border_color: Color,
    /// Solid interior color; `None` means no fill (not a transparent color)
    pub fill_color: Option<Color>,
    /// Tiled interior texture, used when no fill color is set
    pub texture: Option<Texture>,
    /// Outline width in pixels, always at least 1
    pub thickness: u32,
    /// Draw outlines with the antialiased line algorithm
    pub antialiasing: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            border_color: BLACK,
            fill_color: None,
            texture: None,
            thickness: 1,
            antialiasing: false,
        }
    }
}

impl Style {
    /// Interior paint source, with the fill color taking precedence over the texture.
    pub fn interior(&self) -> Option<Interior<'_>> {
        if let Some(color) = self.fill_color {
            return Some(Interior::Solid(color));
        }
        self.texture
            .as_ref()
            .filter(|texture| texture.is_loaded())
            .map(Interior::Tiled)
    }
}

/// How a closed shape's interior is painted.
#[derive(Clone, Copy, Debug)]
pub enum Interior<'a> {
    Solid(Color),
    Tiled(&'a Texture),
}

/// Variant tag, also used as the first token of the serialized form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Circle,
    Capsule,
    Polygon,
    Rectangle,
}

impl ShapeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Circle => "Circle",
            ShapeKind::Capsule => "Capsule",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Rectangle => "Rectangle",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Line" => Some(ShapeKind::Line),
            "Circle" => Some(ShapeKind::Circle),
            "Capsule" => Some(ShapeKind::Capsule),
            "Polygon" => Some(ShapeKind::Polygon),
            "Rectangle" => Some(ShapeKind::Rectangle),
            _ => None,
        }
    }
}

/// Straight segment between two points.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub style: Style,
}

/// Circle given by its center and any point on the rim.
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub point_on_circle: Point,
    pub style: Style,
}

impl Circle {
    /// Radius in whole pixels (truncated Euclidean distance).
    pub fn radius(&self) -> i32 {
        util::distance(self.center, self.point_on_circle) as i32
    }
}

/// Stadium: two end circles of equal radius joined by tangent lines.
#[derive(Clone, Debug, PartialEq)]
pub struct Capsule {
    pub center1: Point,
    pub center2: Point,
    /// Point whose distance from `center2` defines the radius
    pub radius_point: Point,
    pub style: Style,
}

impl Capsule {
    /// Radius in whole pixels, derived from `radius_point` every time.
    pub fn radius(&self) -> i32 {
        util::distance(self.center2, self.radius_point) as i32
    }
}

/// Closed ring of vertices; edge `i` joins vertex `i` to vertex `(i + 1) % n`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
    /// Still being built by a tool; markers for midpoints are not drawn
    pub preview: bool,
    pub style: Style,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    pub fn add_vertex(&mut self, vertex: Point) {
        self.vertices.push(vertex);
    }

    /// Moves the most recently added vertex (rubber-banding while building).
    pub fn update_last_vertex(&mut self, vertex: Point) {
        if let Some(last) = self.vertices.last_mut() {
            *last = vertex;
        }
    }

    pub fn pop_last(&mut self) -> Option<Point> {
        self.vertices.pop()
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.preview = preview;
    }

    pub fn first_vertex(&self) -> Option<Point> {
        self.vertices.first().copied()
    }

    /// Integer mean of all vertices, used as the whole-polygon drag handle.
    pub fn centroid(&self) -> Option<Point> {
        if self.vertices.is_empty() {
            return None;
        }
        let n = self.vertices.len() as i64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
        Some(Point::new((sx / n) as i32, (sy / n) as i32))
    }

    /// Returns true when the ring turns both ways.
    ///
    /// Rings with fewer than four vertices are always reported convex.
    pub fn is_concave(&self) -> bool {
        let n = self.vertices.len();
        if n < 4 {
            return false;
        }

        let mut positive = false;
        let mut negative = false;
        for i in 0..n {
            let cross = util::turn(
                self.vertices[i],
                self.vertices[(i + 1) % n],
                self.vertices[(i + 2) % n],
            );
            if cross > 0 {
                positive = true;
            } else if cross < 0 {
                negative = true;
            }
            if positive && negative {
                return true;
            }
        }
        false
    }
}

/// Axis-aligned rectangle stored as two opposite corners.
#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    pub corner1: Point,
    pub corner2: Point,
    pub style: Style,
}

impl Rectangle {
    pub fn top_left(&self) -> Point {
        Point::new(
            self.corner1.x.min(self.corner2.x),
            self.corner1.y.min(self.corner2.y),
        )
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.corner1.x.max(self.corner2.x),
            self.corner1.y.max(self.corner2.y),
        )
    }

    /// Corners in ring order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let tl = self.top_left();
        let br = self.bottom_right();
        [tl, Point::new(br.x, tl.y), br, Point::new(tl.x, br.y)]
    }

    /// Rewrites the stored corners as (min, max) without changing the box.
    fn normalize(&mut self) {
        let tl = self.top_left();
        let br = self.bottom_right();
        self.corner1 = tl;
        self.corner2 = br;
    }

    fn move_corner(&mut self, index: usize, delta: Point) -> bool {
        self.normalize();
        match index {
            0 => self.corner1 = self.corner1 + delta,
            1 => {
                self.corner2.x += delta.x;
                self.corner1.y += delta.y;
            }
            2 => self.corner2 = self.corner2 + delta,
            3 => {
                self.corner1.x += delta.x;
                self.corner2.y += delta.y;
            }
            _ => return false,
        }
        true
    }

    fn move_side(&mut self, index: usize, delta: Point) -> bool {
        self.normalize();
        match index {
            0 => self.corner1.y += delta.y,
            1 => self.corner2.x += delta.x,
            2 => self.corner2.y += delta.y,
            3 => self.corner1.x += delta.x,
            _ => return false,
        }
        true
    }
}

/// A drawable figure.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line(Line),
    Circle(Circle),
    Capsule(Capsule),
    Polygon(Polygon),
    Rectangle(Rectangle),
}

impl Shape {
    pub fn line(start: Point, end: Point) -> Self {
        Shape::Line(Line {
            start,
            end,
            style: Style::default(),
        })
    }

    pub fn circle(center: Point, point_on_circle: Point) -> Self {
        Shape::Circle(Circle {
            center,
            point_on_circle,
            style: Style::default(),
        })
    }

    pub fn capsule(center1: Point, center2: Point, radius_point: Point) -> Self {
        Shape::Capsule(Capsule {
            center1,
            center2,
            radius_point,
            style: Style::default(),
        })
    }

    pub fn polygon(vertices: Vec<Point>) -> Self {
        Shape::Polygon(Polygon::new(vertices))
    }

    pub fn rectangle(corner1: Point, corner2: Point) -> Self {
        Shape::Rectangle(Rectangle {
            corner1,
            corner2,
            style: Style::default(),
        })
    }

    /// Replaces the style, builder-style.
    pub fn with_style(mut self, style: Style) -> Self {
        *self.style_mut() = style;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Line(_) => ShapeKind::Line,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Capsule(_) => ShapeKind::Capsule,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Shape::Line(Line { style, .. })
            | Shape::Circle(Circle { style, .. })
            | Shape::Capsule(Capsule { style, .. })
            | Shape::Polygon(Polygon { style, .. })
            | Shape::Rectangle(Rectangle { style, .. }) => style,
        }
    }

    pub fn style_mut(&mut self) -> &mut Style {
        match self {
            Shape::Line(Line { style, .. })
            | Shape::Circle(Circle { style, .. })
            | Shape::Capsule(Capsule { style, .. })
            | Shape::Polygon(Polygon { style, .. })
            | Shape::Rectangle(Rectangle { style, .. }) => style,
        }
    }

    /// Control points in index order (the indices `move_vertex` accepts).
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            Shape::Line(line) => vec![line.start, line.end],
            Shape::Circle(circle) => vec![circle.center, circle.point_on_circle],
            Shape::Capsule(capsule) => {
                vec![capsule.center1, capsule.center2, capsule.radius_point]
            }
            Shape::Polygon(polygon) => polygon.vertices.clone(),
            Shape::Rectangle(rect) => rect.corners().to_vec(),
        }
    }

    /// Moves one control point by `delta`. Returns false for an invalid index.
    ///
    /// Dragging a circle's center or a capsule's second center carries the
    /// radius point along so the radius is preserved.
    pub fn move_vertex(&mut self, index: usize, delta: Point) -> bool {
        match self {
            Shape::Line(line) => match index {
                0 => line.start = line.start + delta,
                1 => line.end = line.end + delta,
                _ => return false,
            },
            Shape::Circle(circle) => match index {
                0 => {
                    circle.center = circle.center + delta;
                    circle.point_on_circle = circle.point_on_circle + delta;
                }
                1 => circle.point_on_circle = circle.point_on_circle + delta,
                _ => return false,
            },
            Shape::Capsule(capsule) => match index {
                0 => capsule.center1 = capsule.center1 + delta,
                1 => {
                    capsule.center2 = capsule.center2 + delta;
                    capsule.radius_point = capsule.radius_point + delta;
                }
                2 => capsule.radius_point = capsule.radius_point + delta,
                _ => return false,
            },
            Shape::Polygon(polygon) => match polygon.vertices.get_mut(index) {
                Some(vertex) => *vertex = *vertex + delta,
                None => return false,
            },
            Shape::Rectangle(rect) => return rect.move_corner(index, delta),
        }
        true
    }

    /// Midpoints of the shape's editable edges.
    pub fn edge_midpoints(&self) -> Vec<Point> {
        self.outline_edges()
            .into_iter()
            .map(|(a, b)| util::midpoint(a, b))
            .collect()
    }

    /// Drags edge `index` by `delta`. Returns false when the shape has no such edge.
    pub fn move_edge(&mut self, index: usize, delta: Point) -> bool {
        match self {
            Shape::Line(line) if index == 0 => {
                line.start = line.start + delta;
                line.end = line.end + delta;
                true
            }
            Shape::Polygon(polygon) if polygon.vertices.len() >= 2 => {
                let n = polygon.vertices.len();
                if index >= n {
                    return false;
                }
                polygon.vertices[index] = polygon.vertices[index] + delta;
                let next = (index + 1) % n;
                polygon.vertices[next] = polygon.vertices[next] + delta;
                true
            }
            Shape::Rectangle(rect) => rect.move_side(index, delta),
            _ => false,
        }
    }

    /// Moves the whole shape by `delta`.
    pub fn translate(&mut self, delta: Point) {
        match self {
            Shape::Line(line) => {
                line.start = line.start + delta;
                line.end = line.end + delta;
            }
            Shape::Circle(circle) => {
                circle.center = circle.center + delta;
                circle.point_on_circle = circle.point_on_circle + delta;
            }
            Shape::Capsule(capsule) => {
                capsule.center1 = capsule.center1 + delta;
                capsule.center2 = capsule.center2 + delta;
                capsule.radius_point = capsule.radius_point + delta;
            }
            Shape::Polygon(polygon) => {
                for vertex in &mut polygon.vertices {
                    *vertex = *vertex + delta;
                }
            }
            Shape::Rectangle(rect) => {
                rect.corner1 = rect.corner1 + delta;
                rect.corner2 = rect.corner2 + delta;
            }
        }
    }

    /// Whether the shape may NOT serve as a convex clip target.
    ///
    /// Only polygons and rectangles describe a convex region; every other
    /// variant reports `true`.
    pub fn is_concave(&self) -> bool {
        match self {
            Shape::Polygon(polygon) => polygon.is_concave(),
            Shape::Rectangle(_) => false,
            Shape::Line(_) | Shape::Circle(_) | Shape::Capsule(_) => true,
        }
    }

    /// Straight edges of the rendered outline, in ring order.
    ///
    /// Circles and capsules have no straight-edge outline and return nothing.
    pub fn outline_edges(&self) -> Vec<(Point, Point)> {
        match self {
            Shape::Line(line) => vec![(line.start, line.end)],
            Shape::Polygon(polygon) => ring_edges(&polygon.vertices),
            Shape::Rectangle(rect) => ring_edges(&rect.corners()),
            Shape::Circle(_) | Shape::Capsule(_) => Vec::new(),
        }
    }

    /// Index of the first control point within `radius` of `point`.
    pub fn hit_vertex(&self, point: Point, radius: f64) -> Option<usize> {
        self.vertices()
            .into_iter()
            .position(|vertex| util::distance(point, vertex) <= radius)
    }

    /// Pixel bounds of the rendered shape including its outline width.
    pub fn bounding_box(&self) -> Option<Rect> {
        let padding = (self.style().thickness as i32 + 1) / 2 + 1;
        match self {
            Shape::Circle(circle) => {
                let r = circle.radius();
                Rect::covering(
                    &[
                        circle.center - Point::new(r, r),
                        circle.center + Point::new(r, r),
                    ],
                    padding,
                )
            }
            Shape::Capsule(capsule) => {
                let r = capsule.radius();
                let reach = Point::new(r, r);
                Rect::covering(
                    &[
                        capsule.center1 - reach,
                        capsule.center1 + reach,
                        capsule.center2 - reach,
                        capsule.center2 + reach,
                    ],
                    padding,
                )
            }
            _ => Rect::covering(&self.vertices(), padding),
        }
    }
}

fn ring_edges(ring: &[Point]) -> Vec<(Point, Point)> {
    let n = ring.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n).map(|i| (ring[i], ring[(i + 1) % n])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn circle_exposes_control_points_not_rim() {
        let shape = Shape::circle(p(10, 10), p(13, 14));
        assert_eq!(shape.vertices(), vec![p(10, 10), p(13, 14)]);
        let Shape::Circle(circle) = &shape else {
            unreachable!()
        };
        assert_eq!(circle.radius(), 5);
        assert!(shape.edge_midpoints().is_empty());
    }

    #[test]
    fn moving_circle_center_keeps_radius() {
        let mut shape = Shape::circle(p(0, 0), p(3, 4));
        assert!(shape.move_vertex(0, p(10, 10)));
        assert_eq!(shape.vertices(), vec![p(10, 10), p(13, 14)]);
        assert!(!shape.move_vertex(2, p(1, 1)));
    }

    #[test]
    fn capsule_radius_follows_radius_point() {
        let mut shape = Shape::capsule(p(0, 0), p(20, 0), p(20, 6));
        let radius = |s: &Shape| match s {
            Shape::Capsule(c) => c.radius(),
            _ => unreachable!(),
        };
        assert_eq!(radius(&shape), 6);
        shape.move_vertex(1, p(5, 5));
        assert_eq!(radius(&shape), 6);
        shape.move_vertex(2, p(0, 2));
        assert_eq!(radius(&shape), 8);
    }

    #[test]
    fn rectangle_corners_are_normalized() {
        let shape = Shape::rectangle(p(10, 8), p(2, 3));
        assert_eq!(
            shape.vertices(),
            vec![p(2, 3), p(10, 3), p(10, 8), p(2, 8)]
        );
        assert!(!shape.is_concave());
    }

    #[test]
    fn rectangle_vertex_drag_clamps_to_box() {
        let mut shape = Shape::rectangle(p(0, 0), p(10, 10));
        assert!(shape.move_vertex(1, p(5, -2)));
        assert_eq!(
            shape.vertices(),
            vec![p(0, -2), p(15, -2), p(15, 10), p(0, 10)]
        );

        // Dragging the top-left past the right edge just yields another box.
        shape.move_vertex(0, p(20, 0));
        assert_eq!(shape.vertices()[0], p(15, -2));
        assert_eq!(shape.vertices()[2], p(20, 10));
    }

    #[test]
    fn rectangle_edge_drag_moves_one_side() {
        let mut shape = Shape::rectangle(p(0, 0), p(10, 10));
        assert!(shape.move_edge(1, p(4, 99)));
        assert_eq!(shape.vertices()[2], p(14, 10));
        assert!(shape.move_edge(0, p(99, -3)));
        assert_eq!(shape.vertices()[0], p(0, -3));
        assert!(!shape.move_edge(4, p(1, 1)));
    }

    #[test]
    fn polygon_edge_drag_moves_both_endpoints() {
        let mut shape = Shape::polygon(vec![p(0, 0), p(10, 0), p(5, 8)]);
        assert!(shape.move_edge(2, p(1, 1)));
        assert_eq!(shape.vertices(), vec![p(1, 1), p(10, 0), p(6, 9)]);
    }

    #[test]
    fn polygon_midpoints_cover_every_ring_edge() {
        let shape = Shape::polygon(vec![p(0, 0), p(10, 0), p(10, 10)]);
        assert_eq!(shape.edge_midpoints(), vec![p(5, 0), p(10, 5), p(5, 5)]);
        assert!(Shape::polygon(vec![p(1, 1)]).edge_midpoints().is_empty());
    }

    #[test]
    fn polygon_concavity_uses_turn_directions() {
        let square = Polygon::new(vec![p(0, 0), p(10, 0), p(10, 10), p(0, 10)]);
        assert!(!square.is_concave());

        let arrow = Polygon::new(vec![p(0, 0), p(10, 5), p(0, 10), p(4, 5)]);
        assert!(arrow.is_concave());

        let triangle = Polygon::new(vec![p(0, 0), p(10, 0), p(5, 5)]);
        assert!(!triangle.is_concave());
    }

    #[test]
    fn non_polygonal_shapes_cannot_clip() {
        assert!(Shape::line(p(0, 0), p(1, 1)).is_concave());
        assert!(Shape::circle(p(0, 0), p(1, 1)).is_concave());
        assert!(Shape::capsule(p(0, 0), p(5, 0), p(5, 2)).is_concave());
    }

    #[test]
    fn polygon_building_operations() {
        let mut polygon = Polygon::default();
        assert!(polygon.centroid().is_none());
        polygon.add_vertex(p(0, 0));
        polygon.add_vertex(p(6, 0));
        polygon.update_last_vertex(p(6, 6));
        polygon.add_vertex(p(0, 6));
        assert_eq!(polygon.first_vertex(), Some(p(0, 0)));
        assert_eq!(polygon.centroid(), Some(p(2, 4)));
        assert_eq!(polygon.pop_last(), Some(p(0, 6)));
        assert_eq!(polygon.vertices, vec![p(0, 0), p(6, 6)]);
    }

    #[test]
    fn hit_vertex_uses_inclusive_radius() {
        let shape = Shape::line(p(0, 0), p(20, 0));
        assert_eq!(shape.hit_vertex(p(20, 3), 3.0), Some(1));
        assert_eq!(shape.hit_vertex(p(10, 0), 3.0), None);
    }

    #[test]
    fn translate_moves_all_control_points() {
        let mut shape = Shape::capsule(p(0, 0), p(10, 0), p(10, 3));
        shape.translate(p(-2, 4));
        assert_eq!(shape.vertices(), vec![p(-2, 4), p(8, 4), p(8, 7)]);
    }

    #[test]
    fn interior_prefers_fill_color_over_texture() {
        let mut style = Style::default();
        assert!(style.interior().is_none());

        let tile = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 255]));
        style.texture = Some(Texture::from_image("t.png", tile));
        assert!(matches!(style.interior(), Some(Interior::Tiled(_))));

        style.fill_color = Some(BLACK);
        assert!(matches!(style.interior(), Some(Interior::Solid(BLACK))));
    }

    #[test]
    fn bounding_box_pads_for_thickness() {
        let mut style = Style::default();
        style.thickness = 4;
        let shape = Shape::line(p(10, 10), p(20, 10)).with_style(style);
        let rect = shape.bounding_box().unwrap();
        assert!(rect.contains(10, 7));
        assert!(rect.contains(20, 13));
    }
}
