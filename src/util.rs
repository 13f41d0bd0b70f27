//! Geometry helpers shared by the rasterizer, the clipping engine and the frame.
//!
//! This module provides:
//! - [`Rect`], an axis-aligned integer rectangle used for shape bounds
//! - Small vector helpers over integer points (distance, midpoint, cross/dot products)

use crate::draw::Point;

// ============================================================================
// Point Arithmetic
// ============================================================================

/// Euclidean distance between two integer points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = f64::from(b.x) - f64::from(a.x);
    let dy = f64::from(b.y) - f64::from(a.y);
    dx.hypot(dy)
}

/// Integer midpoint of a segment, truncating toward zero like integer division.
pub fn midpoint(a: Point, b: Point) -> Point {
    let half = |p: i32, q: i32| ((i64::from(p) + i64::from(q)) / 2) as i32;
    Point::new(half(a.x, b.x), half(a.y, b.y))
}

/// Z component of the cross product of `(b - a)` and `(c - b)`.
///
/// Positive and negative results indicate opposite turn directions at `b`;
/// zero means the three points are collinear.
pub fn turn(a: Point, b: Point, c: Point) -> i128 {
    let dx1 = i128::from(b.x) - i128::from(a.x);
    let dy1 = i128::from(b.y) - i128::from(a.y);
    let dx2 = i128::from(c.x) - i128::from(b.x);
    let dy2 = i128::from(c.y) - i128::from(b.y);
    dx1 * dy2 - dy1 * dx2
}

/// Twice the signed area of a closed polygon ring (shoelace formula).
///
/// In y-down pixel space a negative value means the ring runs clockwise.
pub fn signed_area2(ring: &[Point]) -> i128 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let current = ring[i];
            let next = ring[(i + 1) % n];
            i128::from(current.x) * i128::from(next.y) - i128::from(next.x) * i128::from(current.y)
        })
        .sum()
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned rectangle with exclusive right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    ///
    /// Extents wider than `i32::MAX` are narrowed from the max side.
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        let extent = |min: i32, max: i32| {
            (i64::from(max) - i64::from(min)).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        Self::new(min_x, min_y, extent(min_x, max_x), extent(min_y, max_y))
    }

    /// Smallest rectangle covering every point, padded by `padding` on each side.
    ///
    /// Degenerate extents are widened to one pixel so a single point still has bounds.
    pub fn covering(points: &[Point], padding: i32) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::from_min_max(
            min_x.saturating_sub(padding),
            min_y.saturating_sub(padding),
            max_x.saturating_add(padding).saturating_add(1),
            max_y.saturating_add(padding).saturating_add(1),
        )
    }

    /// Returns true if the point lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && i64::from(x) < i64::from(self.x) + i64::from(self.width)
            && i64::from(y) < i64::from(self.y) + i64::from(self.height)
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_midpoint() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!((distance(a, b) - 5.0).abs() < f64::EPSILON);
        assert_eq!(midpoint(a, b), Point::new(1, 2));
    }

    #[test]
    fn signed_area_sign_tracks_orientation() {
        let ccw_on_screen = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(signed_area2(&ccw_on_screen), 200);

        let mut reversed = ccw_on_screen;
        reversed.reverse();
        assert_eq!(signed_area2(&reversed), -200);
    }

    #[test]
    fn covering_rect_includes_last_pixel() {
        let rect = Rect::covering(&[Point::new(2, 3), Point::new(5, 3)], 0).unwrap();
        assert_eq!(rect, Rect::new(2, 3, 4, 1).unwrap());
        assert!(rect.contains(5, 3));
        assert!(!rect.contains(6, 3));
    }

    #[test]
    fn helpers_survive_extreme_coordinates() {
        let far_left = Point::new(-2_000_000_000, 5);
        let far_right = Point::new(2_000_000_000, 5);
        assert!((distance(far_left, far_right) - 4e9).abs() < 1.0);
        assert_eq!(midpoint(far_right, far_right), far_right);
        assert_eq!(turn(far_left, far_right, Point::new(-2_000_000_000, -5)), -40_000_000_000);

        let rect = Rect::covering(&[far_left, far_right], 3).unwrap();
        assert_eq!(rect.width, i32::MAX);
        assert!(rect.contains(0, 5));
    }

    #[test]
    fn covering_rect_of_nothing_is_none() {
        assert!(Rect::covering(&[], 2).is_none());
    }
}
