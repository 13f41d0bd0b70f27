//! Cyrus–Beck parametric line clipping against a convex polygon.

use crate::draw::Point;
use crate::util;

/// `b - a` per axis, computed without `i32` overflow.
fn delta(a: Point, b: Point) -> (f64, f64) {
    (
        f64::from(b.x) - f64::from(a.x),
        f64::from(b.y) - f64::from(a.y),
    )
}

/// Returns true when the ring winds clockwise on screen (y grows downward).
///
/// Rings with fewer than three vertices have no orientation and report `true`.
pub fn is_clockwise(ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return true;
    }
    util::signed_area2(ring) < 0
}

/// Entering and leaving parameters `(t_enter, t_leave)` of `p1 → p2` against
/// the convex ring `clip`, or `None` when nothing of the segment is visible.
///
/// The visible part is `p1 + t·(p2 − p1)` for `t` in `[t_enter, t_leave]`.
pub fn clip_parameters(p1: Point, p2: Point, clip: &[Point]) -> Option<(f64, f64)> {
    let direction = delta(p1, p2);
    let flip = if is_clockwise(clip) { -1.0 } else { 1.0 };

    let mut t_enter = 0.0f64;
    let mut t_leave = 1.0f64;
    let n = clip.len();
    for i in 0..n {
        let edge_start = clip[i];
        let edge_end = clip[(i + 1) % n];
        let edge = delta(edge_start, edge_end);

        let mut normal = (edge.1 * flip, -edge.0 * flip);
        let length = normal.0.hypot(normal.1);
        if length > 0.0 {
            normal = (normal.0 / length, normal.1 / length);
        }

        let w = delta(edge_start, p1);
        let n_dot_d = normal.0 * direction.0 + normal.1 * direction.1;
        let n_dot_w = normal.0 * w.0 + normal.1 * w.1;

        if n_dot_d == 0.0 {
            if n_dot_w > 0.0 {
                return None;
            }
            continue;
        }

        let t = -n_dot_w / n_dot_d;
        if n_dot_d < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_leave = t_leave.min(t);
        }
    }

    (t_enter <= t_leave).then_some((t_enter, t_leave))
}

/// Clips `p1 → p2` to the convex ring `clip`.
///
/// Returns the visible sub-segment with endpoints rounded to the nearest
/// pixel and kept within the `i32` range, or `None` when the segment lies
/// entirely outside. A zero-length segment is returned unchanged.
pub fn clip_line(p1: Point, p2: Point, clip: &[Point]) -> Option<(Point, Point)> {
    if p1 == p2 {
        return Some((p1, p2));
    }

    let (t_enter, t_leave) = clip_parameters(p1, p2, clip)?;
    let (dx, dy) = delta(p1, p2);
    let at = |t: f64| {
        let round = |v: f64| v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;
        Point::new(
            round(f64::from(p1.x) + t * dx),
            round(f64::from(p1.y) + t * dy),
        )
    };
    Some((at(t_enter), at(t_leave)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn square() -> Vec<Point> {
        vec![p(0, 0), p(10, 0), p(10, 10), p(0, 10)]
    }

    #[test]
    fn crossing_segment_clips_to_square_sides() {
        assert_eq!(
            clip_line(p(-5, 5), p(15, 5), &square()),
            Some((p(0, 5), p(10, 5)))
        );
    }

    #[test]
    fn orientation_does_not_change_the_result() {
        let mut clockwise = square();
        clockwise.reverse();
        assert!(is_clockwise(&clockwise));
        assert!(!is_clockwise(&square()));
        assert_eq!(
            clip_line(p(-5, 5), p(15, 5), &clockwise),
            Some((p(0, 5), p(10, 5)))
        );
    }

    #[test]
    fn inside_segment_is_unchanged() {
        assert_eq!(clip_parameters(p(2, 2), p(8, 7), &square()), Some((0.0, 1.0)));
        assert_eq!(clip_line(p(2, 2), p(8, 7), &square()), Some((p(2, 2), p(8, 7))));
    }

    #[test]
    fn outside_segment_is_rejected() {
        assert!(clip_line(p(-10, -5), p(-2, 20), &square()).is_none());
        assert!(clip_line(p(20, 0), p(30, 10), &square()).is_none());
    }

    #[test]
    fn parallel_segment_outside_an_edge_is_rejected() {
        assert!(clip_line(p(-5, -3), p(15, -3), &square()).is_none());
    }

    #[test]
    fn crossing_one_edge_moves_one_endpoint() {
        assert_eq!(clip_line(p(5, 5), p(5, 20), &square()), Some((p(5, 5), p(5, 10))));
        assert_eq!(clip_line(p(-4, 3), p(6, 3), &square()), Some((p(0, 3), p(6, 3))));
    }

    #[test]
    fn zero_length_segment_clips_to_itself() {
        assert_eq!(clip_line(p(50, 50), p(50, 50), &square()), Some((p(50, 50), p(50, 50))));
    }

    #[test]
    fn clips_against_triangle() {
        let triangle = [p(0, 0), p(10, 0), p(0, 10)];
        let (a, b) = clip_line(p(-5, 2), p(20, 2), &triangle).unwrap();
        assert_eq!(a, p(0, 2));
        assert_eq!(b, p(8, 2));
    }

    #[test]
    fn extreme_coordinates_clip_without_overflow() {
        let far = clip_line(p(-2_000_000_000, 5), p(2_000_000_000, 5), &square());
        assert_eq!(far, Some((p(0, 5), p(10, 5))));

        let corners = clip_line(p(i32::MIN, i32::MIN), p(i32::MAX, i32::MAX), &square());
        assert_eq!(corners, Some((p(0, 0), p(10, 10))));
        assert!(clip_line(p(i32::MIN, 0), p(i32::MIN, i32::MAX), &square()).is_none());
    }
}
