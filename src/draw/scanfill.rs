//! Active-edge-table scanline polygon fill.

use super::color::Color;
use super::shape::{Interior, Point};
use super::surface::Surface;
use super::texture::Texture;
use std::ops::Range;

/// An edge crossing the current scanline.
#[derive(Debug, Clone, Copy)]
struct ActiveEdge {
    /// Intersection with the current scanline
    x: f64,
    /// Change of `x` per scanline
    inv_slope: f64,
    /// Scanline at which the edge is retired
    y_max: i32,
}

impl ActiveEdge {
    /// Edge from its lower endpoint `low` to its upper endpoint `high`
    /// (`high.y > low.y`), positioned on scanline `y`.
    fn new(low: Point, high: Point, y: i32) -> Self {
        let dy = f64::from(high.y) - f64::from(low.y);
        let dx = f64::from(high.x) - f64::from(low.x);
        let inv_slope = if dy != 0.0 { dx / dy } else { 0.0 };
        Self {
            x: f64::from(low.x) + (f64::from(y) - f64::from(low.y)) * inv_slope,
            inv_slope,
            y_max: high.y,
        }
    }
}

/// Horizontal runs `(y, x_start, x_end)` covered by the polygon, both x inclusive.
///
/// Scanlines run from the lowest vertex y up to, but not including, the
/// highest. Intersections are paired by even/odd parity after rounding.
/// Rings with fewer than three vertices produce nothing.
pub fn spans(vertices: &[Point]) -> Vec<(i32, i32, i32)> {
    spans_in(vertices, i32::MIN..i32::MAX)
}

/// [`spans`] restricted to the scanlines in `rows`.
///
/// Edges that start above the first row are entered already advanced to
/// it, so rows outside the range cost nothing.
pub fn spans_in(vertices: &[Point], rows: Range<i32>) -> Vec<(i32, i32, i32)> {
    let n = vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| vertices[i].y);

    let mut active: Vec<ActiveEdge> = Vec::new();
    let mut result = Vec::new();
    let mut next = 0;
    let mut y = vertices[order[0]].y.max(rows.start);
    let y_end = vertices[order[n - 1]].y.min(rows.end);

    let enter = |active: &mut Vec<ActiveEdge>, i: usize, y: i32| {
        let vertex = vertices[i];
        for neighbor in [vertices[(i + n - 1) % n], vertices[(i + 1) % n]] {
            if neighbor.y > vertex.y && neighbor.y > y {
                active.push(ActiveEdge::new(vertex, neighbor, y));
            }
        }
    };
    while next < n && vertices[order[next]].y < y {
        enter(&mut active, order[next], y);
        next += 1;
    }

    while y < y_end {
        while next < n && vertices[order[next]].y == y {
            enter(&mut active, order[next], y);
            next += 1;
        }

        active.sort_by(|a, b| a.x.total_cmp(&b.x));
        for pair in active.chunks_exact(2) {
            let x1 = pair[0].x.round() as i32;
            let x2 = pair[1].x.round() as i32;
            result.push((y, x1, x2));
        }

        y += 1;
        active.retain(|edge| edge.y_max > y);
        for edge in &mut active {
            edge.x += edge.inv_slope;
        }
    }
    result
}

/// Spans on the surface's rows with x clamped to its columns.
fn surface_spans(surface: &Surface, vertices: &[Point]) -> Vec<(i32, i32, i32)> {
    let width = i32::try_from(surface.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(surface.height()).unwrap_or(i32::MAX);
    spans_in(vertices, 0..height)
        .into_iter()
        .filter_map(|(y, x1, x2)| {
            let (x1, x2) = (x1.max(0), x2.min(width - 1));
            (x1 <= x2).then_some((y, x1, x2))
        })
        .collect()
}

/// Fills the polygon with a solid color.
pub fn fill_solid(surface: &mut Surface, vertices: &[Point], color: Color) {
    for (y, x1, x2) in surface_spans(surface, vertices) {
        for x in x1..=x2 {
            surface.blend_pixel(x, y, color);
        }
    }
}

/// Fills the polygon with a texture tiled from the polygon's bounding-box corner.
pub fn fill_textured(surface: &mut Surface, vertices: &[Point], texture: &Texture) {
    if !texture.is_loaded() {
        return;
    }
    let Some(min_x) = vertices.iter().map(|p| p.x).min() else {
        return;
    };
    let Some(min_y) = vertices.iter().map(|p| p.y).min() else {
        return;
    };

    for (y, x1, x2) in surface_spans(surface, vertices) {
        for x in x1..=x2 {
            let u = i64::from(x) - i64::from(min_x);
            let v = i64::from(y) - i64::from(min_y);
            if let Some(color) = texture.sample(u, v) {
                surface.blend_pixel(x, y, color);
            }
        }
    }
}

/// Paints the interior with whichever source the style selected.
pub fn fill_interior(surface: &mut Surface, vertices: &[Point], interior: Interior<'_>) {
    match interior {
        Interior::Solid(color) => fill_solid(surface, vertices, color),
        Interior::Tiled(texture) => fill_textured(surface, vertices, texture),
    }
}
