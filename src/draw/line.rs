//! Line rasterization: hard-edged Bresenham and antialiased Gupta–Sproull.

use super::color::Color;
use super::shape::{Point, Style};
use super::surface::Surface;
use crate::clip::clip_line;
use std::f64::consts::PI;

/// Radius of the conical filter used to compute antialiasing coverage.
pub const FILTER_RADIUS: f64 = 0.5;

/// Upper bound on perpendicular samples per column (covers thickness up to ~1000px).
const MAX_PERPENDICULAR_SAMPLES: i32 = 1024;

/// Widest stroke either algorithm will paint.
const MAX_THICKNESS: u32 = 2 * MAX_PERPENDICULAR_SAMPLES as u32;

/// Draws the segment with the algorithm the style asks for.
pub fn draw_stroke(surface: &mut Surface, start: Point, end: Point, color: Color, style: &Style) {
    if style.antialiasing {
        draw_line_antialiased(surface, start, end, color, style.thickness);
    } else {
        draw_line(surface, start, end, color, style.thickness);
    }
}

fn is_steep(start: Point, end: Point) -> bool {
    let dx = (i64::from(end.x) - i64::from(start.x)).abs();
    let dy = (i64::from(end.y) - i64::from(start.y)).abs();
    dy > dx
}

/// Part of `start → end` whose stroke can reach the surface.
///
/// The surface rectangle is widened by the stroke's reach on every side and
/// the segment is clipped against it. Segments that already fit come back
/// unchanged, so on-canvas drawing keeps its exact pixels.
fn visible_segment(
    surface: &Surface,
    start: Point,
    end: Point,
    thickness: u32,
) -> Option<(Point, Point)> {
    let margin = (thickness.min(MAX_THICKNESS) / 2 + 2) as i32;
    let right = i32::try_from(surface.width())
        .unwrap_or(i32::MAX)
        .saturating_add(margin);
    let bottom = i32::try_from(surface.height())
        .unwrap_or(i32::MAX)
        .saturating_add(margin);
    let inside = |p: Point| (-margin..=right).contains(&p.x) && (-margin..=bottom).contains(&p.y);
    if inside(start) && inside(end) {
        return Some((start, end));
    }

    let bounds = [
        Point::new(-margin, -margin),
        Point::new(right, -margin),
        Point::new(right, bottom),
        Point::new(-margin, bottom),
    ];
    clip_line(start, end, &bounds).filter(|&(a, b)| inside(a) && inside(b))
}

/// Centerline pixels from `start` to `end` inclusive, in drawing order.
///
/// Consecutive pixels are 8-connected.
pub fn line_pixels(start: Point, end: Point) -> Vec<Point> {
    let dx = (i64::from(end.x) - i64::from(start.x)).abs();
    let dy = (i64::from(end.y) - i64::from(start.y)).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };
    let mut err = dx - dy;

    let mut pixels = Vec::new();
    let (mut x, mut y) = (start.x, start.y);
    loop {
        pixels.push(Point::new(x, y));
        if x == end.x && y == end.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    pixels
}

/// Hard-edged line of the given thickness.
///
/// Every centerline pixel is widened across the minor axis: `(thickness - 1) / 2`
/// pixels each side, plus one on the high side when the thickness is even.
/// Only the part of the segment near the surface is walked.
pub fn draw_line(surface: &mut Surface, start: Point, end: Point, color: Color, thickness: u32) {
    let steep = is_steep(start, end);
    let Some((start, end)) = visible_segment(surface, start, end, thickness) else {
        return;
    };
    let thickness = thickness.clamp(1, MAX_THICKNESS) as i32;
    let half = (thickness - 1) / 2;
    let extra = thickness > 1 && thickness % 2 == 0;

    for Point { x, y } in line_pixels(start, end) {
        let mut plot = |offset: i32| {
            if steep {
                surface.blend_pixel(x + offset, y, color);
            } else {
                surface.blend_pixel(x, y + offset, color);
            }
        };
        for offset in -half..=half {
            plot(offset);
        }
        if extra {
            plot(half + 1);
        }
    }
}

/// Area of a radius-`r` disc lying beyond a half-plane at distance `d`, as a fraction.
pub fn cov(d: f64, r: f64) -> f64 {
    if d >= r {
        return 0.0;
    }
    (d / r).acos() / PI - d / (r * r * PI) * (r * r - d * d).sqrt()
}

/// Fraction of a pixel at perpendicular distance `dist` covered by a stroke
/// of the given thickness, filtered with radius `r`. Always within `[0, 1]`.
pub fn coverage(thickness: f64, dist: f64, r: f64) -> f64 {
    let w = thickness / 2.0;
    let d = dist.abs();
    let value = if w >= r {
        if d >= w {
            cov(d - w, r)
        } else {
            1.0 - cov(w - d, r)
        }
    } else if d <= w {
        1.0 - cov(w - d, r) - cov(w + d, r)
    } else if d <= r - w {
        cov(d - w, r) - cov(d + w, r)
    } else {
        cov(d - w, r)
    };
    value.clamp(0.0, 1.0)
}

/// Antialiased line (Gupta–Sproull).
///
/// Pixels are blended with the color's alpha replaced by the coverage. A
/// vertical line has nothing to smooth and falls back to [`draw_line`].
/// Only the part of the segment near the surface is walked.
pub fn draw_line_antialiased(
    surface: &mut Surface,
    start: Point,
    end: Point,
    color: Color,
    thickness: u32,
) {
    let Some((start, end)) = visible_segment(surface, start, end, thickness) else {
        return;
    };
    if start.x == end.x {
        draw_line(surface, start, end, color, thickness);
        return;
    }
    let (mut x1, mut y1, mut x2, mut y2) = (start.x, start.y, end.x, end.y);

    let steep = is_steep(start, end);
    if steep {
        std::mem::swap(&mut x1, &mut y1);
        std::mem::swap(&mut x2, &mut y2);
    }
    if x1 > x2 {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
    }

    let dx = i64::from(x2) - i64::from(x1);
    let ystep = if y2 >= y1 { 1 } else { -1 };
    let dy = (i64::from(y2) - i64::from(y1)).abs();

    let mut d = 2 * dy - dx;
    let d_e = 2 * dy;
    let d_ne = 2 * (dy - dx);
    let inv_denom = 1.0 / (2.0 * ((dx as f64).powi(2) + (dy as f64).powi(2)).sqrt());
    let two_dx_inv_denom = 2.0 * dx as f64 * inv_denom;
    let thickness = f64::from(thickness.clamp(1, MAX_THICKNESS));

    let mut intensify = |x: i32, y: i32, dist: f64| -> bool {
        let amount = coverage(thickness, dist, FILTER_RADIUS);
        if amount <= 0.0 {
            return false;
        }
        let alpha = (amount * color.a as f64).round() as u8;
        let (px, py) = if steep { (y, x) } else { (x, y) };
        surface.blend_pixel(px, py, color.with_alpha(alpha));
        true
    };

    let (mut x, mut y) = (x1, y1);
    let mut two_v_dx = 0;
    loop {
        let centre = two_v_dx as f64 * inv_denom;
        intensify(x, y, centre);
        for i in 1..MAX_PERPENDICULAR_SAMPLES {
            if !intensify(x, y + i * ystep, i as f64 * two_dx_inv_denom - centre) {
                break;
            }
        }
        for i in 1..MAX_PERPENDICULAR_SAMPLES {
            if !intensify(x, y - i * ystep, i as f64 * two_dx_inv_denom + centre) {
                break;
            }
        }

        if x >= x2 {
            break;
        }
        x += 1;
        if d < 0 {
            two_v_dx = d + dx;
            d += d_e;
        } else {
            two_v_dx = d - dx;
            d += d_ne;
            y += ystep;
        }
    }
}
