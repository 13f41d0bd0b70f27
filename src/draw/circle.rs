//! Midpoint circle rasterization and the capsule built on top of it.

use super::color::Color;
use super::line::draw_stroke;
use super::shape::{Capsule, Circle, Point, Style};
use super::surface::Surface;
use crate::util::Rect;
use std::collections::BTreeSet;

/// Thickest outline block drawn around each sample.
const MAX_BLOCK_SIDE: u32 = 1024;

/// One octant of a circle of radius `radius` centered on the origin.
///
/// Each sample `(x, y)` satisfies `0 <= x <= y`; mirroring it through the
/// eight symmetries yields the full outline.
pub fn octant(radius: i32) -> Vec<(i32, i32)> {
    octant_span(i64::from(radius.max(0)), 0, i64::MAX)
        .into_iter()
        .map(|(x, y)| (x as i32, y as i32))
        .collect()
}

/// Largest `y` with `y * (y - 1) < radius² - x²`: the row the midpoint walk
/// holds at column `x` everywhere except the octant's closing column.
fn row_at(radius: i64, x: i64) -> i64 {
    let k = radius * radius - x * x;
    let mut y = ((1.0 + (1.0 + 4.0 * k as f64).max(0.0).sqrt()) / 2.0) as i64;
    while y > 0 && y * (y - 1) >= k {
        y -= 1;
    }
    while (y + 1) * y < k {
        y += 1;
    }
    y
}

/// Samples of the octant for columns `first..=last`.
///
/// The decision variable is seeded at `first`, so the walk costs at most
/// `last - first` steps whatever the radius.
fn octant_span(radius: i64, first: i64, last: i64) -> Vec<(i64, i64)> {
    let mut samples = Vec::new();
    let mut y = row_at(radius, first);
    if first > 0 {
        let previous = row_at(radius, first - 1);
        if previous <= first - 1 {
            return samples;
        }
        // The closing step may drop below `row_at` but never by more than one row.
        y = y.max(previous - 1);
    }

    let mut x = first;
    let mut d_e = 2 * x + 3;
    let mut d_se = 2 * x - 2 * y + 5;
    let mut d = (x + 1) * (x + 1) + y * y - y - radius * radius;

    samples.push((x, y));
    while y > x && x < last {
        if d < 0 {
            d += d_e;
            d_e += 2;
            d_se += 2;
        } else {
            d += d_se;
            d_e += 2;
            d_se += 4;
            y -= 1;
        }
        x += 1;
        samples.push((x, y));
    }
    samples
}

fn symmetric(x: i64, y: i64) -> [(i64, i64); 8] {
    [
        (x, y),
        (-x, y),
        (x, -y),
        (-x, -y),
        (y, x),
        (-y, x),
        (y, -x),
        (-y, -x),
    ]
}

/// Inclusive `(low, high)` offsets of a `thickness × thickness` block around a sample.
fn block_extent(thickness: u32) -> (i64, i64) {
    let thickness = i64::from(thickness.clamp(1, MAX_BLOCK_SIDE));
    let low = -(thickness - 1) / 2;
    (low, low + thickness - 1)
}

/// Offsets of a `thickness × thickness` block around a sample.
fn block_offsets(thickness: u32) -> impl Iterator<Item = (i64, i64)> + Clone {
    let (low, high) = block_extent(thickness);
    (low..=high).flat_map(move |dx| (low..=high).map(move |dy| (dx, dy)))
}

/// Absolute values taken by the integers of `lo..=hi`, as an inclusive range.
fn magnitudes(lo: i64, hi: i64) -> Option<(i64, i64)> {
    if hi < lo {
        None
    } else if lo > 0 {
        Some((lo, hi))
    } else if hi < 0 {
        Some((-hi, -lo))
    } else {
        Some((0, hi.max(-lo)))
    }
}

/// Octant columns whose mirrored blocks can land inside `bounds`.
///
/// A column is used as a horizontal offset by four symmetries and as a
/// vertical one by the other four, so it only matters when its magnitude
/// reaches `bounds` along one of the axes from one of the centers.
fn columns_reaching(bounds: Rect, centers: &[Point], thickness: u32) -> Vec<(i64, i64)> {
    let (low, high) = block_extent(thickness);
    let mut windows = Vec::new();
    for center in centers {
        for (origin, start, extent) in [
            (center.x, bounds.x, bounds.width),
            (center.y, bounds.y, bounds.height),
        ] {
            let near = i64::from(start) - i64::from(origin);
            let far = near + i64::from(extent) - 1;
            windows.extend(magnitudes(near - high, far - low));
        }
    }
    windows
}

/// Outline pixels of the circle(s) sharing one octant walk.
///
/// `owner` picks the center each mirrored sample is attached to. With
/// `bounds`, only columns that can reach it are walked and only pixels
/// inside it are kept.
fn outline(
    radius: i32,
    thickness: u32,
    centers: &[Point],
    bounds: Option<Rect>,
    owner: impl Fn(i64, i64) -> Point,
) -> BTreeSet<(i32, i32)> {
    let radius = i64::from(radius.max(0));
    let windows = match bounds {
        Some(bounds) => columns_reaching(bounds, centers, thickness),
        None => vec![(0, i64::MAX)],
    };

    let mut pixels = BTreeSet::new();
    for (first, last) in windows {
        for (x, y) in octant_span(radius, first, last) {
            for (sx, sy) in symmetric(x, y) {
                let center = owner(sx, sy);
                for (bx, by) in block_offsets(thickness) {
                    let px = i32::try_from(i64::from(center.x) + sx + bx);
                    let py = i32::try_from(i64::from(center.y) + sy + by);
                    let (Ok(px), Ok(py)) = (px, py) else {
                        continue;
                    };
                    if bounds.map_or(true, |bounds| bounds.contains(px, py)) {
                        pixels.insert((px, py));
                    }
                }
            }
        }
    }
    pixels
}

fn surface_bounds(surface: &Surface) -> Option<Rect> {
    Rect::new(
        0,
        0,
        i32::try_from(surface.width()).unwrap_or(i32::MAX),
        i32::try_from(surface.height()).unwrap_or(i32::MAX),
    )
}

fn plot_all(surface: &mut Surface, pixels: BTreeSet<(i32, i32)>, color: Color) {
    for (x, y) in pixels {
        surface.blend_pixel(x, y, color);
    }
}

/// Pixels of a circle outline of the given radius and border thickness.
pub fn circle_pixels(center: Point, radius: i32, thickness: u32) -> BTreeSet<(i32, i32)> {
    outline(radius, thickness, &[center], None, |_, _| center)
}

/// Draws a circle outline. Each pixel is blended once even where blocks overlap.
///
/// Only the arcs that can reach the surface are walked.
pub fn draw_circle(surface: &mut Surface, circle: &Circle) {
    let center = circle.center;
    let pixels = outline(
        circle.radius(),
        circle.style.thickness,
        &[center],
        surface_bounds(surface),
        |_, _| center,
    );
    plot_all(surface, pixels, circle.style.border_color);
}

fn cap_pixels(capsule: &Capsule, bounds: Option<Rect>) -> BTreeSet<(i32, i32)> {
    let c1 = capsule.center1;
    let c2 = capsule.center2;
    let axis = (
        i128::from(c2.x) - i128::from(c1.x),
        i128::from(c2.y) - i128::from(c1.y),
    );

    let owner = |sx: i64, sy: i64| -> Point {
        let dot = i128::from(sx) * axis.0 + i128::from(sy) * axis.1;
        if dot > 0 { c2 } else { c1 }
    };
    outline(
        capsule.radius(),
        capsule.style.thickness,
        &[c1, c2],
        bounds,
        owner,
    )
}

/// Pixels of both capsule caps.
///
/// Every mirrored sample is attached to whichever center lies on its side of
/// the perpendicular through `center1`, so each cap only keeps the half that
/// faces away from the other center.
pub fn capsule_cap_pixels(capsule: &Capsule) -> BTreeSet<(i32, i32)> {
    cap_pixels(capsule, None)
}

/// Endpoints of the two straight sides joining the caps, or `None` when the
/// centers coincide and the capsule degenerates to a circle.
pub fn capsule_sides(capsule: &Capsule) -> Option<[(Point, Point); 2]> {
    let c1 = capsule.center1;
    let c2 = capsule.center2;
    let vx = f64::from(c2.x) - f64::from(c1.x);
    let vy = f64::from(c2.y) - f64::from(c1.y);
    let length = vx.hypot(vy);
    if length == 0.0 {
        return None;
    }

    let radius = f64::from(capsule.radius());
    let offset = Point::new(
        (-vy / length * radius).round() as i32,
        (vx / length * radius).round() as i32,
    );
    Some([(c1 + offset, c2 + offset), (c1 - offset, c2 - offset)])
}

/// Draws a capsule: two half-circle caps plus the tangent sides, using the
/// style's thickness and antialiasing for the sides.
pub fn draw_capsule(surface: &mut Surface, capsule: &Capsule) {
    let style: &Style = &capsule.style;
    let caps = cap_pixels(capsule, surface_bounds(surface));
    plot_all(surface, caps, style.border_color);
    if let Some(sides) = capsule_sides(capsule) {
        for (start, end) in sides {
            draw_stroke(surface, start, end, style.border_color, style);
        }
    }
}
