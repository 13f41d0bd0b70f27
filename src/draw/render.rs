//! Rasterization entry points: single shapes, whole frames, overlays.

use super::circle::{circle_pixels, draw_capsule, draw_circle};
use super::color::{BLACK, BLUE, Color, RED, WHITE};
use super::frame::Frame;
use super::line::{draw_line, draw_stroke};
use super::scanfill::fill_interior;
use super::shape::{Point, Shape, Style};
use super::surface::Surface;
use crate::config::Config;

/// Settings for [`render_frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Color the surface is cleared to before drawing
    pub background: Color,
    /// Draw vertex and midpoint markers on top of the shapes
    pub show_handles: bool,
    /// Marker radius in pixels
    pub handle_radius: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: WHITE,
            show_handles: false,
            handle_radius: 3,
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            background: config.canvas.background.to_color(),
            show_handles: config.ui.show_handles,
            handle_radius: config.ui.handle_radius,
        }
    }
}

/// Draws one shape: interior first (closed shapes only), then the outline.
pub fn rasterize(shape: &Shape, surface: &mut Surface) {
    match shape {
        Shape::Line(line) => {
            draw_stroke(surface, line.start, line.end, line.style.border_color, &line.style);
        }
        Shape::Circle(circle) => draw_circle(surface, circle),
        Shape::Capsule(capsule) => draw_capsule(surface, capsule),
        Shape::Polygon(polygon) => {
            if polygon.vertices.len() < 2 {
                return;
            }
            draw_closed(surface, &polygon.vertices, &polygon.style);
        }
        Shape::Rectangle(rect) => draw_closed(surface, &rect.corners(), &rect.style),
    }
}

fn draw_closed(surface: &mut Surface, ring: &[Point], style: &Style) {
    if let Some(interior) = style.interior() {
        fill_interior(surface, ring, interior);
    }
    let n = ring.len();
    for i in 0..n {
        draw_stroke(surface, ring[i], ring[(i + 1) % n], style.border_color, style);
    }
}

/// Renders shapes in collection order, so later shapes occlude earlier ones.
pub fn render_shapes<'a>(shapes: impl IntoIterator<Item = &'a Shape>, surface: &mut Surface) {
    for shape in shapes {
        rasterize(shape, surface);
    }
}

/// Draws every clipped segment as a hard-edged highlight line.
pub fn render_clipped_segments(frame: &Frame, surface: &mut Surface) {
    let color = frame.clipping().highlight_color();
    let thickness = frame.clipping().highlight_thickness();
    for (start, end) in frame.clipped_segments() {
        draw_line(surface, start, end, color, thickness);
    }
}

/// Draws control-point and edge-midpoint markers for one shape.
///
/// Control points get black rings, edge midpoints red ones. Finished polygons
/// also mark their centroid in blue.
pub fn render_handles(shape: &Shape, surface: &mut Surface, radius: u32) {
    let radius = radius as i32;
    let mut marker = |center: Point, color: Color| {
        for (x, y) in circle_pixels(center, radius, 1) {
            surface.blend_pixel(x, y, color);
        }
    };

    for vertex in shape.vertices() {
        marker(vertex, BLACK);
    }
    if let Shape::Polygon(polygon) = shape {
        if polygon.preview {
            return;
        }
        if let Some(centroid) = polygon.centroid() {
            marker(centroid, BLUE);
        }
    }
    for midpoint in shape.edge_midpoints() {
        marker(midpoint, RED);
    }
}

/// Clears the surface and draws the whole frame: shapes, clip overlay, markers.
pub fn render_frame(frame: &Frame, surface: &mut Surface, options: &RenderOptions) {
    surface.clear(options.background);
    render_shapes(frame.shapes(), surface);
    render_clipped_segments(frame, surface);
    if options.show_handles {
        for shape in frame.shapes() {
            render_handles(shape, surface, options.handle_radius);
        }
    }
    log::debug!(
        "Rendered {} shapes onto {}x{} surface",
        frame.len(),
        surface.width(),
        surface.height()
    );
}
