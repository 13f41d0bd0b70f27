//! Scanline seed flood fill over a rendered surface.

use crate::draw::{Color, Point, Surface, Texture};
use std::collections::VecDeque;

/// What the filled region is painted with.
#[derive(Debug, Clone, Copy)]
pub enum FillSource<'a> {
    Solid(Color),
    /// Tiled from the surface origin
    Texture(&'a Texture),
}

impl FillSource<'_> {
    fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        match self {
            FillSource::Solid(color) => Some(*color),
            FillSource::Texture(texture) => texture.sample(x.into(), y.into()),
        }
    }
}

/// Row-major visited flags for every surface pixel.
struct Visited {
    width: usize,
    flags: Vec<bool>,
}

impl Visited {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as usize,
            flags: vec![false; width as usize * height as usize],
        }
    }

    fn get(&self, x: i32, y: i32) -> bool {
        self.flags[y as usize * self.width + x as usize]
    }

    fn set(&mut self, x: i32, y: i32) {
        self.flags[y as usize * self.width + x as usize] = true;
    }
}

/// Repaints the 4-connected region of the seed's color.
///
/// Region membership is decided against a snapshot taken before any pixel is
/// written, so the fill color may equal the target color without looping.
/// Pixels are overwritten, not blended.
///
/// Returns the number of pixels painted, or `None` when the seed lies outside
/// the surface or the texture has no decoded tile (the surface is untouched).
pub fn flood_fill(surface: &mut Surface, seed: Point, source: FillSource<'_>) -> Option<usize> {
    if let FillSource::Texture(texture) = source {
        if !texture.is_loaded() {
            log::warn!("Texture {} is not loaded; skipping fill", texture.path());
            return None;
        }
    }

    let snapshot = surface.clone();
    let Some(target) = snapshot.pixel(seed.x, seed.y) else {
        log::debug!("Fill seed ({}, {}) is outside the surface", seed.x, seed.y);
        return None;
    };

    let width = snapshot.width() as i32;
    let height = snapshot.height() as i32;
    let matches = |x: i32, y: i32| snapshot.pixel(x, y) == Some(target);

    let mut visited = Visited::new(snapshot.width(), snapshot.height());
    let mut queue = VecDeque::from([seed]);
    let mut painted = 0usize;

    while let Some(Point { x, y }) = queue.pop_front() {
        if !snapshot.contains(x, y) || visited.get(x, y) || !matches(x, y) {
            continue;
        }

        let mut left = x;
        while left > 0 && matches(left - 1, y) && !visited.get(left - 1, y) {
            left -= 1;
        }
        let mut right = x;
        while right < width - 1 && matches(right + 1, y) && !visited.get(right + 1, y) {
            right += 1;
        }

        for px in left..=right {
            if let Some(color) = source.color_at(px, y) {
                surface.put_pixel(px, y, color);
            }
            visited.set(px, y);
            painted += 1;

            if y > 0 && matches(px, y - 1) && !visited.get(px, y - 1) {
                queue.push_back(Point::new(px, y - 1));
            }
            if y < height - 1 && matches(px, y + 1) && !visited.get(px, y + 1) {
                queue.push_back(Point::new(px, y + 1));
            }
        }
    }

    log::debug!("Flood fill from ({}, {}) painted {painted} pixels", seed.x, seed.y);
    Some(painted)
}
