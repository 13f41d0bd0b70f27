//! Pixel surface the rasterizer draws into.

use super::color::Color;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

/// An addressable grid of RGBA pixels.
///
/// Coordinates are signed so that rasterizers can emit pixels past the edges;
/// every write outside the grid is dropped and every read outside it yields `None`.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Creates a surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background.into()),
        }
    }

    /// Wraps an existing image buffer.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns true if `(x, y)` addresses a pixel of this surface.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Reads a pixel, or `None` when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.contains(x, y)
            .then(|| Color::from(*self.image.get_pixel(x as u32, y as u32)))
    }

    /// Composites `color` over the existing pixel (source-over).
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.contains(x, y) {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = color.over(Color::from(*dst)).into();
    }

    /// Overwrites a pixel without blending.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.contains(x, y) {
            self.image.put_pixel(x as u32, y as u32, color.into());
        }
    }

    /// Fills the whole surface with one color.
    pub fn clear(&mut self, color: Color) {
        let pixel = color.into();
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Writes the surface to a PNG file, creating parent directories as needed.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write PNG {}", path.display()))?;
        log::info!(
            "Wrote {}x{} surface to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut surface = Surface::new(4, 3, WHITE);
        surface.put_pixel(-1, 0, RED);
        surface.blend_pixel(4, 0, RED);
        surface.put_pixel(0, 3, RED);
        assert!(surface.pixel(-1, 0).is_none());
        assert!(surface.pixel(4, 2).is_none());
        assert!(surface.image().pixels().all(|p| Color::from(*p) == WHITE));
    }

    #[test]
    fn blend_uses_source_over() {
        let mut surface = Surface::new(2, 2, WHITE);
        surface.blend_pixel(1, 1, BLACK.with_alpha(0));
        assert_eq!(surface.pixel(1, 1), Some(WHITE));
        surface.blend_pixel(1, 1, RED);
        assert_eq!(surface.pixel(1, 1), Some(RED));
    }

    #[test]
    fn save_png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let mut surface = Surface::new(3, 2, WHITE);
        surface.put_pixel(2, 1, RED);
        surface.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(Color::from(*loaded.get_pixel(2, 1)), RED);
        assert_eq!(Color::from(*loaded.get_pixel(0, 0)), WHITE);
    }
}
