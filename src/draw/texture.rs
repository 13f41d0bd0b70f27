//! Tiled texture images used by polygon and flood fills.

use super::color::Color;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading a texture tile.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {0} has no pixels")]
    Empty(PathBuf),
}

/// A fill texture: the path it was chosen from plus its decoded tile.
///
/// The path is kept verbatim so documents round-trip even when the image
/// cannot be decoded; such textures simply do not paint.
#[derive(Debug, Clone)]
pub struct Texture {
    path: String,
    tile: Option<Arc<RgbaImage>>,
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Texture {
    /// A texture reference whose image has not been loaded yet.
    pub fn unloaded(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tile: None,
        }
    }

    /// A texture built from an in-memory tile.
    pub fn from_image(path: impl Into<String>, tile: RgbaImage) -> Self {
        Self {
            path: path.into(),
            tile: (tile.width() > 0 && tile.height() > 0).then(|| Arc::new(tile)),
        }
    }

    /// Decodes the image at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let mut texture = Self::unloaded(path.to_string_lossy());
        texture.load_tile(path)?;
        Ok(texture)
    }

    /// Decodes the tile from `resolved` while keeping the stored path unchanged.
    pub fn load_tile(&mut self, resolved: &Path) -> Result<(), TextureError> {
        let tile = image::open(resolved)
            .map_err(|source| TextureError::Decode {
                path: resolved.to_path_buf(),
                source,
            })?
            .to_rgba8();
        if tile.width() == 0 || tile.height() == 0 {
            return Err(TextureError::Empty(resolved.to_path_buf()));
        }
        self.tile = Some(Arc::new(tile));
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.tile.is_some()
    }

    /// Samples the tile at `(x, y)` wrapped independently on each axis.
    ///
    /// Negative coordinates wrap too, so the pattern repeats seamlessly across
    /// the origin. Returns `None` when no tile is loaded.
    pub fn sample(&self, x: i64, y: i64) -> Option<Color> {
        let tile = self.tile.as_deref()?;
        let tx = x.rem_euclid(i64::from(tile.width())) as u32;
        let ty = y.rem_euclid(i64::from(tile.height())) as u32;
        Some(Color::from(*tile.get_pixel(tx, ty)))
    }
}
