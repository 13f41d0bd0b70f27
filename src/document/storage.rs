use super::format::{self, ParsedDocument};
use super::options::{DocumentOptions, lock_path, temp_path};
use crate::draw::Shape;
use anyhow::{Context, Result};
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

/// A document read from disk.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Shapes in file order, textures decoded where possible
    pub shapes: Vec<Shape>,
    /// 1-based line numbers that were skipped as malformed
    pub skipped_lines: Vec<usize>,
    /// Shapes dropped because the document exceeded `max_shapes`
    pub truncated: usize,
    /// The file was gzip-compressed
    pub compressed: bool,
}

/// Writes shapes to `path`, one per line.
///
/// Holds an exclusive lock on `<path>.lock` while writing. The payload goes to
/// a temporary file first; the previous document is rotated to `<path>.bak`
/// when backups are enabled, then the temporary file is renamed into place.
/// Payloads above `max_file_size_bytes` are not written.
///
/// Returns `Ok(false)` when the save was skipped for size, `Ok(true)` once
/// the document is in place.
pub fn save_document<'a>(
    path: &Path,
    shapes: impl IntoIterator<Item = &'a Shape>,
    options: &DocumentOptions,
) -> Result<bool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create document directory {}", parent.display())
            })?;
        }
    }

    let text = format::write_document(shapes);
    let lock_file = open_lock(path)?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("failed to lock document {}", path.display()))?;

    let result = save_document_inner(path, text.into_bytes(), options);

    lock_file
        .unlock()
        .unwrap_or_else(|err| warn!("failed to unlock document {}: {}", path.display(), err));

    result
}

fn save_document_inner(path: &Path, mut bytes: Vec<u8>, options: &DocumentOptions) -> Result<bool> {
    if bytes.len() as u64 > options.max_file_size_bytes {
        warn!(
            "Document size {} bytes exceeds the configured limit of {} bytes; skipping save",
            bytes.len(),
            options.max_file_size_bytes
        );
        return Ok(false);
    }

    let compress = options.should_compress(bytes.len());
    if compress {
        bytes = compress_bytes(&bytes)?;
    }

    let tmp_path = temp_path(path)?;
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| format!("failed to open temporary file {}", tmp_path.display()))?;
        tmp_file
            .write_all(&bytes)
            .context("failed to write document payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary document file")?;
    }

    if path.exists() {
        if options.backup_retention > 0 {
            let backup = super::options::backup_path(path);
            if backup.exists() {
                fs::remove_file(&backup).ok();
            }
            fs::rename(path, &backup).with_context(|| {
                format!(
                    "failed to rotate previous document {} -> {}",
                    path.display(),
                    backup.display()
                )
            })?;
        } else {
            fs::remove_file(path).ok();
        }
    }

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to move temporary file {} -> {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    info!(
        "Document saved to {} ({} bytes, compression={})",
        path.display(),
        bytes.len(),
        compress
    );
    Ok(true)
}

/// Reads the document at `path`.
///
/// Returns `Ok(None)` when the file exceeds `max_file_size_bytes`. Texture
/// paths are resolved relative to the document's directory; textures that
/// fail to decode keep their path and simply do not paint.
pub fn load_document(path: &Path, options: &DocumentOptions) -> Result<Option<LoadedDocument>> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to stat document {}", path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "Document {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        return Ok(None);
    }

    let lock_file = open_lock(path)?;
    lock_file
        .lock_shared()
        .with_context(|| format!("failed to acquire shared lock for {}", path.display()))?;

    let result = read_document(path);

    lock_file
        .unlock()
        .unwrap_or_else(|err| warn!("failed to unlock document {}: {}", path.display(), err));

    let (text, compressed) = result?;
    let ParsedDocument {
        mut shapes,
        skipped_lines,
    } = format::parse_document(&text);

    let mut truncated = 0;
    if options.max_shapes > 0 && shapes.len() > options.max_shapes {
        warn!(
            "Document {} contains {} shapes which exceeds the limit of {}; truncating",
            path.display(),
            shapes.len(),
            options.max_shapes
        );
        truncated = shapes.len() - options.max_shapes;
        shapes.truncate(options.max_shapes);
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_textures(&mut shapes, base_dir);

    info!(
        "Loaded {} shapes from {} ({} skipped)",
        shapes.len(),
        path.display(),
        skipped_lines.len()
    );
    Ok(Some(LoadedDocument {
        shapes,
        skipped_lines,
        truncated,
        compressed,
    }))
}

/// Decodes every texture referenced by `shapes`, resolving relative paths against `base_dir`.
pub fn resolve_textures(shapes: &mut [Shape], base_dir: &Path) {
    for shape in shapes {
        let Some(texture) = shape.style_mut().texture.as_mut() else {
            continue;
        };
        if texture.is_loaded() {
            continue;
        }
        let stored = Path::new(texture.path());
        let resolved = if stored.is_absolute() {
            stored.to_path_buf()
        } else {
            base_dir.join(stored)
        };
        if let Err(err) = texture.load_tile(&resolved) {
            warn!("{err}; the shape will render without its texture");
        } else {
            debug!("Loaded texture {}", resolved.display());
        }
    }
}

fn open_lock(path: &Path) -> Result<File> {
    let lock = lock_path(path);
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock)
        .with_context(|| format!("failed to open document lock file {}", lock.display()))
}

fn read_document(path: &Path) -> Result<(String, bool)> {
    let mut file_bytes = Vec::new();
    File::open(path)
        .with_context(|| format!("failed to open document {}", path.display()))?
        .read_to_end(&mut file_bytes)
        .context("failed to read document")?;

    let compressed = is_gzip(&file_bytes);
    let bytes = if compressed {
        let mut decoder = GzDecoder::new(&file_bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("failed to decompress document")?;
        out
    } else {
        file_bytes
    };

    let text = String::from_utf8(bytes).context("document is not valid UTF-8")?;
    Ok((text, compressed))
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress document payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed document payload")
}

pub(crate) fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}
