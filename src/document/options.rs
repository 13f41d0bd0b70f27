use crate::config::{DocumentCompression, DocumentConfig};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES: u64 = 256 * 1024; // 256 KiB

/// Compression preference for document files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Always write plain text.
    Off,
    /// Always write gzip-compressed text.
    On,
    /// Write gzip when the payload reaches the configured threshold.
    Auto,
}

impl From<DocumentCompression> for CompressionMode {
    fn from(value: DocumentCompression) -> Self {
        match value {
            DocumentCompression::Off => CompressionMode::Off,
            DocumentCompression::On => CompressionMode::On,
            DocumentCompression::Auto => CompressionMode::Auto,
        }
    }
}

/// Limits and write policy for loading and saving documents.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub max_shapes: usize,
    pub max_file_size_bytes: u64,
    pub compression: CompressionMode,
    pub auto_compress_threshold_bytes: u64,
    pub backup_retention: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            max_shapes: 10_000,
            max_file_size_bytes: 10 * 1024 * 1024,
            compression: CompressionMode::Off,
            auto_compress_threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
            backup_retention: 1,
        }
    }
}

impl DocumentOptions {
    /// Builds options from the `[document]` config section.
    pub fn from_config(config: &DocumentConfig) -> Self {
        Self {
            max_shapes: config.max_shapes,
            max_file_size_bytes: config.max_file_size_bytes.max(1),
            compression: config.compression.into(),
            auto_compress_threshold_bytes: config.auto_compress_threshold_bytes.max(1),
            backup_retention: config.backup_retention,
        }
    }

    pub(crate) fn should_compress(&self, payload_len: usize) -> bool {
        match self.compression {
            CompressionMode::Off => false,
            CompressionMode::On => true,
            CompressionMode::Auto => payload_len as u64 >= self.auto_compress_threshold_bytes,
        }
    }
}

/// `drawing.vpd` → `drawing.vpd.bak`
pub fn backup_path(document: &Path) -> PathBuf {
    with_suffix(document, ".bak")
}

/// `drawing.vpd` → `drawing.vpd.lock`
pub fn lock_path(document: &Path) -> PathBuf {
    with_suffix(document, ".lock")
}

/// First free `drawing.vpd.tmp`, `drawing.vpd.tmp1`, ... next to the document.
pub(crate) fn temp_path(document: &Path) -> Result<PathBuf> {
    let mut candidate = with_suffix(document, ".tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = with_suffix(document, &format!(".tmp{counter}"));
    }
    Ok(candidate)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}
