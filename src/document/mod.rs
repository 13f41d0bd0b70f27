//! Document persistence.
//!
//! Serialises shapes to the line-based text format, writes it to disk with
//! locking, optional compression, and backup rotation, and reads it back with
//! malformed lines skipped.

pub mod format;
mod options;
mod storage;

pub use format::{ParsedDocument, deserialize, parse_document, serialize, write_document};
pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, DocumentOptions, backup_path,
    lock_path,
};
pub use storage::{LoadedDocument, load_document, resolve_textures, save_document};
