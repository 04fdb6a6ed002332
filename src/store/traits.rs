//! store::traits
//!
//! File store trait definition.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::record::UTF8_BOM;

/// Errors from file store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file at the given path.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read/write access to a tree of files.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait FileStore: Send + Sync {
    /// Read a whole file.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when nothing is at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError>;

    /// Write `bytes`, creating parent directories.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError>;

    /// Names of the entries directly under `path`, sorted.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, StoreError>;

    /// Whether `path` is a file.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a file that may legitimately be absent.
    fn read_optional(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match self.read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Write text as UTF-8 with a byte-order mark.
    fn write_text(&self, path: &Path, text: &str) -> Result<(), StoreError> {
        self.write(path, &with_bom(text))
    }
}

/// `text` encoded as UTF-8 behind a byte-order mark.
pub fn with_bom(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}
