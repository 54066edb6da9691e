//! Reading save and cover files from caller-supplied paths.

use crate::error::FileReadError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Source of save and cover file bytes.
///
/// Path-based submissions read their files synchronously at admission
/// time, so read failures surface to the caller as admission errors
/// rather than as completion events. Tests substitute an in-memory
/// reader to exercise the failure paths without touching a disk.
pub trait SaveFileReader: Send + Sync {
    /// Reads the entire file at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, FileReadError>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskReader;

impl SaveFileReader for DiskReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>, FileReadError> {
        fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FileReadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => FileReadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}

/// Serves file contents from an in-memory map.
///
/// Useful for games that assemble save data in memory, and for tests
/// that need deterministic read failures.
#[derive(Debug, Default)]
pub struct MemoryReader {
    files: parking_lot::Mutex<std::collections::HashMap<std::path::PathBuf, Vec<u8>>>,
}

impl MemoryReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores file contents under `path`.
    pub fn insert(&self, path: impl Into<std::path::PathBuf>, data: Vec<u8>) {
        self.files.lock().insert(path.into(), data);
    }

    /// Removes the file at `path`.
    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().remove(path.as_ref());
    }
}

impl SaveFileReader for MemoryReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>, FileReadError> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| FileReadError::NotFound {
                path: path.to_path_buf(),
            })
    }
}
