//! Filesystem runtime abstraction.
//!
//! The coordinator and the esbuild collaborator never touch the filesystem
//! directly; they go through [`Runtime`] so tests can count and fail calls.

mod native;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use native::NativeRuntime;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Permission denied
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl RuntimeError {
    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => RuntimeError::FileNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                RuntimeError::PermissionDenied(path.to_path_buf())
            }
            _ => RuntimeError::Io(format!("{}: {}", path.display(), err)),
        }
    }
}

/// File metadata
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
}

/// Filesystem operations used during a build.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Write a file, replacing it if present
    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()>;

    /// Copy `from` to `to`, returning the number of bytes copied
    async fn copy_file(&self, from: &Path, to: &Path) -> RuntimeResult<u64>;

    /// Create a directory and all missing parents
    async fn create_dir_all(&self, path: &Path) -> RuntimeResult<()>;

    /// Get file metadata
    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;
}
