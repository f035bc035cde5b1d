//! Native filesystem runtime backed by `tokio::fs`.

use async_trait::async_trait;
use std::path::Path;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Native filesystem [`Runtime`].
///
/// `tokio::fs` runs each call on the blocking pool, so none of these block
/// the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> RuntimeResult<u64> {
        // A missing source is reported against the source, not the destination
        if !self.exists(from) {
            return Err(RuntimeError::FileNotFound(from.to_path_buf()));
        }
        tokio::fs::copy(from, to)
            .await
            .map_err(|e| RuntimeError::from_io(e, to))
    }

    async fn create_dir_all(&self, path: &Path) -> RuntimeResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))?;

        Ok(FileMetadata { size: metadata.len() })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
