use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Trait for the local copy of a task document
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Whether something is already stored at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Store `contents` at `path`, replacing whatever was there
    async fn save(&self, path: &Path, contents: &str) -> Result<(), StorageError>;
}

/// Plain files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemStore;

#[async_trait]
impl DocumentStore for FilesystemStore {
    async fn exists(&self, path: &Path) -> bool {
        match fs::try_exists(path).await {
            Ok(found) => found,
            Err(e) => {
                debug!("Could not check {}: {}", path.display(), e);
                false
            }
        }
    }

    async fn save(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        fs::write(path, contents.as_bytes())
            .await
            .map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Wrote {} bytes to {}", contents.len(), path.display());

        Ok(())
    }
}
