//! Filesystem blob store
//!
//! Stores photo bytes as flat files under a configured directory and hands
//! back the file path as the stable reference.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, instrument};
use uuid::Uuid;

use pigeon_core::error::DomainError;
use pigeon_core::traits::{BlobStore, RepoResult};

/// Directory-backed blob store
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Create a blob store rooted at `dir`, creating the directory if needed
    pub async fn new(dir: impl Into<PathBuf>) -> RepoResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        info!("Blob storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Root directory of the store
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    #[instrument(skip(self, data), fields(len = data.len()))]
    async fn store(&self, data: &[u8]) -> RepoResult<String> {
        let name = Uuid::new_v4().to_string();
        let path = self.dir.join(&name);

        fs::write(&path, data)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        Ok(path.display().to_string())
    }
}
