//! Local filesystem snapshot store.
//!
//! The document is written to a staging file next to the destination and
//! renamed over it. Both paths must live on the same filesystem for the
//! rename to be atomic.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{IoConfig, Payload};
use crate::storage::{PublishMetadata, SnapshotStore};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    outfile: PathBuf,
    tempfile: PathBuf,
}

impl LocalStorage {
    pub fn new(outfile: impl Into<PathBuf>, tempfile: impl Into<PathBuf>) -> Self {
        Self {
            outfile: outfile.into(),
            tempfile: tempfile.into(),
        }
    }

    pub fn from_config(io: &IoConfig) -> Self {
        Self::new(&io.outfile, &io.tempfile)
    }

    /// Destination path readers poll.
    pub fn outfile(&self) -> &Path {
        &self.outfile
    }

    async fn ensure_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to staging file, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        Self::ensure_dir(&self.outfile).await?;
        Self::ensure_dir(&self.tempfile).await?;

        let mut file = tokio::fs::File::create(&self.tempfile).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&self.tempfile, &self.outfile).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn publish(&self, payload: &Payload) -> Result<PublishMetadata> {
        let bytes = serde_json::to_vec(payload)?;

        if let Err(e) = self.write_bytes(&bytes).await {
            // Leave no staging file behind; the previous snapshot stays live.
            let _ = tokio::fs::remove_file(&self.tempfile).await;
            return Err(AppError::publish(format!(
                "{}: {}",
                self.outfile.display(),
                e
            )));
        }

        Ok(PublishMetadata {
            bytes: bytes.len(),
            fetched_at: payload.fetched_at,
            published_at: Utc::now(),
        })
    }

    async fn read_latest(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.outfile).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
