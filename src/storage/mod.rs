//! Snapshot persistence.
//!
//! Only the latest snapshot is kept. Publication replaces it atomically so a
//! reader sees either the previous document or the new one in full.
//!
//! ```text
//! data/
//! ├── live.json        # published snapshot
//! ├── .live.tmp        # staging file, renamed over live.json
//! ├── last_api.json    # last discovery response (debug)
//! ├── lobby.html       # lobby markup (debug)
//! └── lobby.png        # lobby image (debug)
//! ```

pub mod artifacts;
pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Payload;

pub use artifacts::ArtifactWriter;
pub use local::LocalStorage;

/// Metadata about one publication.
#[derive(Debug, Clone)]
pub struct PublishMetadata {
    /// Size of the published document
    pub bytes: usize,
    pub fetched_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replace the published snapshot with `payload`, all or nothing.
    async fn publish(&self, payload: &Payload) -> Result<PublishMetadata>;

    /// Raw bytes of the published snapshot, if one exists.
    async fn read_latest(&self) -> Result<Option<Vec<u8>>>;
}
