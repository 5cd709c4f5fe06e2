use super::denylist_models::{BackupRecord, Glyph};
use async_trait::async_trait;
use chrono::NaiveDateTime;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("No denylist file exists yet")]
    NothingToBackup,
}

/// Persistence port for the custom part of the denylist.
///
/// Implementations own a single file; every write replaces it completely.
#[async_trait]
pub trait DenylistStore: Send + Sync {
    /// Read the custom list. A missing file is an empty list, not an error.
    async fn load(&self) -> Result<Vec<Glyph>, StoreError>;

    /// Overwrite the persisted list with `glyphs`.
    async fn save(&self, glyphs: &[Glyph]) -> Result<(), StoreError>;

    /// Copy the persisted file into the backup directory.
    async fn backup(&self, taken_at: NaiveDateTime) -> Result<BackupRecord, StoreError>;

    /// Replace the persisted file with raw bytes (used by restore).
    async fn overwrite(&self, content: &[u8]) -> Result<(), StoreError>;
}
