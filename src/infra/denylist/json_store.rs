use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::fs;

use crate::core::denylist::{backup_file_name, BackupRecord, DenylistStore, Glyph, StoreError};

/// JSON file store for the custom denylist. The file holds a pretty-printed
/// array of strings; backups are plain copies of it.
pub struct JsonDenylistStore {
    path: PathBuf,
    backup_dir: PathBuf,
}

impl JsonDenylistStore {
    pub fn new(path: impl AsRef<Path>, backup_dir: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            backup_dir: backup_dir.as_ref().to_path_buf(),
        }
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DenylistStore for JsonDenylistStore {
    async fn load(&self) -> Result<Vec<Glyph>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&self.path).await?;
        let glyphs: Vec<Glyph> = serde_json::from_str(&text)?;
        Ok(glyphs)
    }

    async fn save(&self, glyphs: &[Glyph]) -> Result<(), StoreError> {
        self.ensure_parent().await?;
        let text = serde_json::to_string_pretty(glyphs)?;
        fs::write(&self.path, text).await?;
        Ok(())
    }

    async fn backup(&self, taken_at: NaiveDateTime) -> Result<BackupRecord, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NothingToBackup);
        }

        fs::create_dir_all(&self.backup_dir).await?;
        let file_name = backup_file_name(taken_at);
        let path = self.backup_dir.join(&file_name);
        fs::copy(&self.path, &path).await?;

        Ok(BackupRecord { path, file_name })
    }

    async fn overwrite(&self, content: &[u8]) -> Result<(), StoreError> {
        self.ensure_parent().await?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn glyphs(items: &[&str]) -> Vec<Glyph> {
        items.iter().map(|g| g.to_string()).collect()
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonDenylistStore::new(dir.path().join("banned.json"), dir.path().join("backups"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonDenylistStore::new(
            dir.path().join("nested").join("banned.json"),
            dir.path().join("backups"),
        );

        store.save(&glyphs(&["😈", "🏳️‍🌈"])).await.unwrap();

        let reopened = JsonDenylistStore::new(
            dir.path().join("nested").join("banned.json"),
            dir.path().join("backups"),
        );
        assert_eq!(reopened.load().await.unwrap(), glyphs(&["😈", "🏳️‍🌈"]));
    }

    #[tokio::test]
    async fn saved_file_is_indented_and_keeps_emoji_unescaped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("banned.json");
        let store = JsonDenylistStore::new(&path, dir.path().join("backups"));

        store.save(&glyphs(&["😈"])).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "[\n  \"😈\"\n]");
    }

    #[tokio::test]
    async fn save_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let store = JsonDenylistStore::new(dir.path().join("banned.json"), dir.path().join("backups"));

        store.save(&glyphs(&["😈", "👻"])).await.unwrap();
        store.save(&glyphs(&["🎃"])).await.unwrap();

        assert_eq!(store.load().await.unwrap(), glyphs(&["🎃"]));
    }

    #[tokio::test]
    async fn invalid_json_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("banned.json");
        std::fs::write(&path, "[\"😈\", ").unwrap();
        let store = JsonDenylistStore::new(&path, dir.path().join("backups"));

        assert!(matches!(
            store.load().await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn save_into_a_file_path_fails_with_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = JsonDenylistStore::new(blocker.join("banned.json"), dir.path().join("backups"));

        assert!(matches!(
            store.save(&glyphs(&["😈"])).await,
            Err(StoreError::Io(_))
        ));
    }

    #[tokio::test]
    async fn backup_requires_an_existing_file() {
        let dir = tempdir().unwrap();
        let store = JsonDenylistStore::new(dir.path().join("banned.json"), dir.path().join("backups"));
        let taken_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap();

        assert!(matches!(
            store.backup(taken_at).await,
            Err(StoreError::NothingToBackup)
        ));
        assert!(!dir.path().join("backups").exists());
    }

    #[tokio::test]
    async fn backup_copies_file_under_timestamped_name() {
        let dir = tempdir().unwrap();
        let backup_dir = dir.path().join("backups");
        let store = JsonDenylistStore::new(dir.path().join("banned.json"), &backup_dir);
        store.save(&glyphs(&["😈"])).await.unwrap();
        let taken_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap();

        let record = store.backup(taken_at).await.unwrap();

        assert_eq!(record.file_name, "denylist_backup_20240501_123045.json");
        assert_eq!(record.path, backup_dir.join("denylist_backup_20240501_123045.json"));
        assert_eq!(
            std::fs::read_to_string(&record.path).unwrap(),
            std::fs::read_to_string(dir.path().join("banned.json")).unwrap()
        );
    }

    #[tokio::test]
    async fn overwrite_writes_raw_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("banned.json");
        let store = JsonDenylistStore::new(&path, dir.path().join("backups"));
        store.save(&glyphs(&["😈"])).await.unwrap();

        store.overwrite(br#"["x","y"]"#).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"["x","y"]"#);
        assert_eq!(store.load().await.unwrap(), glyphs(&["x", "y"]));
    }
}
