// Denylist service - owns the banned glyph set and every mutation of it.
//
// This service handles:
// - Loading the custom list at startup (corrupt files fall back to empty)
// - Keeping the effective set (defaults + custom) in sync with the custom list
// - Add / remove with persistence after every change
// - Backup and restore of the persisted file
//
// NO Discord dependencies here - just pure domain logic.

use super::denylist_models::{
    default_glyphs, AddOutcome, BackupRecord, Glyph, RemoveOutcome,
};
use super::denylist_store::{DenylistStore, StoreError};
use super::scanner;
use chrono::Local;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum DenylistError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Emoji must not be empty")]
    EmptyGlyph,

    #[error("Attach a .json backup file to restore from")]
    MissingAttachment,

    #[error("Attach exactly one file to restore from (got {0})")]
    TooManyAttachments(usize),

    #[error("Backup must be a .json file, got `{0}`")]
    WrongExtension(String),

    #[error("Backup is not a list of emoji: {0}")]
    InvalidContent(String),
}

// ============================================================================
// CORE SERVICE
// ============================================================================

struct DenylistState {
    custom: Vec<Glyph>,
    effective: HashSet<Glyph>,
}

impl DenylistState {
    fn new(defaults: &[Glyph], custom: Vec<Glyph>) -> Self {
        let effective = defaults.iter().chain(custom.iter()).cloned().collect();
        Self { custom, effective }
    }
}

/// The banned glyph set: built-in defaults plus the admin-managed custom list.
pub struct DenylistService<S: DenylistStore> {
    store: S,
    defaults: Vec<Glyph>,
    // The write lock is held across persistence so mutations never interleave.
    state: RwLock<DenylistState>,
}

impl<S: DenylistStore> DenylistService<S> {
    /// Create the service with the built-in default glyphs.
    pub async fn new(store: S) -> Self {
        Self::with_defaults(store, default_glyphs()).await
    }

    /// Create the service with an explicit default set.
    pub async fn with_defaults(store: S, defaults: Vec<Glyph>) -> Self {
        let custom = load_or_empty(&store).await;
        tracing::info!(
            defaults = defaults.len(),
            custom = custom.len(),
            "Denylist loaded"
        );
        let state = DenylistState::new(&defaults, custom);

        Self {
            store,
            defaults,
            state: RwLock::new(state),
        }
    }

    /// Read the persisted custom list, falling back to empty on any failure.
    pub async fn load_custom(&self) -> Vec<Glyph> {
        load_or_empty(&self.store).await
    }

    /// The admin-managed glyphs in insertion order.
    #[allow(dead_code)]
    pub async fn custom(&self) -> Vec<Glyph> {
        self.state.read().await.custom.clone()
    }

    /// Defaults and custom glyphs together.
    #[allow(dead_code)]
    pub async fn effective_set(&self) -> HashSet<Glyph> {
        self.state.read().await.effective.clone()
    }

    /// The effective set in a stable order: defaults first, then custom glyphs.
    pub async fn listing(&self) -> Vec<Glyph> {
        let state = self.state.read().await;
        let mut seen = HashSet::new();
        self.defaults
            .iter()
            .chain(state.custom.iter())
            .filter(|glyph| seen.insert(glyph.as_str()))
            .cloned()
            .collect()
    }

    /// Whether `text` contains any banned glyph.
    #[allow(dead_code)]
    pub async fn contains_banned(&self, text: &str) -> bool {
        scanner::contains_banned(text, &self.state.read().await.effective)
    }

    /// The first banned glyph found in `text`.
    pub async fn find_banned(&self, text: &str) -> Option<Glyph> {
        let state = self.state.read().await;
        scanner::find_banned(text, &state.effective).cloned()
    }

    /// Exact membership check, used for reactions.
    pub async fn is_banned(&self, glyph: &str) -> bool {
        self.state.read().await.effective.contains(glyph)
    }

    /// Add a glyph to the custom list and persist it.
    pub async fn add(&self, glyph: &str) -> Result<AddOutcome, DenylistError> {
        if glyph.is_empty() {
            return Err(DenylistError::EmptyGlyph);
        }

        let mut state = self.state.write().await;
        if state.custom.iter().any(|g| g == glyph) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        let mut custom = state.custom.clone();
        custom.push(glyph.to_string());
        self.store.save(&custom).await?;

        *state = DenylistState::new(&self.defaults, custom);
        tracing::info!(glyph, "Glyph added to denylist");
        Ok(AddOutcome::Added)
    }

    /// Remove a glyph from the custom list and persist it.
    ///
    /// Default glyphs are not part of the custom list and stay banned.
    pub async fn remove(&self, glyph: &str) -> Result<RemoveOutcome, DenylistError> {
        let mut state = self.state.write().await;
        if !state.custom.iter().any(|g| g == glyph) {
            return Ok(RemoveOutcome::NotFound);
        }

        let custom: Vec<Glyph> = state
            .custom
            .iter()
            .filter(|g| g.as_str() != glyph)
            .cloned()
            .collect();
        self.store.save(&custom).await?;

        *state = DenylistState::new(&self.defaults, custom);
        tracing::info!(glyph, "Glyph removed from denylist");
        Ok(RemoveOutcome::Removed)
    }

    /// Copy the persisted file into the backup directory.
    pub async fn backup(&self) -> Result<BackupRecord, DenylistError> {
        let _state = self.state.read().await;
        let record = self.store.backup(Local::now().naive_local()).await?;
        tracing::info!(path = %record.path.display(), "Denylist backup created");
        Ok(record)
    }

    /// Replace the persisted file with an uploaded backup and reload from it.
    ///
    /// The content is validated before anything is written. Returns the number
    /// of custom glyphs now in effect.
    pub async fn restore(&self, file_name: &str, content: &[u8]) -> Result<usize, DenylistError> {
        ensure_json_extension(file_name)?;
        serde_json::from_slice::<Vec<Glyph>>(content)
            .map_err(|e| DenylistError::InvalidContent(e.to_string()))?;

        let mut state = self.state.write().await;
        self.store.overwrite(content).await?;

        let custom = self.load_custom().await;
        let count = custom.len();
        *state = DenylistState::new(&self.defaults, custom);
        tracing::info!(file_name, custom = count, "Denylist restored from backup");
        Ok(count)
    }
}

/// Pick the single attachment a restore needs.
pub fn single_attachment<T>(attachments: &[T]) -> Result<&T, DenylistError> {
    match attachments {
        [] => Err(DenylistError::MissingAttachment),
        [one] => Ok(one),
        many => Err(DenylistError::TooManyAttachments(many.len())),
    }
}

/// Restores only accept `.json` files (case-insensitive).
pub fn ensure_json_extension(file_name: &str) -> Result<(), DenylistError> {
    let is_json = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(())
    } else {
        Err(DenylistError::WrongExtension(file_name.to_string()))
    }
}

async fn load_or_empty<S: DenylistStore>(store: &S) -> Vec<Glyph> {
    match store.load().await {
        Ok(glyphs) => dedup_preserving_order(glyphs),
        Err(StoreError::Serialization(e)) => {
            tracing::warn!("Denylist file is corrupt, starting with an empty list: {}", e);
            Vec::new()
        }
        Err(e) => {
            tracing::error!("Failed to read denylist file, starting with an empty list: {}", e);
            Vec::new()
        }
    }
}

fn dedup_preserving_order(glyphs: Vec<Glyph>) -> Vec<Glyph> {
    let mut seen = HashSet::new();
    glyphs
        .into_iter()
        .filter(|glyph| !glyph.is_empty() && seen.insert(glyph.clone()))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
