// Denylist domain models.
//
// Pure data with no Discord or filesystem dependencies.

use chrono::NaiveDateTime;
use std::path::PathBuf;

/// A single banned token: one emoji or symbol sequence, matched byte-for-byte.
pub type Glyph = String;

/// Built-in glyphs that are always banned, regardless of what admins add.
pub const DEFAULT_GLYPHS: &[&str] = &[
    // Country flags
    "🇷🇺", "🇺🇦", "🇺🇸", "🇬🇧", "🇩🇪", "🇫🇷", "🇨🇳", "🇯🇵", "🇰🇷", "🇮🇹", "🇪🇸", "🇨🇦", "🇦🇺", "🇧🇷",
    "🇮🇳", "🇵🇱", "🇹🇷", "🇸🇦",
    // Lone regional indicators
    "🇿", "🇴", "🇻",
    // Religious and identity symbols
    "✝", "☪", "✡", "🔯", "🕉", "☸", "☦", "🕎", "⚧", "🏳️‍🌈", "🏳️‍⚧️",
];

/// Result of trying to add a glyph to the custom list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Result of trying to remove a glyph from the custom list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// A point-in-time copy of the persisted denylist file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub path: PathBuf,
    pub file_name: String,
}

/// Sortable backup file name, e.g. `denylist_backup_20240501_123045.json`.
pub fn backup_file_name(taken_at: NaiveDateTime) -> String {
    format!(
        "denylist_backup_{}.json",
        taken_at.format("%Y%m%d_%H%M%S")
    )
}

/// The built-in glyphs as owned strings.
pub fn default_glyphs() -> Vec<Glyph> {
    DEFAULT_GLYPHS.iter().map(|g| g.to_string()).collect()
}
