// Denylist infra layer.
// - `json_store.rs` persists the custom glyph list and its backups to disk.

pub mod json_store;

pub use json_store::JsonDenylistStore;
