// Core denylist module - the set of banned glyphs and how it is matched.
// Following the same pattern as the moderation module.

pub mod denylist_models;
pub mod denylist_service;
pub mod denylist_store;
pub mod scanner;

pub use denylist_models::*;
pub use denylist_service::*;
pub use denylist_store::*;
