// Core moderation module - reacts to messages and reactions carrying banned glyphs.
// Following the same pattern as the denylist module.

pub mod moderation_models;
pub mod moderation_service;

pub use moderation_models::*;
pub use moderation_service::*;
