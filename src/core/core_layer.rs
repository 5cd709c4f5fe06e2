// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "denylist/mod.rs"]
pub mod denylist;

#[path = "moderation/mod.rs"]
pub mod moderation;
