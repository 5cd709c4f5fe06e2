// Discord commands module.
// Each feature gets its own command file.

pub mod denylist;

pub mod help;

// Bot presence management
pub mod presence;
