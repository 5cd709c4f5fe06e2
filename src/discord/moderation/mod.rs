// Discord moderation glue.
// - `events.rs` turns gateway events into engine calls.
// - `transport.rs` performs the engine's actions through serenity.

pub mod events;
pub mod transport;
