// This module handles bot presence and lifecycle events.
//
// Everything here is Discord-layer glue. We only work with Discord SDK types
// (Context, ActivityData, OnlineStatus) and keep the logic short.

use poise::serenity_prelude as serenity;

/// Shows members that the bot is on duty.
pub fn set_watching(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for banned emoji");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Called once the bot is ready so the presence is set in one place.
pub fn on_ready(ctx: &serenity::Context) {
    set_watching(ctx);
}
