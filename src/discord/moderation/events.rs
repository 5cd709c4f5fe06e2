use crate::core::moderation::{InboundMessage, InboundReaction, ModerationOutcome};
use crate::discord::moderation::transport::SerenityTransport;
use crate::discord::Data;
use anyhow::Result;
use poise::serenity_prelude as serenity;

/// Run a new message through the moderation engine.
pub async fn handle_message(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<()> {
    let inbound = InboundMessage {
        message_id: message.id.get(),
        channel_id: message.channel_id.get(),
        author_id: message.author.id.get(),
        author_is_bot: message.author.bot,
        content: message.content.clone(),
    };

    let transport = SerenityTransport::new(ctx.http.clone());
    let outcome = data.moderation.handle_message(&transport, &inbound).await;
    log_outcome("message", inbound.message_id, &outcome);

    Ok(())
}

/// Run a new reaction through the moderation engine.
pub async fn handle_reaction(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
) -> Result<()> {
    let user_id = match reaction.user_id {
        Some(id) => id,
        None => return Ok(()),
    };

    // Guild reactions carry the member; otherwise ask the API who reacted.
    let user_is_bot = match reaction.member.as_ref() {
        Some(member) => member.user.bot,
        None => user_id.to_user(ctx).await?.bot,
    };

    let inbound = InboundReaction {
        message_id: reaction.message_id.get(),
        channel_id: reaction.channel_id.get(),
        user_id: user_id.get(),
        user_is_bot,
        glyph: reaction.emoji.to_string(),
    };

    let transport = SerenityTransport::new(ctx.http.clone());
    let outcome = data.moderation.handle_reaction(&transport, &inbound).await;
    log_outcome("reaction", inbound.message_id, &outcome);

    Ok(())
}

fn log_outcome(kind: &str, message_id: u64, outcome: &ModerationOutcome) {
    match outcome {
        ModerationOutcome::Removed { glyph, notice } => {
            tracing::debug!(kind, message_id, glyph = %glyph, ?notice, "Moderated");
        }
        ModerationOutcome::RemovalFailed { glyph, error } => {
            tracing::debug!(kind, message_id, glyph = %glyph, %error, "Moderation incomplete");
        }
        ModerationOutcome::Exempt | ModerationOutcome::Clean => {}
    }
}
