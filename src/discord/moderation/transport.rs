// Serenity-backed implementation of the engine's transport port.

use crate::core::moderation::{ModerationTransport, Notice, TransportError};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;

const WARNING_COLOR: u32 = 0xE67E22; // Orange

pub struct SerenityTransport {
    http: Arc<serenity::Http>,
}

impl SerenityTransport {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

/// Notices with a title become an embed, the rest plain text.
fn render(notice: Notice) -> serenity::CreateMessage {
    let text = match notice.mention {
        Some(user_id) => format!("<@{}>, {}", user_id, notice.body),
        None => notice.body,
    };

    match notice.title {
        Some(title) => serenity::CreateMessage::new().embed(
            serenity::CreateEmbed::new()
                .title(title)
                .description(text)
                .color(WARNING_COLOR),
        ),
        None => serenity::CreateMessage::new().content(text),
    }
}

/// Sort serenity failures into the kinds the engine distinguishes.
fn classify(error: serenity::Error) -> TransportError {
    if let serenity::Error::Http(http_error) = &error {
        match http_error.status_code().map(|status| status.as_u16()) {
            Some(403) => return TransportError::Forbidden(http_error.to_string()),
            Some(404) => return TransportError::NotFound(http_error.to_string()),
            _ => {}
        }
    }
    TransportError::Other(error.to_string())
}

#[async_trait]
impl ModerationTransport for SerenityTransport {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), TransportError> {
        serenity::ChannelId::new(channel_id)
            .delete_message(&self.http, serenity::MessageId::new(message_id))
            .await
            .map_err(classify)
    }

    async fn send_transient(
        &self,
        channel_id: u64,
        notice: Notice,
        ttl: Duration,
    ) -> Result<(), TransportError> {
        let channel_id = serenity::ChannelId::new(channel_id);
        let sent = channel_id
            .send_message(&self.http, render(notice))
            .await
            .map_err(classify)?;

        // Fire and forget: nothing cancels this if the bot shuts down first.
        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = channel_id.delete_message(&http, sent.id).await {
                tracing::debug!(message_id = sent.id.get(), "Failed to expire notice: {}", e);
            }
        });

        Ok(())
    }

    async fn remove_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
        glyph: &str,
    ) -> Result<(), TransportError> {
        let reaction = serenity::ReactionType::try_from(glyph)
            .map_err(|e| TransportError::Other(e.to_string()))?;

        serenity::ChannelId::new(channel_id)
            .delete_reaction(
                &self.http,
                serenity::MessageId::new(message_id),
                Some(serenity::UserId::new(user_id)),
                reaction,
            )
            .await
            .map_err(classify)
    }

    async fn send_direct(&self, user_id: u64, notice: Notice) -> Result<(), TransportError> {
        serenity::UserId::new(user_id)
            .direct_message(&self.http, render(notice))
            .await
            .map(|_| ())
            .map_err(classify)
    }
}
