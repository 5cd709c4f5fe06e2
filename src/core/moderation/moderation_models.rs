// Moderation domain models - data structures for the emoji moderation engine.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts platform events into these and back.

use crate::core::denylist::Glyph;
use thiserror::Error;

/// A new message, reduced to what the engine needs.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    /// Bots (including ourselves) are never moderated
    pub author_is_bot: bool,
    pub content: String,
}

/// A new reaction, reduced to what the engine needs.
#[derive(Debug, Clone)]
pub struct InboundReaction {
    pub message_id: u64,
    pub channel_id: u64,
    pub user_id: u64,
    pub user_is_bot: bool,
    /// The reaction rendered as text (unicode emoji or `<:name:id>`)
    pub glyph: Glyph,
}

/// Feedback shown to a user. With a title it renders as an embed, without as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: Option<String>,
    pub body: String,
    /// User to mention in front of the body
    pub mention: Option<u64>,
}

impl Notice {
    /// An embed-style warning.
    pub fn warning(body: impl Into<String>) -> Self {
        Self {
            title: Some("⚠️ Warning".to_string()),
            body: body.into(),
            mention: None,
        }
    }

    /// A plain text notice.
    pub fn plain(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
            mention: None,
        }
    }

    pub fn mentioning(mut self, user_id: u64) -> Self {
        self.mention = Some(user_id);
        self
    }
}

/// Why a platform action failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Missing permission, or the user does not accept direct messages
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// The message or reaction is already gone
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Platform error: {0}")]
    Other(String),
}

/// Where the warning for a removal ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeRoute {
    /// Transient notice in the originating channel
    Channel,
    /// Private message to the actor
    Direct,
    /// Private message failed, transient notice posted in the channel instead
    ChannelFallback,
    /// Nothing could be delivered
    Undelivered(TransportError),
}

/// What the engine did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Sent by a bot, not checked
    Exempt,
    /// No banned glyph
    Clean,
    /// Content removed and the actor was (or could not be) warned
    Removed { glyph: Glyph, notice: NoticeRoute },
    /// A banned glyph was found but the content could not be removed
    RemovalFailed { glyph: Glyph, error: TransportError },
}
