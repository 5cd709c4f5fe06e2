// Moderation engine - core business logic for banned glyph enforcement.
//
// This engine handles:
// - New messages: delete on a match, then post a short-lived warning
// - New reactions: remove the single reaction, then warn privately
//   (falling back to a short-lived public notice)
//
// Each event is handled independently; failures are logged and reported
// in the outcome, never propagated.
//
// NO Discord dependencies here - platform actions go through `ModerationTransport`.

use super::moderation_models::{
    InboundMessage, InboundReaction, ModerationOutcome, Notice, NoticeRoute, TransportError,
};
use crate::core::denylist::{DenylistService, DenylistStore};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// How long transient notices stay visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(10);

// ============================================================================
// TRANSPORT TRAIT (PORT)
// ============================================================================

/// The platform actions the engine needs.
#[async_trait]
pub trait ModerationTransport: Send + Sync {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), TransportError>;

    /// Post a notice that deletes itself after `ttl`.
    async fn send_transient(
        &self,
        channel_id: u64,
        notice: Notice,
        ttl: Duration,
    ) -> Result<(), TransportError>;

    /// Remove one user's reaction from a message.
    async fn remove_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
        glyph: &str,
    ) -> Result<(), TransportError>;

    async fn send_direct(&self, user_id: u64, notice: Notice) -> Result<(), TransportError>;
}

// ============================================================================
// CORE ENGINE
// ============================================================================

pub struct ModerationEngine<S: DenylistStore> {
    denylist: Arc<DenylistService<S>>,
    notice_ttl: Duration,
}

impl<S: DenylistStore> ModerationEngine<S> {
    pub fn new(denylist: Arc<DenylistService<S>>) -> Self {
        Self {
            denylist,
            notice_ttl: NOTICE_TTL,
        }
    }

    /// Check a new message and remove it if it carries a banned glyph.
    pub async fn handle_message<T: ModerationTransport>(
        &self,
        transport: &T,
        message: &InboundMessage,
    ) -> ModerationOutcome {
        if message.author_is_bot {
            return ModerationOutcome::Exempt;
        }

        let Some(glyph) = self.denylist.find_banned(&message.content).await else {
            return ModerationOutcome::Clean;
        };

        tracing::info!(
            message_id = message.message_id,
            channel_id = message.channel_id,
            user_id = message.author_id,
            glyph = %glyph,
            "Banned glyph in message"
        );

        if let Err(error) = transport
            .delete_message(message.channel_id, message.message_id)
            .await
        {
            tracing::warn!(
                message_id = message.message_id,
                "Failed to delete message with banned glyph: {}",
                error
            );
            return ModerationOutcome::RemovalFailed { glyph, error };
        }

        let warning = Notice::warning("these emoji are not allowed here!")
            .mentioning(message.author_id);
        let notice = match transport
            .send_transient(message.channel_id, warning, self.notice_ttl)
            .await
        {
            Ok(()) => NoticeRoute::Channel,
            Err(e) => {
                tracing::warn!(channel_id = message.channel_id, "Failed to send warning: {}", e);
                NoticeRoute::Undelivered(e)
            }
        };

        ModerationOutcome::Removed { glyph, notice }
    }

    /// Check a new reaction and remove it if its glyph is banned.
    pub async fn handle_reaction<T: ModerationTransport>(
        &self,
        transport: &T,
        reaction: &InboundReaction,
    ) -> ModerationOutcome {
        if reaction.user_is_bot {
            return ModerationOutcome::Exempt;
        }

        if !self.denylist.is_banned(&reaction.glyph).await {
            return ModerationOutcome::Clean;
        }

        let glyph = reaction.glyph.clone();
        tracing::info!(
            message_id = reaction.message_id,
            channel_id = reaction.channel_id,
            user_id = reaction.user_id,
            glyph = %glyph,
            "Banned reaction"
        );

        if let Err(error) = transport
            .remove_reaction(
                reaction.channel_id,
                reaction.message_id,
                reaction.user_id,
                &reaction.glyph,
            )
            .await
        {
            tracing::warn!(
                message_id = reaction.message_id,
                "Failed to remove banned reaction: {}",
                error
            );
            return ModerationOutcome::RemovalFailed { glyph, error };
        }

        let notice = self.warn_reactor(transport, reaction).await;
        ModerationOutcome::Removed { glyph, notice }
    }

    /// Private warning first; users that block DMs get a public one instead.
    async fn warn_reactor<T: ModerationTransport>(
        &self,
        transport: &T,
        reaction: &InboundReaction,
    ) -> NoticeRoute {
        let private = Notice::warning("These reactions are not allowed!");
        let dm_error = match transport.send_direct(reaction.user_id, private).await {
            Ok(()) => return NoticeRoute::Direct,
            Err(e) => e,
        };

        tracing::debug!(
            user_id = reaction.user_id,
            "Direct message undeliverable ({}), warning in channel",
            dm_error
        );

        let public = Notice::plain("these emoji are not allowed!").mentioning(reaction.user_id);
        match transport
            .send_transient(reaction.channel_id, public, self.notice_ttl)
            .await
        {
            Ok(()) => NoticeRoute::ChannelFallback,
            Err(e) => {
                tracing::warn!(
                    channel_id = reaction.channel_id,
                    "Failed to send reaction warning: {}",
                    e
                );
                NoticeRoute::Undelivered(e)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::denylist::{BackupRecord, Glyph, StoreError};
    use chrono::NaiveDateTime;
    use std::sync::Mutex;

    /// Store that keeps a fixed custom list and never writes.
    struct FixedStore(Vec<Glyph>);

    #[async_trait]
    impl DenylistStore for FixedStore {
        async fn load(&self) -> Result<Vec<Glyph>, StoreError> {
            Ok(self.0.clone())
        }

        async fn save(&self, _glyphs: &[Glyph]) -> Result<(), StoreError> {
            Ok(())
        }

        async fn backup(&self, _taken_at: NaiveDateTime) -> Result<BackupRecord, StoreError> {
            Err(StoreError::NothingToBackup)
        }

        async fn overwrite(&self, _content: &[u8]) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Delete { channel_id: u64, message_id: u64 },
        Transient { channel_id: u64, notice: Notice, ttl: Duration },
        RemoveReaction { message_id: u64, user_id: u64, glyph: String },
        Direct { user_id: u64, notice: Notice },
    }

    /// Records every call; each action can be told to fail.
    #[derive(Default)]
    struct FakeTransport {
        calls: Mutex<Vec<Call>>,
        fail_delete: Option<TransportError>,
        fail_transient: Option<TransportError>,
        fail_remove_reaction: Option<TransportError>,
        fail_direct: Option<TransportError>,
    }

    impl FakeTransport {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call, failure: &Option<TransportError>) -> Result<(), TransportError> {
            self.calls.lock().unwrap().push(call);
            match failure {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ModerationTransport for FakeTransport {
        async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), TransportError> {
            self.record(Call::Delete { channel_id, message_id }, &self.fail_delete)
        }

        async fn send_transient(
            &self,
            channel_id: u64,
            notice: Notice,
            ttl: Duration,
        ) -> Result<(), TransportError> {
            self.record(Call::Transient { channel_id, notice, ttl }, &self.fail_transient)
        }

        async fn remove_reaction(
            &self,
            _channel_id: u64,
            message_id: u64,
            user_id: u64,
            glyph: &str,
        ) -> Result<(), TransportError> {
            self.record(
                Call::RemoveReaction {
                    message_id,
                    user_id,
                    glyph: glyph.to_string(),
                },
                &self.fail_remove_reaction,
            )
        }

        async fn send_direct(&self, user_id: u64, notice: Notice) -> Result<(), TransportError> {
            self.record(Call::Direct { user_id, notice }, &self.fail_direct)
        }
    }

    async fn make_engine(custom: &[&str]) -> ModerationEngine<FixedStore> {
        let store = FixedStore(custom.iter().map(|g| g.to_string()).collect());
        let denylist = DenylistService::with_defaults(store, vec!["🇷🇺".into(), "🇺🇦".into()]).await;
        ModerationEngine::new(Arc::new(denylist))
    }

    fn message(content: &str) -> InboundMessage {
        InboundMessage {
            message_id: 10,
            channel_id: 20,
            author_id: 30,
            author_is_bot: false,
            content: content.to_string(),
        }
    }

    fn reaction(glyph: &str) -> InboundReaction {
        InboundReaction {
            message_id: 10,
            channel_id: 20,
            user_id: 30,
            user_is_bot: false,
            glyph: glyph.to_string(),
        }
    }

    #[tokio::test]
    async fn default_flag_in_message_is_deleted_and_warned() {
        let engine = make_engine(&[]).await;
        let transport = FakeTransport::default();

        let outcome = engine
            .handle_message(&transport, &message("hello 🇷🇺 world"))
            .await;

        assert_eq!(
            outcome,
            ModerationOutcome::Removed {
                glyph: "🇷🇺".to_string(),
                notice: NoticeRoute::Channel,
            }
        );
        let calls = transport.calls();
        assert_eq!(calls[0], Call::Delete { channel_id: 20, message_id: 10 });
        match &calls[1] {
            Call::Transient { channel_id, notice, ttl } => {
                assert_eq!(*channel_id, 20);
                assert_eq!(*ttl, Duration::from_secs(10));
                assert_eq!(notice.mention, Some(30));
                assert!(notice.title.is_some());
            }
            other => panic!("expected a transient warning, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn custom_glyph_in_message_is_deleted() {
        let engine = make_engine(&["😈"]).await;
        let transport = FakeTransport::default();

        let outcome = engine.handle_message(&transport, &message("hehe 😈")).await;

        assert!(matches!(outcome, ModerationOutcome::Removed { .. }));
        assert!(transport.calls().contains(&Call::Delete { channel_id: 20, message_id: 10 }));
    }

    #[tokio::test]
    async fn clean_message_is_left_alone() {
        let engine = make_engine(&["😈"]).await;
        let transport = FakeTransport::default();

        let outcome = engine.handle_message(&transport, &message("good morning ☀️")).await;

        assert_eq!(outcome, ModerationOutcome::Clean);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn bot_messages_and_reactions_are_exempt() {
        let engine = make_engine(&[]).await;
        let transport = FakeTransport::default();

        let mut msg = message("🇷🇺");
        msg.author_is_bot = true;
        let mut react = reaction("🇷🇺");
        react.user_is_bot = true;

        assert_eq!(engine.handle_message(&transport, &msg).await, ModerationOutcome::Exempt);
        assert_eq!(engine.handle_reaction(&transport, &react).await, ModerationOutcome::Exempt);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_skips_warning() {
        let engine = make_engine(&[]).await;
        let transport = FakeTransport {
            fail_delete: Some(TransportError::Forbidden("Missing Permissions".into())),
            ..Default::default()
        };

        let outcome = engine.handle_message(&transport, &message("🇷🇺")).await;

        assert_eq!(
            outcome,
            ModerationOutcome::RemovalFailed {
                glyph: "🇷🇺".to_string(),
                error: TransportError::Forbidden("Missing Permissions".into()),
            }
        );
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_warning_is_reported_not_raised() {
        let engine = make_engine(&[]).await;
        let transport = FakeTransport {
            fail_transient: Some(TransportError::Other("rate limited".into())),
            ..Default::default()
        };

        let outcome = engine.handle_message(&transport, &message("🇷🇺")).await;

        assert_eq!(
            outcome,
            ModerationOutcome::Removed {
                glyph: "🇷🇺".to_string(),
                notice: NoticeRoute::Undelivered(TransportError::Other("rate limited".into())),
            }
        );
    }

    #[tokio::test]
    async fn banned_reaction_is_removed_and_user_warned_privately() {
        let engine = make_engine(&[]).await;
        let transport = FakeTransport::default();

        let outcome = engine.handle_reaction(&transport, &reaction("🇺🇦")).await;

        assert_eq!(
            outcome,
            ModerationOutcome::Removed {
                glyph: "🇺🇦".to_string(),
                notice: NoticeRoute::Direct,
            }
        );
        let calls = transport.calls();
        assert_eq!(
            calls[0],
            Call::RemoveReaction {
                message_id: 10,
                user_id: 30,
                glyph: "🇺🇦".to_string(),
            }
        );
        assert!(matches!(calls[1], Call::Direct { user_id: 30, .. }));
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn blocked_dms_fall_back_to_public_notice() {
        let engine = make_engine(&[]).await;
        let transport = FakeTransport {
            fail_direct: Some(TransportError::Forbidden("Cannot send messages to this user".into())),
            ..Default::default()
        };

        let outcome = engine.handle_reaction(&transport, &reaction("🇺🇦")).await;

        assert_eq!(
            outcome,
            ModerationOutcome::Removed {
                glyph: "🇺🇦".to_string(),
                notice: NoticeRoute::ChannelFallback,
            }
        );
        match transport.calls().last() {
            Some(Call::Transient { channel_id, notice, ttl }) => {
                assert_eq!(*channel_id, 20);
                assert_eq!(*ttl, NOTICE_TTL);
                assert_eq!(notice.title, None);
                assert_eq!(notice.mention, Some(30));
            }
            other => panic!("expected a public fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn reaction_must_match_exactly() {
        let engine = make_engine(&["❤️"]).await;
        let transport = FakeTransport::default();

        // Bare heart without the variation selector is a different glyph.
        let outcome = engine.handle_reaction(&transport, &reaction("❤")).await;

        assert_eq!(outcome, ModerationOutcome::Clean);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_reaction_removal_skips_notices() {
        let engine = make_engine(&[]).await;
        let transport = FakeTransport {
            fail_remove_reaction: Some(TransportError::NotFound("Unknown Message".into())),
            ..Default::default()
        };

        let outcome = engine.handle_reaction(&transport, &reaction("🇺🇦")).await;

        assert!(matches!(outcome, ModerationOutcome::RemovalFailed { .. }));
        assert_eq!(transport.calls().len(), 1);
    }
}
