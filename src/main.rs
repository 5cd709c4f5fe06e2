// This is the entry point of the emoji guard bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON file store, liveness HTTP)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::BotConfig;
use crate::core::denylist::DenylistService;
use crate::core::moderation::ModerationEngine;
use crate::discord::commands::presence;
use crate::discord::moderation::events as moderation_events;
use crate::discord::{Data, Error};
use crate::infra::denylist::JsonDenylistStore;
use crate::infra::liveness;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// Every message and reaction goes through the moderation engine; a failure
/// in one event is logged and never stops the listener.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = moderation_events::handle_message(ctx, data, new_message).await {
                tracing::error!("Error moderating message: {}", e);
            }
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            if let Err(e) = moderation_events::handle_reaction(ctx, data, add_reaction).await {
                tracing::error!("Error moderating reaction: {}", e);
            }
        }

        _ => {}
    }

    Ok(())
}

/// Report command failures to the invoker instead of dropping them.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(command = %ctx.command().name, "Command failed: {}", error);
            if let Err(e) = ctx.say(format!("❌ Something went wrong: {}", error)).await {
                tracing::warn!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::warn!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // The liveness endpoint runs on its own and shares nothing with the bot.
    tokio::spawn(liveness::run_liveness_server(config.port));

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let denylist_store = JsonDenylistStore::new(&config.denylist_path, &config.backup_dir);
    let denylist_service = Arc::new(DenylistService::new(denylist_store).await);
    let moderation_engine = Arc::new(ModerationEngine::new(Arc::clone(&denylist_service)));

    // Create the data structure that will be shared across all commands
    let data = Data {
        denylist: Arc::clone(&denylist_service),
        moderation: Arc::clone(&moderation_engine),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT; // Required to read message content

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::denylist::add_emoji(),
                discord::commands::denylist::remove_emoji(),
                discord::commands::denylist::list_banned(),
                discord::commands::denylist::backup(),
                discord::commands::denylist::restore(),
                discord::commands::help::help(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!(bot = %ready.user.name, "Bot is ready");
                presence::on_ready(ctx);
                Ok(data)
            })
        })
        .build();

    let mut client = match serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Error creating client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.start().await {
        tracing::error!("Error running bot: {}", e);
        std::process::exit(1);
    }
}
