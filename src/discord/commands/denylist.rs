// Discord commands for managing the emoji denylist.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result
//
// This layer is THIN - no business logic, just translation.
// Every command is admin-only; poise rejects everyone else before we run.

use crate::core::denylist::{
    ensure_json_extension, single_attachment, AddOutcome, DenylistError, DenylistService,
    RemoveOutcome,
};
use crate::core::moderation::ModerationEngine;
use crate::infra::denylist::JsonDenylistStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command and event.
pub struct Data {
    pub denylist: Arc<DenylistService<JsonDenylistStore>>,
    pub moderation: Arc<ModerationEngine<JsonDenylistStore>>,
}

const SUCCESS_COLOR: u32 = 0x2ECC71;
const LIST_COLOR: u32 = 0x3498DB;
// Discord caps embed descriptions at 4096 characters.
const MAX_DESCRIPTION_LEN: usize = 4000;

/// Add an emoji to the banned list.
#[poise::command(
    prefix_command,
    rename = "add-emoji",
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn add_emoji(
    ctx: Context<'_>,
    #[description = "Emoji to ban"] emoji: String,
) -> Result<(), Error> {
    match ctx.data().denylist.add(&emoji).await {
        Ok(AddOutcome::AlreadyPresent) => {
            ctx.say(format!("Emoji {} is already in the list!", emoji))
                .await?;
        }
        Ok(AddOutcome::Added) => {
            let embed = serenity::CreateEmbed::new()
                .title("✅ Emoji added")
                .description(format!("Emoji {} added to the banned list", emoji))
                .color(SUCCESS_COLOR);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => reply_failure(ctx, &e).await?,
    }
    Ok(())
}

/// Remove an emoji from the banned list.
#[poise::command(
    prefix_command,
    rename = "remove-emoji",
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn remove_emoji(
    ctx: Context<'_>,
    #[description = "Emoji to allow again"] emoji: String,
) -> Result<(), Error> {
    match ctx.data().denylist.remove(&emoji).await {
        Ok(RemoveOutcome::NotFound) => {
            ctx.say(format!("Emoji {} not found!", emoji)).await?;
        }
        Ok(RemoveOutcome::Removed) => {
            let embed = serenity::CreateEmbed::new()
                .title("✅ Emoji removed")
                .description(format!("Emoji {} removed from the banned list", emoji))
                .color(SUCCESS_COLOR);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => reply_failure(ctx, &e).await?,
    }
    Ok(())
}

/// Show every banned emoji, built-in and custom.
#[poise::command(
    prefix_command,
    rename = "list-banned",
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn list_banned(ctx: Context<'_>) -> Result<(), Error> {
    let listing = ctx.data().denylist.listing().await;
    if listing.is_empty() {
        ctx.say("The list is empty!").await?;
        return Ok(());
    }

    // One message per page: Discord caps the combined size of a message's embeds.
    for (title, description) in listing_pages(&listing) {
        let embed = serenity::CreateEmbed::new()
            .title(title)
            .description(description)
            .color(LIST_COLOR);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
    }

    Ok(())
}

/// Save a timestamped copy of the denylist file and attach it.
#[poise::command(prefix_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn backup(ctx: Context<'_>) -> Result<(), Error> {
    let record = match ctx.data().denylist.backup().await {
        Ok(record) => record,
        Err(e) => return reply_failure(ctx, &e).await,
    };

    let attachment = serenity::CreateAttachment::path(&record.path).await?;
    let embed = serenity::CreateEmbed::new()
        .title("💾 Backup created")
        .description(format!("Saved as `{}`", record.file_name))
        .color(SUCCESS_COLOR);

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .attachment(attachment),
    )
    .await?;
    Ok(())
}

/// Replace the denylist with an attached `.json` backup.
#[poise::command(prefix_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn restore(ctx: Context<'_>) -> Result<(), Error> {
    let attachments = match ctx {
        poise::Context::Prefix(prefix) => prefix.msg.attachments.clone(),
        poise::Context::Application(_) => Vec::new(),
    };

    let attachment = match single_attachment(&attachments)
        .and_then(|a| ensure_json_extension(&a.filename).map(|()| a))
    {
        Ok(attachment) => attachment,
        Err(e) => return reply_failure(ctx, &e).await,
    };

    let content = match attachment.download().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(file = %attachment.filename, "Failed to download backup: {}", e);
            ctx.say(format!("❌ Failed to download `{}`: {}", attachment.filename, e))
                .await?;
            return Ok(());
        }
    };

    match ctx
        .data()
        .denylist
        .restore(&attachment.filename, &content)
        .await
    {
        Ok(count) => {
            let embed = serenity::CreateEmbed::new()
                .title("♻️ Denylist restored")
                .description(format!(
                    "Loaded {} custom emoji from `{}`",
                    count, attachment.filename
                ))
                .color(SUCCESS_COLOR);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => reply_failure(ctx, &e).await?,
    }
    Ok(())
}

/// Tell the invoking admin what went wrong. Storage failures are also logged.
async fn reply_failure(ctx: Context<'_>, error: &DenylistError) -> Result<(), Error> {
    if let DenylistError::Store(e) = error {
        tracing::error!(command = %ctx.command().name, "Denylist storage failure: {}", e);
    }
    ctx.say(format!("❌ {}", error)).await?;
    Ok(())
}

/// Group lines so each group joined by newlines stays within `limit` bytes.
/// Title and description for each message of a listing.
fn listing_pages(listing: &[String]) -> Vec<(String, String)> {
    chunk_lines(listing, MAX_DESCRIPTION_LEN)
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let title = if i == 0 {
                "📋 Banned emoji"
            } else {
                "📋 Banned emoji (cont.)"
            };
            (title.to_string(), chunk.join("\n"))
        })
        .collect()
}

fn chunk_lines(lines: &[String], limit: usize) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current_chunk = Vec::new();
    let mut current_length = 0;

    for line in lines {
        let line_len = line.len();
        if !current_chunk.is_empty() && current_length + line_len + 1 > limit {
            chunks.push(current_chunk);
            current_chunk = Vec::new();
            current_length = 0;
        }

        current_chunk.push(line.clone());
        current_length += line_len + 1; // +1 for newline
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    chunks
}
