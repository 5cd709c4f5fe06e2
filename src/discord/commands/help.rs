use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

struct CommandMetadata {
    priority: i32,
    usage: &'static str,
    note: Option<&'static str>,
}

fn get_command_metadata(name: &str) -> CommandMetadata {
    match name {
        "add-emoji" => CommandMetadata {
            priority: 100,
            usage: "add-emoji <emoji>",
            note: None,
        },
        "remove-emoji" => CommandMetadata {
            priority: 90,
            usage: "remove-emoji <emoji>",
            note: Some("Built-in emoji can't be removed."),
        },
        "list-banned" => CommandMetadata {
            priority: 80,
            usage: "list-banned",
            note: None,
        },
        "backup" => CommandMetadata {
            priority: 70,
            usage: "backup",
            note: None,
        },
        "restore" => CommandMetadata {
            priority: 60,
            usage: "restore",
            note: Some("Attach exactly one `.json` backup file to the message."),
        },
        _ => CommandMetadata {
            priority: 0,
            usage: "",
            note: None,
        },
    }
}

/// Show the admin command guide.
#[poise::command(prefix_command, guild_only)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = ctx.prefix();
    let mut entries: Vec<(i32, String)> = Vec::new();

    for command in &ctx.framework().options().commands {
        if command.name == "help" || command.hide_in_help {
            continue;
        }

        let metadata = get_command_metadata(&command.name);
        let usage = if metadata.usage.is_empty() {
            command.name.as_str()
        } else {
            metadata.usage
        };
        let description = command
            .description
            .as_deref()
            .unwrap_or("No description provided.");

        let mut entry = format!("• **{}{}** - {}", prefix, usage, description);
        if let Some(note) = metadata.note {
            entry.push_str(&format!("\n  ⤷ {}", note));
        }

        entries.push((metadata.priority, entry));
    }

    // Sort by priority (descending), then name (ascending)
    entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    let lines: Vec<String> = entries.into_iter().map(|(_, s)| s).collect();

    let embed = serenity::CreateEmbed::new()
        .title("🛡️ Emoji Guard Commands")
        .description(
            "Messages and reactions with banned emoji are removed automatically. \
            These commands manage the list and require the Administrator permission.",
        )
        .field("Commands", lines.join("\n"), false)
        .color(serenity::Colour::from_rgb(88, 101, 242))
        .footer(serenity::CreateEmbedFooter::new(
            "Need a hand? Ping a moderator.",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_help_mentions_the_attachment() {
        let metadata = get_command_metadata("restore");
        assert!(metadata.note.unwrap_or_default().contains(".json"));
    }

    #[test]
    fn admin_commands_outrank_unknown_ones() {
        for name in ["add-emoji", "remove-emoji", "list-banned", "backup", "restore"] {
            assert!(get_command_metadata(name).priority > get_command_metadata("other").priority);
        }
    }
}
