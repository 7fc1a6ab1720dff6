use serenity::builder::{CreateEmbed, CreateMessage, GetMessages};
use serenity::model::channel::Message;
use serenity::model::id::MessageId;
use serenity::prelude::Context;
use std::time::Duration;

use crate::utils::check_user_roles;

const MAX_CLEAR: u8 = 99;
const CONFIRMATION_TTL: Duration = Duration::from_secs(5);

/// Parse the message count; the command message itself is deleted too, so the
/// bulk request stays within Discord's limit of 100
pub fn parse_count(args: &[&str]) -> Result<u8, String> {
    let raw = args
        .first()
        .ok_or_else(|| format!("Usage: `clear <1-{}>`", MAX_CLEAR))?;

    match raw.parse::<u8>() {
        Ok(n) if (1..=MAX_CLEAR).contains(&n) => Ok(n),
        _ => Err(format!("Amount must be a number between 1 and {}", MAX_CLEAR)),
    }
}

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    let guild_id = msg.guild_id.ok_or("This command can only be used in a server")?;
    check_user_roles(ctx, guild_id, msg.author.id, &["Admin", "Moderator"]).await?;

    let count = parse_count(args)?;

    let messages = msg
        .channel_id
        .messages(ctx, GetMessages::new().before(msg.id).limit(count))
        .await
        .map_err(|e| format!("Failed to fetch messages: {}", e))?;

    let mut ids: Vec<MessageId> = messages.iter().map(|m| m.id).collect();
    let deleted = ids.len();
    ids.push(msg.id);

    msg.channel_id
        .delete_messages(&ctx.http, ids)
        .await
        .map_err(|e| format!("Failed to delete messages (they may be older than 14 days): {}", e))?;

    tracing::info!("🧹 {} cleared {} messages in channel {}", msg.author.id, deleted, msg.channel_id);

    let confirmation = msg
        .channel_id
        .send_message(
            ctx,
            CreateMessage::default().embed(
                CreateEmbed::default()
                    .description(format!("🧹 Deleted {} message(s).", deleted))
                    .color(0x00ff00),
            ),
        )
        .await
        .map_err(|e| e.to_string())?;

    let http = ctx.http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(CONFIRMATION_TTL).await;
        if let Err(e) = confirmation.channel_id.delete_message(&http, confirmation.id).await {
            tracing::debug!("Failed to delete clear confirmation: {}", e);
        }
    });

    Ok(())
}
