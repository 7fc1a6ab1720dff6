pub mod clear;
pub mod help;
pub mod ping;
pub mod stock;

use serenity::all::CommandInteraction;
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::context::BotContext;
use crate::utils::user_facing_error;

/// Split a message into a lowercased command name and its arguments.
/// Returns None when the message does not start with the prefix.
pub fn parse_command<'a>(content: &'a str, prefix: &str) -> Option<(String, Vec<&'a str>)> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let command = parts.next()?.to_lowercase();
    Some((command, parts.collect()))
}

fn canonical_command(command: &str) -> Option<&'static str> {
    match command {
        "stock" | "s" => Some("stock"),
        "help" => Some("help"),
        "ping" => Some("ping"),
        "clear" | "purge" => Some("clear"),
        _ => None,
    }
}

async fn send_embed(ctx: &Context, msg: &Message, title: &str, description: String, color: u32) {
    let embed = serenity::builder::CreateEmbed::default()
        .title(title)
        .description(description)
        .color(color);

    if let Err(e) = msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
    {
        tracing::warn!("Failed to send '{}' embed: {}", title, e);
    }
}

pub async fn handle_message(ctx: &Context, msg: &Message, bot: &BotContext) {
    if msg.author.bot {
        return;
    }

    let (command, args) = match parse_command(&msg.content, bot.prefix()) {
        Some(parsed) => parsed,
        None => return,
    };
    let command = match canonical_command(&command) {
        Some(c) => c,
        None => return,
    };

    if let Err(wait_ms) = bot.limiter.check_global_rate_limit().await {
        tracing::warn!("Global rate limit hit, dropping '{}' from {} ({}ms left)", command, msg.author.id, wait_ms);
        return;
    }

    if let Err((remaining, should_warn)) = bot.limiter.check_cooldown(msg.author.id, command).await {
        tracing::debug!("{} is on cooldown for '{}' ({}s left)", msg.author.id, command, remaining);
        if should_warn {
            send_embed(
                ctx,
                msg,
                "Command Cooldown",
                format!("⏳ Please wait {} seconds before using this command again.", remaining),
                0xffa500,
            )
            .await;
        }
        return;
    }

    let result = match command {
        "stock" => stock::execute(ctx, msg, &args, bot).await,
        "help" => help::execute(ctx, msg, bot.prefix(), bot.limiter.cooldown_seconds()).await,
        "ping" => ping::execute(ctx, msg, bot).await,
        "clear" => clear::execute(ctx, msg, &args).await,
        _ => return,
    };

    if let Err(e) = result {
        tracing::error!("❌ Error executing command {}: {}", command, e);
        send_embed(ctx, msg, "Command Error", user_facing_error(&e), 0xff0000).await;
    }
}

pub async fn handle_interaction(ctx: &Context, command: &CommandInteraction, bot: &BotContext) {
    if command.data.name != "stock" {
        tracing::debug!("Ignoring unknown slash command '{}'", command.data.name);
        return;
    }

    if let Err(wait_ms) = bot.limiter.check_global_rate_limit().await {
        tracing::warn!("Global rate limit hit, dropping /stock from {} ({}ms left)", command.user.id, wait_ms);
        return;
    }

    if let Err((remaining, _)) = bot.limiter.check_cooldown(command.user.id, "stock").await {
        let text = format!("⏳ Please wait {} seconds before using this command again.", remaining);
        let response = serenity::builder::CreateInteractionResponse::Message(
            serenity::builder::CreateInteractionResponseMessage::new()
                .content(text)
                .ephemeral(true),
        );
        if let Err(e) = command.create_response(&ctx.http, response).await {
            tracing::warn!("Failed to send cooldown response: {}", e);
        }
        return;
    }

    if let Err(e) = stock::run_slash(ctx, command, bot).await {
        tracing::error!("❌ Error executing /stock: {}", e);
        let response = serenity::builder::CreateInteractionResponse::Message(
            serenity::builder::CreateInteractionResponseMessage::new()
                .content(user_facing_error(&e))
                .ephemeral(true),
        );
        // Already deferred: edit the pending response instead
        if command.create_response(&ctx.http, response).await.is_err() {
            let edit = serenity::builder::EditInteractionResponse::new().content(user_facing_error(&e));
            if let Err(e) = command.edit_response(&ctx.http, edit).await {
                tracing::warn!("Failed to report /stock error: {}", e);
            }
        }
    }
}
