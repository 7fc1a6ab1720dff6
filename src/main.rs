use serenity::all::{Command, Interaction};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{info, warn, error, debug};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod context;
mod indicators;
mod models;
mod services;
mod utils;

use config::Settings;
use context::BotContext;

const DEFAULT_LOG_FILTER: &str = "stock_signal_bot=debug,serenity=warn";

struct Handler {
    bot: Arc<BotContext>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg, &self.bot).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            commands::handle_interaction(&ctx, &command, &self.bot).await;
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        match Command::set_global_commands(&ctx.http, vec![commands::stock::register()]).await {
            Ok(registered) => debug!("Registered {} slash command(s)", registered.len()),
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("429") || error_msg.contains("rate limit") || error_msg.contains("Ratelimited") {
                    warn!("Rate limited while registering slash commands: {}", error_msg);
                } else {
                    warn!("Failed to register slash commands: {}", error_msg);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("🤖 Starting stock signal bot v{}...", env!("CARGO_PKG_VERSION"));

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!(
        "Prefix '{}', Yahoo at {}, indicators {:?}",
        settings.command_prefix, settings.yahoo_base_url, settings.indicators
    );

    let token = settings.discord_token.clone();
    let bot = match BotContext::new(settings) {
        Ok(b) => Arc::new(b),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&token, intents)
        .event_handler(Handler { bot })
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
