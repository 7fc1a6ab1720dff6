use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::time::Instant;

use crate::context::BotContext;
use crate::services::ping_service;

pub async fn execute(ctx: &Context, msg: &Message, bot: &BotContext) -> Result<(), String> {
    let start_time = Instant::now();

    // Placeholder message gives us a real send latency to report
    let response = msg
        .channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default()
            .content("📊 Calculating metrics..."))
        .await
        .map_err(|e| e.to_string())?;
    let response_latency = start_time.elapsed();

    response.delete(ctx).await
        .map_err(|e| e.to_string())?;

    let metrics = ping_service::get_ping_metrics(bot, start_time, response_latency);
    let embed = ping_service::create_ping_embed(&metrics);

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
