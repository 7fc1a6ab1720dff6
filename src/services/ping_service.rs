use std::time::{Duration, Instant};

use crate::context::BotContext;
use crate::models::PingMetrics;

pub fn get_ping_metrics(bot: &BotContext, start_time: Instant, response_latency: Duration) -> PingMetrics {
    PingMetrics {
        response_latency: response_latency.as_millis() as u64,
        response_roundtrip: start_time.elapsed().as_millis() as u64,
        uptime: format_uptime(bot.started_at.elapsed()),
    }
}

pub fn format_uptime(elapsed: Duration) -> String {
    let hours = elapsed.as_secs() / 3600;
    let minutes = (elapsed.as_secs() % 3600) / 60;
    let seconds = elapsed.as_secs() % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

pub fn create_ping_embed(metrics: &PingMetrics) -> serenity::builder::CreateEmbed {
    serenity::builder::CreateEmbed::default()
        .title("Pong! 🏓")
        .field("Response Latency", format!("{}ms", metrics.response_latency), true)
        .field("Response Roundtrip", format!("{}ms", metrics.response_roundtrip), true)
        .field("Uptime", &metrics.uptime, false)
        .color(0x00b0f4)
}
