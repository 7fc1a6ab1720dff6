use serenity::builder::CreateEmbed;
use serenity::model::channel::Message;
use serenity::prelude::Context;

pub fn create_help_embed(prefix: &str, cooldown_seconds: u64) -> CreateEmbed {
    CreateEmbed::default()
        .title("📖 Stock Signal Bot Help")
        .description("Technical-analysis signals (MACD, RSI, moving-average crossover) for stock tickers.\nPrices come from Yahoo Finance. Signals are informational, not financial advice.")
        .color(0x00b0f4)
        .field(
            "🎯 General",
            format!("`{p}ping` - Check bot latency\n`{p}help` - Show this help message", p = prefix),
            false,
        )
        .field(
            "📈 Stocks",
            format!(
                "`{p}stock <TICKER> [range] [interval]` - Analyse a ticker (alias `{p}s`)\n`/stock ticker:<TICKER>` - Same analysis as plain text",
                p = prefix
            ),
            false,
        )
        .field(
            "🧹 Moderation",
            format!("`{}clear <1-99>` - Delete recent messages (Admin/Moderator)", prefix),
            false,
        )
        .field(
            "⚡ Rate Limiting",
            format!("{}-second cooldown per command per user\nGlobal 50 requests/second limit", cooldown_seconds),
            false,
        )
}

pub async fn execute(ctx: &Context, msg: &Message, prefix: &str, cooldown_seconds: u64) -> Result<(), String> {
    let embed = create_help_embed(prefix, cooldown_seconds);

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
