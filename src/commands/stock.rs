use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption,
    EditInteractionResponse, ResolvedOption, ResolvedValue,
};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::api::yahoo::{Interval, Range};
use crate::context::BotContext;
use crate::services::stock_service;

/// Parsed arguments of a stock request
#[derive(Debug, Clone, PartialEq)]
pub struct StockRequest {
    pub ticker: String,
    pub range: Range,
    pub interval: Interval,
}

impl StockRequest {
    pub fn parse(ticker: &str, range: Option<&str>, interval: Option<&str>) -> Result<Self, String> {
        let range = match range {
            Some(r) => r.parse::<Range>().map_err(|e| format!("❌ {}", e))?,
            None => Range::default(),
        };
        let interval = match interval {
            Some(i) => i.parse::<Interval>().map_err(|e| format!("❌ {}", e))?,
            None => Interval::default(),
        };

        Ok(Self {
            ticker: ticker.to_string(),
            range,
            interval,
        })
    }

    /// `<TICKER> [range] [interval]`
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        match args {
            [] => Err("❌ Usage: `stock <TICKER> [range] [interval]`".to_string()),
            [ticker] => Self::parse(ticker, None, None),
            [ticker, range] => Self::parse(ticker, Some(*range), None),
            [ticker, range, interval] => Self::parse(ticker, Some(*range), Some(*interval)),
            _ => Err("❌ Too many arguments. Usage: `stock <TICKER> [range] [interval]`".to_string()),
        }
    }
}

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str], bot: &BotContext) -> Result<(), String> {
    tracing::info!("📈 Stock command called by {} with args: {:?}", msg.author.id, args);

    if args.is_empty() || args[0].eq_ignore_ascii_case("help") {
        let prefix = bot.prefix();
        let help_embed = serenity::builder::CreateEmbed::default()
            .title("📈 Stock Command")
            .description("MACD, RSI and moving-average crossover signals for a ticker")
            .field("Usage", format!("`{}stock <TICKER> [range] [interval]`", prefix), false)
            .field("Examples",
                format!("`{p}stock AAPL` (1 month of hourly bars)\n\
                         `{p}stock MSFT 3mo 1d` (3 months of daily bars)\n\
                         `{p}s ^GSPC` (alias)", p = prefix),
                false)
            .field("Ranges", "1d, 5d, 1mo, 3mo, 6mo, 1y", true)
            .field("Intervals", "5m, 15m, 30m, 1h, 1d, 1wk", true)
            .field("Signals",
                "• MACD above its signal line → Buy, below → Sell\n\
                 • RSI above 70 → Overbought, below 30 → Oversold\n\
                 • Short MA crossing the long MA → Bullish / Bearish",
                false)
            .color(0x00ff00);

        msg.channel_id
            .send_message(ctx, serenity::builder::CreateMessage::default().embed(help_embed))
            .await
            .map_err(|e| e.to_string())?;
        return Ok(());
    }

    let request = StockRequest::from_args(args)?;

    if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    let analysis = stock_service::analyze_ticker(
        &bot.yahoo,
        &bot.settings.indicators,
        &request.ticker,
        request.range,
        request.interval,
    )
    .await
    .map_err(|e| e.to_string())?;

    tracing::info!("✓ Analysed {} ({} points)", analysis.ticker, analysis.points);

    let embed = stock_service::create_stock_embed(&analysis, request.range, request.interval);
    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// `/stock` slash command definition
pub fn register() -> CreateCommand {
    CreateCommand::new("stock")
        .description("Get stock MACD, RSI and MA crossover signals for a ticker")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "ticker", "Ticker symbol, e.g. AAPL")
                .required(true),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "range", "History to analyse: 1d, 5d, 1mo, 3mo, 6mo, 1y")
                .required(false),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "interval", "Bar size: 5m, 15m, 30m, 1h, 1d, 1wk")
                .required(false),
        )
}

fn string_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find(|o| o.name == name).and_then(|o| match &o.value {
        ResolvedValue::String(s) => Some(*s),
        _ => None,
    })
}

/// Answer a `/stock` interaction; the response is deferred because the fetch
/// can outlast Discord's three second acknowledgement window
pub async fn run_slash(ctx: &Context, command: &CommandInteraction, bot: &BotContext) -> Result<(), String> {
    let options = command.data.options();
    let ticker = string_option(&options, "ticker").unwrap_or_default();
    tracing::info!("📈 /stock called by {} for '{}'", command.user.id, ticker);

    let request = StockRequest::parse(
        ticker,
        string_option(&options, "range"),
        string_option(&options, "interval"),
    )?;

    command.defer(&ctx.http).await.map_err(|e| e.to_string())?;

    let content = match stock_service::analyze_ticker(
        &bot.yahoo,
        &bot.settings.indicators,
        &request.ticker,
        request.range,
        request.interval,
    )
    .await
    {
        Ok(analysis) => stock_service::format_report(&analysis),
        Err(e) => e.to_string(),
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args_defaults() {
        let request = StockRequest::from_args(&["aapl"]).unwrap();
        assert_eq!(request.ticker, "aapl");
        assert_eq!(request.range, Range::OneMonth);
        assert_eq!(request.interval, Interval::OneHour);
    }

    #[test]
    fn test_from_args_with_range_and_interval() {
        let request = StockRequest::from_args(&["MSFT", "3mo", "1d"]).unwrap();
        assert_eq!(request.range, Range::ThreeMonths);
        assert_eq!(request.interval, Interval::OneDay);
    }

    #[test]
    fn test_from_args_errors() {
        assert!(StockRequest::from_args(&[]).is_err());
        assert!(StockRequest::from_args(&["AAPL", "1mo", "1h", "extra"]).is_err());
        let err = StockRequest::from_args(&["AAPL", "10y"]).unwrap_err();
        assert!(err.starts_with("❌ Unknown range"), "unexpected error: {}", err);
    }
}
