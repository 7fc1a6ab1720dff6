use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::yahoo::{ApiError, Interval, Range, YahooClient};
use crate::indicators::{self, IndicatorConfig, IndicatorError};
use crate::models::{IndicatorOutcome, MacdSignal, PriceSeries, StockAnalysis};

#[derive(Debug, Error)]
pub enum StockError {
    #[error("❌ Invalid ticker: {0}")]
    InvalidTicker(String),
    #[error("❌ Price data for {ticker} is unusable: {source}")]
    Malformed {
        ticker: String,
        source: IndicatorError,
    },
}

/// Fetch one price series for `ticker` and run every indicator over it.
///
/// Upstream failures (timeouts, unknown symbols, server errors) are logged
/// and treated as "no data"; only a bad ticker or a malformed series is an
/// error.
pub async fn analyze_ticker(
    client: &YahooClient,
    config: &IndicatorConfig,
    ticker: &str,
    range: Range,
    interval: Interval,
) -> Result<StockAnalysis, StockError> {
    let ticker = match YahooClient::normalize_ticker(ticker) {
        Ok(t) => t,
        Err(ApiError::InvalidTicker(reason)) => return Err(StockError::InvalidTicker(reason)),
        Err(e) => return Err(StockError::InvalidTicker(e.to_string())),
    };

    let series = match client.fetch_series(&ticker, range, interval).await {
        Ok(series) => series,
        Err(ApiError::MalformedSeries(source)) => {
            warn!("Malformed series for {}: {}", ticker, source);
            return Err(StockError::Malformed { ticker, source });
        }
        Err(ApiError::InvalidTicker(msg)) => return Err(StockError::InvalidTicker(msg)),
        Err(e) => {
            warn!("Price fetch for {} failed, treating as no data: {}", ticker, e);
            PriceSeries::empty()
        }
    };

    Ok(build_analysis(ticker, &series, config))
}

/// Run the indicator engine over an already fetched series
pub fn build_analysis(ticker: String, series: &PriceSeries, config: &IndicatorConfig) -> StockAnalysis {
    if series.is_empty() {
        debug!("No closes for {}, skipping indicators", ticker);
    }
    let report = indicators::analyze(series, config);
    let last = series.last();

    let analysis = StockAnalysis {
        ticker,
        points: series.len(),
        last_close: last.map(|p| p.close),
        as_of: last.map(|p| p.timestamp),
        report,
    };

    if let Ok(json) = serde_json::to_string(&analysis.report) {
        debug!("Analysis for {}: {}", analysis.ticker, json);
    }
    analysis
}

/// Render the analysis as the plain text recommendation.
///
/// Values are rounded with `{:.2}`, i.e. from the exact binary value, so
/// 1.005 (stored as 1.00499...) prints as "1.00".
pub fn format_report(analysis: &StockAnalysis) -> String {
    if !analysis.has_data() {
        return format!("Could not fetch enough data for {}. Try again later.", analysis.ticker);
    }

    let report = &analysis.report;

    let macd_line = match &report.macd {
        IndicatorOutcome::Ready(macd) => format!(
            "MACD: {:.2} - Signal Line: {:.2} - Signal: {}",
            macd.macd,
            macd.signal,
            macd.recommendation()
        ),
        IndicatorOutcome::Insufficient { required, available } => {
            not_enough_data("MACD", *required, *available)
        }
    };

    let rsi_line = match &report.rsi {
        IndicatorOutcome::Ready(rsi) => format!("RSI: {:.2} - Signal: {}", rsi.value, rsi.zone()),
        IndicatorOutcome::Insufficient { required, available } => {
            not_enough_data("RSI", *required, *available)
        }
    };

    let crossover_line = match &report.ma_crossover {
        IndicatorOutcome::Ready(ma) => format!("Ma Crossover: {}", ma.crossover),
        IndicatorOutcome::Insufficient { required, available } => {
            not_enough_data("Ma Crossover", *required, *available)
        }
    };

    format!(
        "Stock: {}\n{}\n{}\n{}",
        analysis.ticker, macd_line, rsi_line, crossover_line
    )
}

fn not_enough_data(label: &str, required: usize, available: usize) -> String {
    format!("{}: not enough data (need {} points, have {})", label, required, available)
}

pub fn create_stock_embed(analysis: &StockAnalysis, range: Range, interval: Interval) -> CreateEmbed {
    let color = match analysis.report.macd.value().map(|m| m.recommendation()) {
        Some(MacdSignal::Buy) => 0x00ff00,
        Some(MacdSignal::Sell) => 0xff0000,
        _ => 0x99aab5,
    };

    let mut footer = format!("{} points · range {} · interval {}", analysis.points, range, interval);
    if let (Some(close), Some(as_of)) = (analysis.last_close, analysis.as_of) {
        footer.push_str(&format!(" · last close {:.2} at {}", close, as_of.format("%Y-%m-%d %H:%M UTC")));
    }

    CreateEmbed::default()
        .title("📈 Stock Signals")
        .description(format_report(analysis))
        .footer(CreateEmbedFooter::new(footer))
        .color(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{constant, rising};
    use crate::models::{
        AnalysisReport, Crossover, MaCrossoverResult, MacdResult, RsiResult,
    };

    fn analysis_with(report: AnalysisReport) -> StockAnalysis {
        StockAnalysis {
            ticker: "TEST".to_string(),
            points: 60,
            last_close: Some(100.0),
            as_of: None,
            report,
        }
    }

    #[test]
    fn test_report_for_flat_market() {
        let analysis = build_analysis("FLAT".to_string(), &constant(30, 100.0), &IndicatorConfig::default());
        assert_eq!(
            format_report(&analysis),
            "Stock: FLAT\n\
             MACD: 0.00 - Signal Line: 0.00 - Signal: Neutral\n\
             RSI: 50.00 - Signal: Neutral\n\
             Ma Crossover: None"
        );
    }

    #[test]
    fn test_report_for_rising_series() {
        let analysis = build_analysis("UP".to_string(), &rising(26, 100.0, 1.0), &IndicatorConfig::default());
        let text = format_report(&analysis);
        assert!(text.starts_with("Stock: UP\nMACD: "));
        assert!(text.contains("Signal: Buy (Bullish crossover)"));
        assert!(text.contains("RSI: 100.00 - Signal: Overbought"));
        // 26 points is not enough for the 21-point average crossover
        assert!(text.ends_with("Ma Crossover: not enough data (need 22 points, have 26)"));
    }

    #[test]
    fn test_report_for_short_series() {
        let analysis = build_analysis("TINY".to_string(), &rising(10, 5.0, 0.1), &IndicatorConfig::default());
        assert_eq!(
            format_report(&analysis),
            "Stock: TINY\n\
             MACD: not enough data (need 26 points, have 10)\n\
             RSI: not enough data (need 14 points, have 10)\n\
             Ma Crossover: not enough data (need 22 points, have 10)"
        );
    }

    #[test]
    fn test_report_without_data() {
        let analysis = build_analysis("NODATA".to_string(), &PriceSeries::empty(), &IndicatorConfig::default());
        assert_eq!(
            format_report(&analysis),
            "Could not fetch enough data for NODATA. Try again later."
        );
    }

    #[test]
    fn test_report_labels_and_rounding() {
        let analysis = analysis_with(AnalysisReport {
            macd: IndicatorOutcome::Ready(MacdResult { macd: 1.005, signal: 2.675 }),
            rsi: IndicatorOutcome::Ready(RsiResult { value: 12.3456 }),
            ma_crossover: IndicatorOutcome::Ready(MaCrossoverResult {
                crossover: Crossover::Bearish,
                prev_short: 10.0,
                prev_long: 9.0,
                short: 8.0,
                long: 9.5,
            }),
        });
        // 1.005 and 2.675 are stored just below the tie and round down
        assert_eq!(
            format_report(&analysis),
            "Stock: TEST\n\
             MACD: 1.00 - Signal Line: 2.67 - Signal: Sell (Bearish crossover)\n\
             RSI: 12.35 - Signal: Oversold\n\
             Ma Crossover: Bearish"
        );
    }

    #[test]
    fn test_report_bullish_crossover_label() {
        let analysis = analysis_with(AnalysisReport {
            macd: IndicatorOutcome::Insufficient { required: 26, available: 20 },
            rsi: IndicatorOutcome::Ready(RsiResult { value: 75.0 }),
            ma_crossover: IndicatorOutcome::Ready(MaCrossoverResult {
                crossover: Crossover::Bullish,
                prev_short: 9.0,
                prev_long: 9.0,
                short: 10.0,
                long: 9.5,
            }),
        });
        let text = format_report(&analysis);
        assert!(text.contains("RSI: 75.00 - Signal: Overbought"));
        assert!(text.ends_with("Ma Crossover: Bullish"));
    }
}
