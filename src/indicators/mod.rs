//! Technical indicator engine
//!
//! Pure functions over a [`PriceSeries`]: no I/O, no shared state, linear in
//! the length of the series. Each computation reports
//! [`IndicatorOutcome::Insufficient`] instead of a number when the series is
//! too short for its window.

pub mod config;
pub mod crossover;
pub mod macd;
pub mod moving_average;
pub mod rsi;

use thiserror::Error;

use crate::models::{AnalysisReport, IndicatorOutcome, PriceSeries};

pub use config::IndicatorConfig;
pub use crossover::compute_ma_crossover;
pub use macd::compute_macd;
pub use rsi::compute_rsi;

/// Errors raised before any indicator value is produced
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Malformed price series: {0}")]
    MalformedSeries(String),
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Run all three indicators against the same series snapshot
pub fn analyze(series: &PriceSeries, config: &IndicatorConfig) -> AnalysisReport {
    let macd = compute_macd(series, config.fast_span, config.slow_span, config.signal_span);
    let rsi = compute_rsi(series, config.rsi_window);
    let ma_crossover = compute_ma_crossover(series, config.ma_short_window, config.ma_long_window);

    log_insufficient("MACD", &macd);
    log_insufficient("RSI", &rsi);
    log_insufficient("MA crossover", &ma_crossover);

    AnalysisReport {
        macd,
        rsi,
        ma_crossover,
    }
}

fn log_insufficient<T>(name: &str, outcome: &IndicatorOutcome<T>) {
    if let IndicatorOutcome::Insufficient { required, available } = outcome {
        tracing::debug!("{} skipped: need {} points, have {}", name, required, available);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::{Crossover, MacdSignal};

    #[test]
    fn test_analyze_flat_market() {
        let report = analyze(&constant(30, 100.0), &IndicatorConfig::default());

        let macd = report.macd.value().unwrap();
        assert_eq!(macd.macd, 0.0);
        assert_eq!(macd.signal, 0.0);
        assert_eq!(macd.recommendation(), MacdSignal::Neutral);
        assert_eq!(report.rsi.value().unwrap().value, 50.0);
        assert_eq!(report.ma_crossover.value().unwrap().crossover, Crossover::None);
    }

    #[test]
    fn test_analyze_rising_series() {
        // 26 points from 100 to 125
        let report = analyze(&rising(26, 100.0, 1.0), &IndicatorConfig::default());

        let macd = report.macd.value().unwrap();
        assert!(macd.macd > 0.0);
        assert_eq!(macd.recommendation(), MacdSignal::Buy);
        assert!(report.rsi.value().unwrap().value > 50.0);
    }

    #[test]
    fn test_analyze_short_series_is_insufficient_everywhere() {
        let report = analyze(&rising(10, 100.0, 0.5), &IndicatorConfig::default());

        assert_eq!(report.macd, IndicatorOutcome::Insufficient { required: 26, available: 10 });
        assert_eq!(report.rsi, IndicatorOutcome::Insufficient { required: 14, available: 10 });
        assert_eq!(
            report.ma_crossover,
            IndicatorOutcome::Insufficient { required: 22, available: 10 }
        );
    }

    #[test]
    fn test_analyze_empty_series() {
        let report = analyze(&PriceSeries::empty(), &IndicatorConfig::default());
        assert!(report.macd.is_insufficient());
        assert!(report.rsi.is_insufficient());
        assert!(report.ma_crossover.is_insufficient());
    }
}
