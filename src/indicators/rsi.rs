// Relative Strength Index
use crate::models::{IndicatorOutcome, PriceSeries, RsiResult};

/// RSI reported when the trailing window has neither gains nor losses.
pub const FLAT_MARKET_RSI: f64 = 50.0;

/// RSI at the most recent point, using simple averages of gains and losses
/// over the trailing `window` positions.
///
/// The first point has no predecessor and contributes neither a gain nor a
/// loss, so `window` points are enough for one full window.
pub fn compute_rsi(series: &PriceSeries, window: usize) -> IndicatorOutcome<RsiResult> {
    let window = window.max(1);
    if series.len() < window {
        return IndicatorOutcome::Insufficient {
            required: window,
            available: series.len(),
        };
    }

    let closes = series.closes();
    let start = closes.len() - window;

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in start.max(1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change; // losses are positive values
        }
    }

    let avg_gain = gains / window as f64;
    let avg_loss = losses / window as f64;

    IndicatorOutcome::Ready(RsiResult {
        value: rsi_from_averages(avg_gain, avg_loss),
    })
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return FLAT_MARKET_RSI;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
