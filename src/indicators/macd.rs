// Moving Average Convergence Divergence
use super::moving_average::ewma;
use crate::models::{IndicatorOutcome, MacdResult, PriceSeries};

/// Last MACD line (`fast EMA - slow EMA`) and signal line (EMA of the MACD
/// line) values. Needs at least `slow_span` points.
pub fn compute_macd(
    series: &PriceSeries,
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
) -> IndicatorOutcome<MacdResult> {
    let required = slow_span.max(fast_span).max(1);
    if series.len() < required {
        return IndicatorOutcome::Insufficient {
            required,
            available: series.len(),
        };
    }

    let closes = series.closes();
    let fast = ewma(&closes, fast_span);
    let slow = ewma(&closes, slow_span);

    let macd_line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal_line = ewma(&macd_line, signal_span);

    match (macd_line.last(), signal_line.last()) {
        (Some(&macd), Some(&signal)) => IndicatorOutcome::Ready(MacdResult { macd, signal }),
        _ => IndicatorOutcome::Insufficient {
            required,
            available: series.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{constant, hourly, rising};
    use crate::models::MacdSignal;

    #[test]
    fn test_macd_insufficient_below_slow_span() {
        let outcome = compute_macd(&rising(25, 10.0, 1.0), 12, 26, 9);
        assert_eq!(outcome, IndicatorOutcome::Insufficient { required: 26, available: 25 });
    }

    #[test]
    fn test_macd_exactly_slow_span_points() {
        assert!(!compute_macd(&rising(26, 10.0, 1.0), 12, 26, 9).is_insufficient());
    }

    #[test]
    fn test_macd_constant_prices_are_zero() {
        let result = *compute_macd(&constant(30, 100.0), 12, 26, 9).value().unwrap();
        assert_eq!(result, MacdResult { macd: 0.0, signal: 0.0 });
        assert_eq!(result.recommendation(), MacdSignal::Neutral);
    }

    #[test]
    fn test_macd_uptrend_is_bullish() {
        let result = *compute_macd(&rising(26, 100.0, 1.0), 12, 26, 9).value().unwrap();
        assert!(result.macd > 0.0);
        assert!(result.macd > result.signal);
        assert_eq!(result.recommendation(), MacdSignal::Buy);
    }

    #[test]
    fn test_macd_downtrend_is_bearish() {
        let result = *compute_macd(&rising(40, 200.0, -2.0), 12, 26, 9).value().unwrap();
        assert!(result.macd < 0.0);
        assert_eq!(result.recommendation(), MacdSignal::Sell);
    }

    #[test]
    fn test_macd_matches_recurrence_on_small_spans() {
        // fast span 1 (alpha 1) tracks price, slow span 3 (alpha 0.5), signal span 1
        let series = hourly(&[10.0, 12.0, 11.0, 15.0]);
        let result = *compute_macd(&series, 1, 3, 1).value().unwrap();
        // slow: 10, 11, 11, 13 -> macd: 0, 1, 0, 2
        assert_eq!(result, MacdResult { macd: 2.0, signal: 2.0 });
    }

    #[test]
    fn test_macd_is_deterministic() {
        let series = hourly(&[
            101.3, 100.8, 102.4, 103.9, 103.1, 104.6, 102.2, 101.7, 103.3, 105.0, 106.2, 105.8,
            104.9, 106.6, 107.1, 108.4, 107.7, 106.9, 108.8, 110.2, 109.5, 111.0, 110.4, 112.3,
            111.8, 113.6, 112.9, 114.1,
        ]);
        let first = compute_macd(&series, 12, 26, 9);
        let second = compute_macd(&series, 12, 26, 9);
        let (a, b) = (first.value().unwrap(), second.value().unwrap());
        assert_eq!(a.macd.to_bits(), b.macd.to_bits());
        assert_eq!(a.signal.to_bits(), b.signal.to_bits());
    }
}
