// Short/long simple moving average crossover
use super::moving_average::sma;
use crate::models::{Crossover, IndicatorOutcome, MaCrossoverResult, PriceSeries};

/// Crossover state on the last two points where both averages are defined.
///
/// Bullish when the short average moves from at-or-below to strictly above
/// the long one, Bearish for the mirror case, None otherwise.
pub fn compute_ma_crossover(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> IndicatorOutcome<MaCrossoverResult> {
    let required = short_window.max(long_window).max(1) + 1;
    let insufficient = IndicatorOutcome::Insufficient {
        required,
        available: series.len(),
    };

    let closes = series.closes();
    let defined: Vec<(f64, f64)> = sma(&closes, short_window)
        .into_iter()
        .zip(sma(&closes, long_window))
        .filter_map(|pair| match pair {
            (Some(short), Some(long)) => Some((short, long)),
            _ => None,
        })
        .collect();

    if defined.len() < 2 {
        return insufficient;
    }

    let (prev_short, prev_long) = defined[defined.len() - 2];
    let (short, long) = defined[defined.len() - 1];

    let crossover = if prev_short <= prev_long && short > long {
        Crossover::Bullish
    } else if prev_short >= prev_long && short < long {
        Crossover::Bearish
    } else {
        Crossover::None
    };

    IndicatorOutcome::Ready(MaCrossoverResult {
        crossover,
        prev_short,
        prev_long,
        short,
        long,
    })
}
