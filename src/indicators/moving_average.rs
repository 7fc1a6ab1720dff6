//! Moving averages shared by the indicators

/// Exponentially weighted moving average with `alpha = 2 / (span + 1)`,
/// seeded with the first value (no warm-up period).
pub fn ewma(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut results = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;

    for &value in values {
        // prev + a*(x - prev) == a*x + (1-a)*prev, but keeps a constant input exact
        let ema = match previous {
            None => value,
            Some(prev) => prev + alpha * (value - prev),
        };
        results.push(ema);
        previous = Some(ema);
    }
    results
}

/// Simple moving average over a trailing window.
///
/// The first `window - 1` positions have no full window and are `None`.
/// Each mean is taken from its own window, and a window of identical values
/// yields that value exactly, so averages of different lengths over a flat
/// stretch compare equal.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let mut results = vec![None; window - 1];
    results.extend(values.windows(window).map(|slice| Some(window_mean(slice))));
    results
}

fn window_mean(slice: &[f64]) -> f64 {
    let first = slice[0];
    if slice.iter().all(|&v| v == first) {
        return first;
    }
    slice.iter().sum::<f64>() / slice.len() as f64
}
