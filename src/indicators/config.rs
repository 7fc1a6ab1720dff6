use serde::{Deserialize, Serialize};

use super::IndicatorError;

/// Spans and windows for the three indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub fast_span: usize,
    pub slow_span: usize,
    pub signal_span: usize,
    pub rsi_window: usize,
    pub ma_short_window: usize,
    pub ma_long_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            fast_span: 12,
            slow_span: 26,
            signal_span: 9,
            rsi_window: 14,
            ma_short_window: 9,
            ma_long_window: 21,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let sizes = [
            ("fast_span", self.fast_span),
            ("slow_span", self.slow_span),
            ("signal_span", self.signal_span),
            ("rsi_window", self.rsi_window),
            ("ma_short_window", self.ma_short_window),
            ("ma_long_window", self.ma_long_window),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, size)| *size == 0) {
            return Err(invalid(name, "must be at least 1"));
        }

        if self.fast_span >= self.slow_span {
            return Err(invalid("fast_span", "must be less than slow_span"));
        }
        if self.ma_short_window >= self.ma_long_window {
            return Err(invalid("ma_short_window", "must be less than ma_long_window"));
        }

        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> IndicatorError {
    IndicatorError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
