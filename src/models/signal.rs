//! Indicator result models

use serde::Serialize;
use std::fmt;

/// Outcome of a single indicator computation.
///
/// Running short on history is an ordinary result, not an error, so callers
/// have to handle it before they can get at a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IndicatorOutcome<T> {
    Ready(T),
    Insufficient { required: usize, available: usize },
}

impl<T> IndicatorOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            IndicatorOutcome::Ready(value) => Some(value),
            IndicatorOutcome::Insufficient { .. } => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, IndicatorOutcome::Insufficient { .. })
    }
}

/// Last MACD line and signal line values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
}

impl MacdResult {
    pub fn recommendation(&self) -> MacdSignal {
        if self.macd > self.signal {
            MacdSignal::Buy
        } else if self.macd < self.signal {
            MacdSignal::Sell
        } else {
            MacdSignal::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MacdSignal {
    Buy,
    Sell,
    Neutral,
}

impl fmt::Display for MacdSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacdSignal::Buy => write!(f, "Buy (Bullish crossover)"),
            MacdSignal::Sell => write!(f, "Sell (Bearish crossover)"),
            MacdSignal::Neutral => write!(f, "Neutral"),
        }
    }
}

/// RSI at the most recent index, always within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RsiResult {
    pub value: f64,
}

impl RsiResult {
    pub const OVERBOUGHT: f64 = 70.0;
    pub const OVERSOLD: f64 = 30.0;

    pub fn zone(&self) -> RsiZone {
        if self.value > Self::OVERBOUGHT {
            RsiZone::Overbought
        } else if self.value < Self::OVERSOLD {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiZone::Overbought => write!(f, "Overbought"),
            RsiZone::Oversold => write!(f, "Oversold"),
            RsiZone::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Direction of a short/long moving average crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Crossover {
    Bullish,
    Bearish,
    None,
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crossover::Bullish => write!(f, "Bullish"),
            Crossover::Bearish => write!(f, "Bearish"),
            Crossover::None => write!(f, "None"),
        }
    }
}

/// Crossover state plus the averages at the two most recent defined points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaCrossoverResult {
    pub crossover: Crossover,
    pub prev_short: f64,
    pub prev_long: f64,
    pub short: f64,
    pub long: f64,
}

/// All three indicator outcomes computed from one series snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub macd: IndicatorOutcome<MacdResult>,
    pub rsi: IndicatorOutcome<RsiResult>,
    pub ma_crossover: IndicatorOutcome<MaCrossoverResult>,
}
