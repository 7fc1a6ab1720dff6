use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::indicators::IndicatorError;

/// Top-level body of `GET /v8/finance/chart/{symbol}`
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartData>>,
    pub error: Option<ChartError>,
}

/// Error object Yahoo embeds in the chart body
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartData {
    /// Absent when the symbol has no bars in the requested range
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<QuoteData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteData {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// How far back to fetch (`range` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Range {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Range {
    pub fn as_yahoo_str(&self) -> &'static str {
        match self {
            Range::OneDay => "1d",
            Range::FiveDays => "5d",
            Range::OneMonth => "1mo",
            Range::ThreeMonths => "3mo",
            Range::SixMonths => "6mo",
            Range::OneYear => "1y",
        }
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::OneMonth
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_yahoo_str())
    }
}

impl FromStr for Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" => Ok(Range::OneDay),
            "5d" => Ok(Range::FiveDays),
            "1mo" => Ok(Range::OneMonth),
            "3mo" => Ok(Range::ThreeMonths),
            "6mo" => Ok(Range::SixMonths),
            "1y" => Ok(Range::OneYear),
            _ => Err(format!("Unknown range '{}'. Use: 1d, 5d, 1mo, 3mo, 6mo, 1y", s)),
        }
    }
}

/// Bar size (`interval` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
    OneWeek,
}

impl Interval {
    pub fn as_yahoo_str(&self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::OneHour
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_yahoo_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "5m" => Ok(Interval::FiveMinutes),
            "15m" => Ok(Interval::FifteenMinutes),
            "30m" => Ok(Interval::ThirtyMinutes),
            "1h" | "60m" => Ok(Interval::OneHour),
            "1d" => Ok(Interval::OneDay),
            "1wk" => Ok(Interval::OneWeek),
            _ => Err(format!("Unknown interval '{}'. Use: 5m, 15m, 30m, 1h, 1d, 1wk", s)),
        }
    }
}

/// Errors from the Yahoo Finance chart API
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Rate Limited. Retry after {retry_after:?} s")]
    RateLimited { retry_after: Option<u64> },
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    #[error("API error [{code}]: {description}")]
    Api { code: String, description: String },
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
    #[error(transparent)]
    MalformedSeries(#[from] IndicatorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_one_month_of_hourly_bars() {
        assert_eq!(Range::default().as_yahoo_str(), "1mo");
        assert_eq!(Interval::default().as_yahoo_str(), "1h");
    }

    #[test]
    fn test_parse_range_and_interval() {
        assert_eq!("3MO".parse::<Range>().unwrap(), Range::ThreeMonths);
        assert_eq!("60m".parse::<Interval>().unwrap(), Interval::OneHour);
        assert!("2h".parse::<Interval>().is_err());
        assert!("forever".parse::<Range>().unwrap_err().contains("Unknown range"));
    }
}
