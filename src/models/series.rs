//! Price series models

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::indicators::IndicatorError;

/// A single closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Chronological (oldest first) sequence of closing prices.
///
/// Timestamps are strictly increasing and every close is a finite positive
/// number. The series may be empty, which callers treat as "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order timestamps and unusable prices
    pub fn new(points: Vec<PricePoint>) -> Result<Self, IndicatorError> {
        for (idx, point) in points.iter().enumerate() {
            if !point.close.is_finite() {
                return Err(IndicatorError::MalformedSeries(format!(
                    "close at index {} is not a finite number ({})",
                    idx, point.close
                )));
            }
            if point.close <= 0.0 {
                return Err(IndicatorError::MalformedSeries(format!(
                    "close at index {} must be positive, got {}",
                    idx, point.close
                )));
            }
        }

        if let Some(idx) = points
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(IndicatorError::MalformedSeries(format!(
                "timestamp at index {} ({}) does not follow {}",
                idx + 1,
                points[idx + 1].timestamp,
                points[idx].timestamp
            )));
        }

        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices in chronological order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
