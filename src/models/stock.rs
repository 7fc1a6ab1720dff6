//! Stock analysis models

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::signal::AnalysisReport;

/// Everything the presenter needs to answer one `stock` request
#[derive(Debug, Clone, Serialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub points: usize,
    pub last_close: Option<f64>,
    pub as_of: Option<DateTime<Utc>>,
    pub report: AnalysisReport,
}

impl StockAnalysis {
    pub fn has_data(&self) -> bool {
        self.points > 0
    }
}
