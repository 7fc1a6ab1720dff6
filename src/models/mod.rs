//! Data models for the bot's commands and services
//!
//! Price series inputs, indicator results and the transient result structs
//! handed from services to commands.

pub mod series;
pub mod signal;
pub mod stock;
pub mod ping;

pub use series::{PricePoint, PriceSeries};
pub use signal::{
    AnalysisReport, Crossover, IndicatorOutcome, MaCrossoverResult, MacdResult, MacdSignal,
    RsiResult, RsiZone,
};
pub use stock::StockAnalysis;
pub use ping::PingMetrics;
