//! Runtime settings read from the environment (`.env` is loaded by `main`)

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::api::yahoo::YahooClient;
use crate::indicators::{IndicatorConfig, IndicatorError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub command_prefix: String,
    pub yahoo_base_url: String,
    pub http_timeout: Duration,
    pub yahoo_max_rps: usize,
    pub indicators: IndicatorConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; `from_env` passes `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let defaults = IndicatorConfig::default();
        let indicators = IndicatorConfig {
            fast_span: parse_or(&lookup, "MACD_FAST", defaults.fast_span)?,
            slow_span: parse_or(&lookup, "MACD_SLOW", defaults.slow_span)?,
            signal_span: parse_or(&lookup, "MACD_SIGNAL", defaults.signal_span)?,
            rsi_window: parse_or(&lookup, "RSI_WINDOW", defaults.rsi_window)?,
            ma_short_window: parse_or(&lookup, "MA_SHORT", defaults.ma_short_window)?,
            ma_long_window: parse_or(&lookup, "MA_LONG", defaults.ma_long_window)?,
        };
        indicators.validate()?;

        Ok(Self {
            discord_token,
            command_prefix: lookup("COMMAND_PREFIX").unwrap_or_else(|| "$".to_string()),
            yahoo_base_url: lookup("YAHOO_BASE_URL")
                .unwrap_or_else(|| YahooClient::DEFAULT_BASE_URL.to_string()),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10u64)?),
            yahoo_max_rps: parse_or(&lookup, "YAHOO_MAX_RPS", 5usize)?,
            indicators,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
