use std::time::Instant;

use crate::api::yahoo::{ApiError, YahooClient};
use crate::config::Settings;
use crate::utils::CommandLimiter;

/// State shared by every event handler, built once at startup and handed
/// to commands explicitly.
pub struct BotContext {
    pub settings: Settings,
    pub yahoo: YahooClient,
    pub limiter: CommandLimiter,
    pub started_at: Instant,
}

impl BotContext {
    pub fn new(settings: Settings) -> Result<Self, ApiError> {
        let yahoo = YahooClient::with_base_url(
            settings.yahoo_base_url.clone(),
            settings.http_timeout,
            settings.yahoo_max_rps,
        )?;

        Ok(Self {
            settings,
            yahoo,
            limiter: CommandLimiter::default(),
            started_at: Instant::now(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.settings.command_prefix
    }
}
