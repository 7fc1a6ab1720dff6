use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{ApiError, ChartResponse, Interval, Range};
use crate::indicators::IndicatorError;
use crate::models::{PricePoint, PriceSeries};
use crate::utils::api_ratelimit::ApiRateLimiter;

/// Yahoo Finance chart API client, the bot's only source of price data
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
    limiter: ApiRateLimiter,
}

impl YahooClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";
    const BROWSER_USER_AGENT: &'static str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
    const MAX_TICKER_LEN: usize = 15;

    /// Create a new client with custom base URL (for proxies and testing)
    pub fn with_base_url(
        base_url: String,
        timeout: Duration,
        max_requests_per_second: usize,
    ) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .default_headers(Self::create_headers())
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: ApiRateLimiter::new(max_requests_per_second),
        })
    }

    /// Yahoo rejects requests without a browser-like user agent
    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::BROWSER_USER_AGENT));
        headers
    }

    /// Uppercase and check a ticker before it is put into a URL path
    pub fn normalize_ticker(ticker: &str) -> Result<String, ApiError> {
        let ticker = ticker.trim().to_uppercase();

        if ticker.is_empty() {
            return Err(ApiError::InvalidTicker("ticker cannot be empty".to_string()));
        }
        if ticker.len() > Self::MAX_TICKER_LEN {
            return Err(ApiError::InvalidTicker(format!(
                "'{}' is longer than {} characters",
                ticker,
                Self::MAX_TICKER_LEN
            )));
        }
        if let Some(bad) = ticker
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(ApiError::InvalidTicker(format!(
                "'{}' contains unsupported character '{}'",
                ticker, bad
            )));
        }

        Ok(ticker)
    }

    fn build_url(&self, ticker: &str, range: Range, interval: Interval) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url,
            ticker,
            range.as_yahoo_str(),
            interval.as_yahoo_str()
        )
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body_text = response.text().await.unwrap_or_default();

        // Yahoo reports most failures inside the usual chart envelope
        let description = serde_json::from_str::<ChartResponse>(&body_text)
            .ok()
            .and_then(|body| body.chart.error)
            .map(|err| err.description)
            .unwrap_or(body_text);

        match status_code {
            404 => ApiError::NotFound(description),
            429 => {
                warn!("Rate limited by market data API, retry after {:?} s", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, description);
                ApiError::ServerError(status_code, description)
            }
            _ => ApiError::HttpError(status_code, description),
        }
    }

    /// GET /v8/finance/chart/{ticker}
    ///
    /// Fetches closing prices for `ticker` over `range`, one bar per
    /// `interval`, as a chronological series. A symbol with no bars in the
    /// range yields an empty series rather than an error.
    pub async fn fetch_series(
        &self,
        ticker: &str,
        range: Range,
        interval: Interval,
    ) -> Result<PriceSeries, ApiError> {
        let ticker = Self::normalize_ticker(ticker)?;
        let url = self.build_url(&ticker, range, interval);

        self.limiter.acquire().await;
        debug!("Fetching {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to read response: {}", e)))?;

        let series = Self::parse_chart(&body)?;
        debug!("Fetched {} closes for {}", series.len(), ticker);
        Ok(series)
    }

    /// Turn a chart body into a series, skipping bars without a close
    pub fn parse_chart(body: &str) -> Result<PriceSeries, ApiError> {
        let response: ChartResponse = serde_json::from_str(body)
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = response.chart.error {
            return Err(ApiError::Api {
                code: error.code,
                description: error.description,
            });
        }

        let data = match response.chart.result.as_deref().and_then(|r| r.first()) {
            Some(data) => data,
            None => return Ok(PriceSeries::empty()),
        };
        let closes = match data.indicators.quote.first() {
            Some(quote) => &quote.close,
            None => return Ok(PriceSeries::empty()),
        };

        if data.timestamp.len() != closes.len() {
            warn!(
                "Chart has {} timestamps but {} closes",
                data.timestamp.len(),
                closes.len()
            );
            return Err(IndicatorError::MalformedSeries(format!(
                "{} timestamps do not line up with {} closes",
                data.timestamp.len(),
                closes.len()
            ))
            .into());
        }

        let mut points: Vec<PricePoint> = Vec::with_capacity(data.timestamp.len());
        for (&ts, close) in data.timestamp.iter().zip(closes.iter()) {
            let close = match close {
                Some(close) => *close,
                None => continue,
            };
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
                ApiError::DeserializationError(format!("Timestamp {} is out of range", ts))
            })?;

            // The live bar is sometimes repeated under the same timestamp; keep the latest
            if let Some(last) = points.last_mut() {
                if last.timestamp == timestamp {
                    last.close = close;
                    continue;
                }
            }
            points.push(PricePoint::new(timestamp, close));
        }

        Ok(PriceSeries::new(points)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> YahooClient {
        YahooClient::with_base_url("http://localhost:9/".to_string(), Duration::from_secs(1), 5).unwrap()
    }

    #[test]
    fn test_build_url() {
        let url = client().build_url("AAPL", Range::OneMonth, Interval::OneHour);
        assert_eq!(url, "http://localhost:9/v8/finance/chart/AAPL?range=1mo&interval=1h");
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(YahooClient::normalize_ticker(" aapl ").unwrap(), "AAPL");
        assert_eq!(YahooClient::normalize_ticker("brk-b").unwrap(), "BRK-B");
        assert_eq!(YahooClient::normalize_ticker("^gspc").unwrap(), "^GSPC");
        assert_eq!(YahooClient::normalize_ticker("eurusd=x").unwrap(), "EURUSD=X");
        assert!(YahooClient::normalize_ticker("").is_err());
        assert!(YahooClient::normalize_ticker("AAPL/../x").is_err());
        assert!(YahooClient::normalize_ticker("ABCDEFGHIJKLMNOP").is_err());
    }

    #[test]
    fn test_parse_chart_valid() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704067200,1704070800,1704074400],"indicators":{"quote":[{"open":[185.0,186.0,187.0],"close":[185.5,186.5,187.5],"volume":[1000,1100,1200]}]}}],"error":null}}"#;
        let series = YahooClient::parse_chart(json).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![185.5, 186.5, 187.5]);
        assert_eq!(series.last().unwrap().timestamp.timestamp(), 1704074400);
    }

    #[test]
    fn test_parse_chart_skips_null_closes() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704067200,1704070800,1704074400],"indicators":{"quote":[{"close":[185.5,null,187.5]}]}}],"error":null}}"#;
        let series = YahooClient::parse_chart(json).unwrap();
        assert_eq!(series.closes(), vec![185.5, 187.5]);
    }

    #[test]
    fn test_parse_chart_collapses_repeated_live_bar() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704067200,1704070800,1704070800],"indicators":{"quote":[{"close":[10.0,11.0,11.25]}]}}],"error":null}}"#;
        let series = YahooClient::parse_chart(json).unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.25]);
    }

    #[test]
    fn test_parse_chart_without_bars_is_empty() {
        let json = r#"{"chart":{"result":[{"meta":{"symbol":"XYZ"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(YahooClient::parse_chart(json).unwrap().is_empty());

        let json = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(YahooClient::parse_chart(json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_chart_api_error() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(YahooClient::parse_chart(json), Err(ApiError::Api { .. })));
    }

    #[test]
    fn test_parse_chart_rejects_out_of_order_bars() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704070800,1704067200],"indicators":{"quote":[{"close":[10.0,11.0]}]}}],"error":null}}"#;
        assert!(matches!(
            YahooClient::parse_chart(json),
            Err(ApiError::MalformedSeries(IndicatorError::MalformedSeries(_)))
        ));
    }

    #[test]
    fn test_parse_chart_rejects_misaligned_arrays() {
        let json = r#"{"chart":{"result":[{"timestamp":[1704067200,1704070800,1704074400],"indicators":{"quote":[{"close":[10.0,11.0]}]}}],"error":null}}"#;
        assert!(matches!(
            YahooClient::parse_chart(json),
            Err(ApiError::MalformedSeries(IndicatorError::MalformedSeries(_)))
        ));
    }

    #[test]
    fn test_parse_chart_invalid_json() {
        assert!(matches!(
            YahooClient::parse_chart("not json"),
            Err(ApiError::DeserializationError(_))
        ));
    }
}
