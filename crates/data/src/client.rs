//! Yahoo Finance REST client with rate limiting.
//!
//! Covers the two endpoints the pipeline needs: the predefined screener
//! (ticker discovery) and the chart endpoint (daily price history).

use crate::chart::{parse_chart_response, Lookback};
use crate::error::{Result, YahooError};
use crate::screener::parse_screener_response;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use stock_metrics_core::ticker::is_valid_symbol;
use stock_metrics_core::{PriceSeries, ProviderConfig};

/// Configuration for the Yahoo client.
#[derive(Debug, Clone)]
pub struct YahooClientConfig {
    /// Predefined screener endpoint.
    pub screener_url: String,
    /// Chart endpoint; the symbol is appended as a path segment.
    pub chart_url: String,
    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for YahooClientConfig {
    fn default() -> Self {
        let provider = ProviderConfig::default();
        Self {
            screener_url: provider.screener_url,
            chart_url: provider.chart_url,
            requests_per_minute: nonzero!(60u32),
            timeout_secs: provider.timeout_secs,
            user_agent: provider.user_agent,
        }
    }
}

impl TryFrom<&ProviderConfig> for YahooClientConfig {
    type Error = YahooError;

    fn try_from(provider: &ProviderConfig) -> Result<Self> {
        let requests_per_minute = NonZeroU32::new(provider.requests_per_minute).ok_or_else(|| {
            YahooError::Configuration("requests_per_minute must be greater than zero".to_string())
        })?;

        Ok(Self {
            screener_url: provider.screener_url.clone(),
            chart_url: provider.chart_url.clone(),
            requests_per_minute,
            timeout_secs: provider.timeout_secs,
            user_agent: provider.user_agent.clone(),
        })
    }
}

impl YahooClientConfig {
    /// Points both endpoints at `base_url` (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.screener_url = format!("{base_url}/v1/finance/screener/predefined/saved");
        self.chart_url = format!("{base_url}/v8/finance/chart");
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub const fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }
}

/// Error block shared by the screener and chart responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: Option<String>,
    pub description: Option<String>,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.code.as_deref().unwrap_or("unknown"),
            self.description.as_deref().unwrap_or("no description")
        )
    }
}

/// Yahoo Finance REST client.
pub struct YahooClient {
    config: YahooClientConfig,
    http: Client,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("screener_url", &self.config.screener_url)
            .field("chart_url", &self.config.chart_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl YahooClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: YahooClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| YahooError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            config,
            http,
            rate_limiter,
        })
    }

    /// Fetches the symbols listed by a predefined screener, in table order.
    ///
    /// # Errors
    /// Returns error if the request fails or the table is malformed or empty.
    pub async fn screener(&self, screener_id: &str, count: u32) -> Result<Vec<String>> {
        let query = [
            ("scrIds", screener_id.to_string()),
            ("count", count.to_string()),
            ("formatted", "false".to_string()),
        ];
        let body = self.get_text(&self.config.screener_url, &query).await?;
        parse_screener_response(screener_id, &body)
    }

    /// Fetches daily bars for one symbol.
    ///
    /// Returns `Ok(None)` when the symbol is unknown or has no bars in the range.
    ///
    /// # Errors
    /// Returns error on transport failures or a malformed response.
    pub async fn chart(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: &str,
    ) -> Result<Option<PriceSeries>> {
        if !is_valid_symbol(symbol) {
            return Err(YahooError::InvalidSymbol(symbol.to_string()));
        }

        let url = format!("{}/{}", self.config.chart_url.trim_end_matches('/'), symbol);
        let query = [
            ("range", lookback.as_str().to_string()),
            ("interval", interval.to_string()),
            ("events", "div,splits".to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ];

        match self.get_text(&url, &query).await {
            Ok(body) => parse_chart_response(symbol, &body),
            Err(e) if e.is_not_found() => {
                tracing::debug!("Chart for {} not found", symbol);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Waits for the rate limiter and returns the body of a successful GET.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        self.rate_limiter.until_ready().await;

        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(YahooError::RateLimit {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(YahooError::api(status.as_u16(), text));
        }

        Ok(response.text().await?)
    }
}
