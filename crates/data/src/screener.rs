//! Ticker discovery.
//!
//! The gainers table is fetched from a predefined Yahoo screener and parsed
//! into symbols here. Symbol hygiene (dropping non-alphanumeric entries) is
//! applied by the pipeline before use.

use crate::client::{ApiErrorBody, YahooClient};
use crate::error::{Result, YahooError};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use stock_metrics_core::TickerSource;

#[derive(Debug, Deserialize)]
struct ScreenerResponse {
    finance: Option<ScreenerBody>,
}

#[derive(Debug, Deserialize)]
struct ScreenerBody {
    result: Option<Vec<ScreenerResult>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ScreenerResult {
    quotes: Option<Vec<ScreenerQuote>>,
}

#[derive(Debug, Deserialize)]
struct ScreenerQuote {
    symbol: Option<String>,
}

/// Extracts the symbol column from a screener response body.
///
/// # Errors
/// - `MalformedResponse` if the body is not JSON of the expected shape or
///   carries an API error block
/// - `EmptyTable` if the table has no symbols
pub fn parse_screener_response(screener: &str, body: &str) -> Result<Vec<String>> {
    let response: ScreenerResponse = serde_json::from_str(body)?;
    let finance = response
        .finance
        .ok_or_else(|| YahooError::malformed("missing 'finance' block"))?;

    if let Some(error) = finance.error {
        return Err(YahooError::malformed(format!("screener error {error}")));
    }

    let table = finance
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| YahooError::malformed("missing screener result"))?;

    let symbols: Vec<String> = table
        .quotes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|q| q.symbol)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(YahooError::EmptyTable {
            screener: screener.to_string(),
        });
    }

    Ok(symbols)
}

/// Ticker source backed by a predefined Yahoo screener (e.g. `day_gainers`).
#[derive(Debug)]
pub struct ScreenerTickerSource {
    client: Arc<YahooClient>,
    screener_id: String,
    count: u32,
}

impl ScreenerTickerSource {
    #[must_use]
    pub fn new(client: Arc<YahooClient>, screener_id: impl Into<String>, count: u32) -> Self {
        Self {
            client,
            screener_id: screener_id.into(),
            count,
        }
    }
}

#[async_trait]
impl TickerSource for ScreenerTickerSource {
    async fn fetch_tickers(&self) -> anyhow::Result<Vec<String>> {
        tracing::info!(
            "Fetching up to {} tickers from screener '{}'",
            self.count,
            self.screener_id
        );
        let symbols = self.client.screener(&self.screener_id, self.count).await?;
        Ok(symbols)
    }
}

/// Ticker source over a fixed list, e.g. symbols given on the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticTickerSource {
    symbols: Vec<String>,
}

impl StaticTickerSource {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a comma- or whitespace-separated list.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty()),
        )
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

#[async_trait]
impl TickerSource for StaticTickerSource {
    async fn fetch_tickers(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.symbols.clone())
    }
}
