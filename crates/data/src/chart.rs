//! Daily price history from the Yahoo chart endpoint.

use crate::client::{ApiErrorBody, YahooClient};
use crate::error::{Result, YahooError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::sync::Arc;
use stock_metrics_core::ticker::is_valid_symbol;
use stock_metrics_core::{Bar, PriceDataProvider, PriceSeries};

/// How far back to request history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookback {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Lookback {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }
}

impl std::str::FromStr for Lookback {
    type Err = YahooError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" | "12mo" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "10y" => Ok(Self::TenYears),
            "ytd" => Ok(Self::YearToDate),
            "max" => Ok(Self::Max),
            _ => Err(YahooError::InvalidLookback(s.to_string())),
        }
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Option<Vec<QuoteColumns>>,
    adjclose: Option<Vec<AdjCloseColumn>>,
}

type Column = Option<Vec<Option<f64>>>;

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    open: Column,
    high: Column,
    low: Column,
    close: Column,
    volume: Column,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    adjclose: Column,
}

fn cell(column: &Column, index: usize) -> Option<f64> {
    column
        .as_ref()
        .and_then(|values| values.get(index).copied().flatten())
        .filter(|v| v.is_finite())
}

/// Converts a chart response body into a price series.
///
/// Rows with any missing OHLCV field are dropped. A missing adjusted close
/// falls back to the close. Dates are taken in the exchange's time zone.
///
/// Returns `Ok(None)` for an unknown symbol or a range without bars.
///
/// # Errors
/// Returns `MalformedResponse` if the body does not have the chart shape.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<Option<PriceSeries>> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(error) = response.chart.error {
        if error.code.as_deref() == Some("Not Found") {
            return Ok(None);
        }
        return Err(YahooError::malformed(format!("chart error for {symbol}: {error}")));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(None);
    };

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Ok(None);
    }

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let indicators = result
        .indicators
        .ok_or_else(|| YahooError::malformed(format!("chart for {symbol} has no indicators")))?;
    let quote = indicators
        .quote
        .and_then(|q| q.into_iter().next())
        .ok_or_else(|| YahooError::malformed(format!("chart for {symbol} has no quote columns")))?;
    let adjclose: Column = indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .and_then(|a| a.adjclose);

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut dropped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = DateTime::from_timestamp(ts + offset, 0).map(|d| d.date_naive());
        let fields = (
            date,
            cell(&quote.open, i),
            cell(&quote.high, i),
            cell(&quote.low, i),
            cell(&quote.close, i),
            cell(&quote.volume, i),
        );
        let (Some(date), Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields
        else {
            dropped += 1;
            continue;
        };

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            adj_close: cell(&adjclose, i).unwrap_or(close),
            volume,
        });
    }

    if dropped > 0 {
        tracing::debug!("{}: dropped {} incomplete rows", symbol, dropped);
    }
    if bars.is_empty() {
        return Ok(None);
    }

    Ok(Some(PriceSeries::from_unsorted(symbol, bars)))
}

/// Price provider backed by the Yahoo chart endpoint.
///
/// Symbols are requested one at a time under the client's rate limit.
#[derive(Debug)]
pub struct YahooPriceProvider {
    client: Arc<YahooClient>,
    lookback: Lookback,
    interval: String,
}

impl YahooPriceProvider {
    #[must_use]
    pub fn new(client: Arc<YahooClient>, lookback: Lookback, interval: impl Into<String>) -> Self {
        Self {
            client,
            lookback,
            interval: interval.into(),
        }
    }
}

#[async_trait]
impl PriceDataProvider for YahooPriceProvider {
    async fn download_prices(&self, symbols: &[String]) -> anyhow::Result<Vec<PriceSeries>> {
        tracing::info!(
            "Downloading {} of {} history for {} symbols",
            self.interval,
            self.lookback,
            symbols.len()
        );

        let mut downloads = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !is_valid_symbol(symbol) {
                tracing::warn!("Skipping invalid symbol {:?}", symbol);
                downloads.push(PriceSeries::empty(symbol.clone()));
                continue;
            }

            let series = self
                .client
                .chart(symbol, self.lookback, &self.interval)
                .await
                .with_context(|| format!("Failed to download prices for {symbol}"))?;

            match series {
                Some(series) => {
                    tracing::debug!("{}: {} bars", symbol, series.len());
                    downloads.push(series);
                }
                None => {
                    tracing::warn!("No price data returned for {}", symbol);
                    downloads.push(PriceSeries::empty(symbol.clone()));
                }
            }
        }

        Ok(downloads)
    }
}
