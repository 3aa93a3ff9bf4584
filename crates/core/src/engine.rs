use crate::metric::MetricResult;
use crate::metrics::{compute_metrics, MetricsParams};
use crate::price::PriceSeries;
use crate::ticker::filter_symbols;
use crate::traits::{PriceDataProvider, ReportSink, TickerSource};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Counts for one completed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub available: usize,
    pub unavailable: usize,
    pub warnings: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_results(results: &[MetricResult]) -> Self {
        let available = results.iter().filter(|r| r.is_available()).count();
        Self {
            total: results.len(),
            available,
            unavailable: results.len() - available,
            warnings: results.iter().map(|r| r.warnings.len()).sum(),
        }
    }
}

/// Ticker source -> price download -> metrics -> report sink.
pub struct MetricsPipeline<T, P, S>
where
    T: TickerSource,
    P: PriceDataProvider,
    S: ReportSink,
{
    ticker_source: T,
    price_provider: P,
    sink: S,
    params: MetricsParams,
}

impl<T, P, S> MetricsPipeline<T, P, S>
where
    T: TickerSource,
    P: PriceDataProvider,
    S: ReportSink,
{
    /// # Errors
    /// Returns an error if `params` fail validation.
    pub fn new(ticker_source: T, price_provider: P, sink: S, params: MetricsParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            ticker_source,
            price_provider,
            sink,
            params,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the whole batch once.
    ///
    /// # Errors
    /// Returns an error if the ticker source or price provider fails, if no
    /// valid tickers remain, or if the sink cannot render. Per-ticker data
    /// problems never fail the batch.
    pub async fn run(&mut self) -> Result<BatchSummary> {
        let raw = self
            .ticker_source
            .fetch_tickers()
            .await
            .context("Failed to fetch tickers")?;
        let tickers = filter_symbols(&raw);
        if tickers.is_empty() {
            anyhow::bail!("No valid ticker symbols to analyse ({} candidates)", raw.len());
        }
        tracing::info!(
            "Analysing {} tickers ({} dropped): {}",
            tickers.len(),
            raw.len() - tickers.len(),
            tickers.join(" ")
        );

        let downloads = self
            .price_provider
            .download_prices(&tickers)
            .await
            .context("Failed to download price data")?;
        tracing::info!("Downloaded price data for {} tickers", downloads.len());

        let results = compute_report(&tickers, downloads, &self.params)?;
        let summary = BatchSummary::from_results(&results);

        self.sink.render(&results).context("Failed to render report")?;

        tracing::info!(
            "Batch complete: {} tickers, {} available, {} unavailable, {} warnings",
            summary.total,
            summary.available,
            summary.unavailable,
            summary.warnings
        );
        Ok(summary)
    }
}

/// Computes one result per ticker, in ticker order.
///
/// Tickers absent from `downloads`, or present with an empty series, get an
/// unavailable result; the rest of the batch is unaffected.
///
/// # Errors
/// Returns an error only if `params` fail validation.
pub fn compute_report(
    tickers: &[String],
    downloads: Vec<PriceSeries>,
    params: &MetricsParams,
) -> Result<Vec<MetricResult>> {
    params.validate()?;

    let mut by_symbol: HashMap<String, PriceSeries> = downloads
        .into_iter()
        .map(|s| (s.symbol().to_string(), s))
        .collect();

    let mut results = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let result = match by_symbol.remove(ticker) {
            Some(series) if !series.is_empty() => {
                tracing::debug!("Computing metrics for {} ({} bars)", ticker, series.len());
                compute_metrics(&series, params)?
            }
            _ => MetricResult::unavailable(ticker.clone()),
        };

        for warning in &result.warnings {
            tracing::warn!("{}: {}", ticker, warning);
        }
        results.push(result);
    }

    Ok(results)
}
