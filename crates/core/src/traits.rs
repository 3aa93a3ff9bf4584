use crate::metric::MetricResult;
use crate::price::PriceSeries;
use anyhow::Result;
use async_trait::async_trait;

/// Supplies the symbols to analyse.
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn fetch_tickers(&self) -> Result<Vec<String>>;
}

/// Downloads daily price history.
///
/// Implementations return one series per requested symbol. A symbol without
/// data yields an empty series instead of failing the whole request.
#[async_trait]
pub trait PriceDataProvider: Send + Sync {
    async fn download_prices(&self, symbols: &[String]) -> Result<Vec<PriceSeries>>;
}

/// Receives the finished report.
pub trait ReportSink: Send {
    fn render(&mut self, results: &[MetricResult]) -> Result<()>;
}
