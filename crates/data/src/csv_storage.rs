use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use stock_metrics_core::{Bar, PriceDataProvider, PriceSeries};

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    symbol: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    adj_close: Option<f64>,
    volume: Option<f64>,
}

impl CsvRow {
    /// Converts to a bar when every numeric cell is present and finite.
    fn into_bar(self) -> Option<Bar> {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        Some(Bar {
            date: self.date,
            open: finite(self.open)?,
            high: finite(self.high)?,
            low: finite(self.low)?,
            close: finite(self.close)?,
            adj_close: finite(self.adj_close)?,
            volume: finite(self.volume)?,
        })
    }
}

pub struct CsvStorage;

impl CsvStorage {
    /// Writes a price series to CSV.
    ///
    /// Format: date,symbol,open,high,low,close,adj_close,volume
    ///
    /// # Errors
    /// Returns error if the file cannot be created or writing fails
    pub fn write_series(path: impl AsRef<Path>, series: &PriceSeries) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        let mut writer = Writer::from_writer(file);

        for bar in series.bars() {
            writer.serialize(CsvRow {
                date: bar.date,
                symbol: series.symbol().to_string(),
                open: Some(bar.open),
                high: Some(bar.high),
                low: Some(bar.low),
                close: Some(bar.close),
                adj_close: Some(bar.adj_close),
                volume: Some(bar.volume),
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Reads a price series from a CSV file written by [`CsvStorage::write_series`].
    ///
    /// Rows with a blank or non-finite cell are dropped. The rest are sorted by
    /// date; duplicate dates keep the last row.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a row fails to parse
    pub fn read_series(path: impl AsRef<Path>, symbol: &str) -> Result<PriceSeries> {
        let path = path.as_ref();
        let mut reader = Reader::from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.with_context(|| {
                format!("Invalid row {} in {}", line + 1, path.display())
            })?;
            if !row.symbol.eq_ignore_ascii_case(symbol) {
                tracing::warn!(
                    "{}: row {} has symbol {}, expected {}",
                    path.display(),
                    line + 1,
                    row.symbol,
                    symbol
                );
            }
            match row.into_bar() {
                Some(bar) => bars.push(bar),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::debug!("{}: dropped {} incomplete rows", symbol, dropped);
        }

        Ok(PriceSeries::from_unsorted(symbol, bars))
    }
}

/// Price provider over a directory of `<SYMBOL>.csv` files.
///
/// A missing or unreadable file is reported as an empty series.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

#[async_trait]
impl PriceDataProvider for CsvPriceProvider {
    async fn download_prices(&self, symbols: &[String]) -> Result<Vec<PriceSeries>> {
        let mut downloads = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let path = self.path_for(symbol);
            if !path.exists() {
                tracing::warn!("No CSV file for {} at {}", symbol, path.display());
                downloads.push(PriceSeries::empty(symbol.clone()));
                continue;
            }

            let owned = symbol.clone();
            let read = tokio::task::spawn_blocking(move || CsvStorage::read_series(&path, &owned))
                .await
                .context("CSV reader task panicked")?;

            match read {
                Ok(series) => {
                    tracing::debug!("{}: loaded {} bars from CSV", symbol, series.len());
                    downloads.push(series);
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable CSV for {}: {:#}", symbol, e);
                    downloads.push(PriceSeries::empty(symbol.clone()));
                }
            }
        }

        Ok(downloads)
    }
}
