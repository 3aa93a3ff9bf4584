//! Fetch CLI command.
//!
//! Downloads daily history for one symbol and stores it as CSV, ready for
//! `analyze-csv`.

use super::run::{build_client, load_config};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use stock_metrics_data::{CsvStorage, Lookback};

/// Arguments for the fetch command.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Ticker symbol (e.g. "AAPL")
    #[arg(long)]
    pub symbol: String,

    /// Output CSV file path (defaults to <SYMBOL>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// History range (1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
    #[arg(short, long)]
    pub lookback: Option<String>,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: PathBuf,
}

/// Runs the fetch command.
///
/// # Errors
/// Returns an error if the symbol is invalid, has no data, or the file cannot
/// be written.
pub async fn run_fetch(args: FetchArgs) -> Result<()> {
    let config = load_config(&args.config, None)?;
    let symbol = args.symbol.trim().to_uppercase();
    let lookback: Lookback = args
        .lookback
        .as_deref()
        .unwrap_or(&config.provider.lookback)
        .parse()?;

    tracing::info!(
        "Fetching {} of {} bars for {}",
        lookback,
        config.provider.interval,
        symbol
    );

    let client = build_client(&config)?;
    let series = client
        .chart(&symbol, lookback, &config.provider.interval)
        .await
        .with_context(|| format!("Failed to fetch prices for {symbol}"))?
        .ok_or_else(|| anyhow::anyhow!("No price data returned for {symbol}"))?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{symbol}.csv")));

    CsvStorage::write_series(&output, &series)?;

    tracing::info!(
        "✅ Wrote {} bars ({} to {}) to {}",
        series.len(),
        series
            .first_date()
            .map_or_else(|| "?".to_string(), |d| d.to_string()),
        series
            .last_date()
            .map_or_else(|| "?".to_string(), |d| d.to_string()),
        output.display()
    );
    tracing::info!(
        "You can now run: stock-metrics analyze-csv --dir {} --symbols {}",
        output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| ".".to_string(), |p| p.display().to_string()),
        symbol
    );

    Ok(())
}
