//! Tickers CLI command.
//!
//! Prints the current gainers list, one symbol per line, after the same
//! symbol hygiene the pipeline applies.

use super::run::{build_client, load_config};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use stock_metrics_core::ticker::filter_symbols;
use stock_metrics_core::TickerSource;
use stock_metrics_data::ScreenerTickerSource;

/// Arguments for the tickers command.
#[derive(Args, Debug, Clone)]
pub struct TickersArgs {
    /// Number of gainers to request
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Predefined screener id (e.g. day_gainers, most_actives)
    #[arg(long)]
    pub screener: Option<String>,

    /// Also print symbols that the pipeline would drop
    #[arg(long)]
    pub all: bool,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: PathBuf,

    /// Config profile overlay
    #[arg(long)]
    pub profile: Option<String>,
}

/// Runs the tickers command.
///
/// # Errors
/// Returns an error if the screener request fails or returns no rows.
pub async fn run_tickers(args: TickersArgs) -> Result<()> {
    let mut config = load_config(&args.config, args.profile.as_deref())?;
    if let Some(count) = args.count {
        config.provider.ticker_count = count;
    }
    if let Some(screener) = args.screener {
        config.provider.screener_id = screener;
    }

    let client = build_client(&config)?;
    let source = ScreenerTickerSource::new(
        client,
        config.provider.screener_id.clone(),
        config.provider.ticker_count,
    );

    let raw = source.fetch_tickers().await?;
    let usable = filter_symbols(&raw);

    tracing::info!(
        "{} returned {} symbols ({} usable)",
        config.provider.screener_id,
        raw.len(),
        usable.len()
    );

    for symbol in if args.all { &raw } else { &usable } {
        println!("{symbol}");
    }

    Ok(())
}
