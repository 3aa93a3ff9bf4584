//! Pipeline commands: `run`, `analyze`, and `analyze-csv`.
//!
//! All three share the metric and report flags in [`ReportArgs`] and differ
//! only in where tickers and prices come from.

use crate::sink::{JsonSink, TextSink};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use stock_metrics_core::{
    AppConfig, BatchSummary, ConfigLoader, MetricsPipeline, PriceDataProvider, ReportFormat,
    TickerSource,
};
use stock_metrics_data::{
    CsvPriceProvider, Lookback, ScreenerTickerSource, StaticTickerSource, YahooClient,
    YahooClientConfig, YahooPriceProvider,
};

/// Configuration and metric flags shared by every pipeline command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: PathBuf,

    /// Config profile overlay (loads Config.<profile>.toml next to --config)
    #[arg(long)]
    pub profile: Option<String>,

    /// Report format (text, json)
    #[arg(short, long)]
    pub format: Option<ReportFormat>,

    /// Per-period risk-free rate used by the Sharpe ratio
    #[arg(long)]
    pub risk_free_rate: Option<f64>,

    /// Fast EMA span for MACD
    #[arg(long)]
    pub macd_short: Option<usize>,

    /// Slow EMA span for MACD
    #[arg(long)]
    pub macd_long: Option<usize>,

    /// Number of differences averaged by RSI
    #[arg(long)]
    pub rsi_period: Option<usize>,

    /// Omit per-ticker warnings from text reports
    #[arg(long)]
    pub no_warnings: bool,
}

impl ReportArgs {
    /// Loads the layered configuration and applies command-line overrides.
    ///
    /// # Errors
    /// Returns an error if a configuration source cannot be parsed.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = load_config(&self.config, self.profile.as_deref())?;

        if let Some(format) = self.format {
            config.report.format = format;
        }
        if let Some(rate) = self.risk_free_rate {
            config.metrics.risk_free_rate = rate;
        }
        if let Some(short) = self.macd_short {
            config.metrics.macd_short = short;
        }
        if let Some(long) = self.macd_long {
            config.metrics.macd_long = long;
        }
        if let Some(period) = self.rsi_period {
            config.metrics.rsi_period = period;
        }
        if self.no_warnings {
            config.report.show_warnings = false;
        }

        Ok(config)
    }
}

/// Loads `path`, with the profile overlay when one is given.
///
/// # Errors
/// Returns an error if a configuration source cannot be parsed.
pub fn load_config(path: &std::path::Path, profile: Option<&str>) -> Result<AppConfig> {
    match profile {
        Some(profile) => ConfigLoader::load_with_profile(path, profile),
        None => ConfigLoader::load_from(path),
    }
}

/// Arguments for the run command.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of gainers to request from the screener
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// History range (1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
    #[arg(short, long)]
    pub lookback: Option<String>,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Comma- or space-separated ticker symbols
    #[arg(short, long)]
    pub symbols: String,

    /// History range (1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
    #[arg(short, long)]
    pub lookback: Option<String>,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Arguments for the analyze-csv command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeCsvArgs {
    /// Directory holding <SYMBOL>.csv files
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Comma- or space-separated ticker symbols
    #[arg(short, long)]
    pub symbols: String,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Builds a rate-limited Yahoo client from the provider section.
///
/// # Errors
/// Returns an error if the provider configuration is invalid.
pub fn build_client(config: &AppConfig) -> Result<Arc<YahooClient>> {
    let client_config =
        YahooClientConfig::try_from(&config.provider).context("Invalid provider configuration")?;
    Ok(Arc::new(YahooClient::new(client_config)?))
}

fn price_provider(
    client: Arc<YahooClient>,
    config: &AppConfig,
    lookback: Option<&str>,
) -> Result<YahooPriceProvider> {
    let lookback: Lookback = lookback
        .unwrap_or(&config.provider.lookback)
        .parse()
        .context("Invalid lookback")?;
    Ok(YahooPriceProvider::new(
        client,
        lookback,
        config.provider.interval.clone(),
    ))
}

/// Runs the full pipeline over the current day gainers.
///
/// # Errors
/// Returns an error if the screener or price download fails, or the report
/// cannot be written.
pub async fn run_pipeline(args: RunArgs) -> Result<()> {
    let mut config = args.report.load_config()?;
    if let Some(count) = args.count {
        config.provider.ticker_count = count;
    }

    let client = build_client(&config)?;
    let tickers = ScreenerTickerSource::new(
        Arc::clone(&client),
        config.provider.screener_id.clone(),
        config.provider.ticker_count,
    );
    let prices = price_provider(client, &config, args.lookback.as_deref())?;

    execute(tickers, prices, &config).await
}

/// Runs the pipeline over a fixed list of symbols.
///
/// # Errors
/// Returns an error if the price download fails or the report cannot be written.
pub async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = args.report.load_config()?;

    let client = build_client(&config)?;
    let tickers = StaticTickerSource::parse(&args.symbols);
    let prices = price_provider(client, &config, args.lookback.as_deref())?;

    execute(tickers, prices, &config).await
}

/// Runs the pipeline over previously downloaded CSV files.
///
/// # Errors
/// Returns an error if a CSV file is unreadable or the report cannot be written.
pub async fn run_analyze_csv(args: AnalyzeCsvArgs) -> Result<()> {
    let config = args.report.load_config()?;

    if !args.dir.is_dir() {
        anyhow::bail!("CSV directory not found: {}", args.dir.display());
    }

    let tickers = StaticTickerSource::parse(&args.symbols);
    let prices = CsvPriceProvider::new(&args.dir);

    execute(tickers, prices, &config).await
}

async fn execute<T, P>(tickers: T, prices: P, config: &AppConfig) -> Result<()>
where
    T: TickerSource,
    P: PriceDataProvider,
{
    let summary: BatchSummary = match config.report.format {
        ReportFormat::Text => {
            let sink = TextSink::new(std::io::stdout(), config.report.show_warnings);
            let mut pipeline = MetricsPipeline::new(tickers, prices, sink, config.metrics)?;
            pipeline.run().await?
        }
        ReportFormat::Json => {
            let sink = JsonSink::new(std::io::stdout());
            let mut pipeline = MetricsPipeline::new(tickers, prices, sink, config.metrics)?;
            pipeline.run().await?
        }
    };

    if summary.available == 0 {
        tracing::warn!("No ticker had usable price data");
    }

    Ok(())
}
