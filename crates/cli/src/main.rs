use clap::{Parser, Subcommand};

mod commands;
mod sink;

use commands::{AnalyzeArgs, AnalyzeCsvArgs, FetchArgs, RunArgs, TickersArgs};

#[derive(Parser)]
#[command(name = "stock-metrics")]
#[command(about = "Per-ticker price metrics for the day's top gainers", long_about = None)]
struct Cli {
    /// Optional log file path (logs to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's gainers, download a year of prices, and report metrics
    Run(RunArgs),
    /// Report metrics for the given symbols
    Analyze(AnalyzeArgs),
    /// Report metrics from previously fetched CSV files
    AnalyzeCsv(AnalyzeCsvArgs),
    /// Print the current gainers list
    Tickers(TickersArgs),
    /// Download one symbol's price history to CSV
    Fetch(FetchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Reports go to stdout; logs stay on stderr unless a log file is given.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    match cli.command {
        Commands::Run(args) => commands::run_pipeline(args).await?,
        Commands::Analyze(args) => commands::run_analyze(args).await?,
        Commands::AnalyzeCsv(args) => commands::run_analyze_csv(args).await?,
        Commands::Tickers(args) => commands::run_tickers(args).await?,
        Commands::Fetch(args) => commands::run_fetch(args).await?,
    }

    Ok(())
}
