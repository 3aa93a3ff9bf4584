//! CLI commands for the stock metrics pipeline.

pub mod fetch;
pub mod run;
pub mod tickers;

pub use fetch::{run_fetch, FetchArgs};
pub use run::{run_analyze, run_analyze_csv, run_pipeline, AnalyzeArgs, AnalyzeCsvArgs, RunArgs};
pub use tickers::{run_tickers, TickersArgs};
