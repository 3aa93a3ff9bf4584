//! Data sources for the stock metrics pipeline.
//!
//! This crate provides:
//! - A rate-limited Yahoo Finance client
//! - Ticker discovery from the day-gainers screener
//! - Daily price download from the chart endpoint
//! - CSV storage and a CSV-backed price provider for offline runs

pub mod chart;
pub mod client;
pub mod csv_storage;
pub mod error;
pub mod screener;

pub use chart::{parse_chart_response, Lookback, YahooPriceProvider};
pub use client::{YahooClient, YahooClientConfig};
pub use csv_storage::{CsvPriceProvider, CsvStorage};
pub use error::YahooError;
pub use screener::{parse_screener_response, ScreenerTickerSource, StaticTickerSource};
