//! Core types and computations for per-ticker stock metrics.
//!
//! This crate provides:
//! - A validated daily price model ([`PriceSeries`], [`Bar`])
//! - The metrics library: mean close, VWAP, TWAP, volume change, daily
//!   returns, Sharpe ratio, MACD, and RSI
//! - Collaborator traits for ticker sources, price providers, and report sinks
//! - The batch pipeline tying them together
//! - Layered configuration and a plain-text report formatter

pub mod config;
pub mod config_loader;
pub mod engine;
pub mod error;
pub mod metric;
pub mod metrics;
pub mod metrics_formatter;
pub mod price;
pub mod ticker;
pub mod traits;

pub use config::{AppConfig, ProviderConfig, ReportConfig, ReportFormat};
pub use config_loader::ConfigLoader;
pub use engine::{compute_report, BatchSummary, MetricsPipeline};
pub use error::{MetricWarning, MetricsError};
pub use metric::{Metric, MetricResult, MetricValue, TickerStatus};
pub use metrics::{compute_metrics, MetricsParams};
pub use metrics_formatter::MetricsFormatter;
pub use price::{Bar, PriceSeries};
pub use traits::{PriceDataProvider, ReportSink, TickerSource};
