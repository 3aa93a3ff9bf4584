//! Error types for the metrics library.
//!
//! Hard errors ([`MetricsError`]) reject invalid parameters or malformed
//! series before any computation. Soft conditions ([`MetricWarning`]) are
//! attached to a [`MetricResult`](crate::MetricResult) and never abort a batch.

use crate::metric::Metric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that reject a computation outright.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A metric parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Bars are not strictly increasing by date.
    #[error("series for {symbol} is not strictly increasing at index {index} ({date})")]
    UnorderedSeries {
        symbol: String,
        index: usize,
        date: NaiveDate,
    },
}

impl MetricsError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type alias for metrics operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Recoverable conditions raised while computing metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricWarning {
    /// Fewer observations than the metric's window; the prefix is undefined.
    #[error("{metric}: insufficient data (required {required} observations, available {available})")]
    InsufficientData {
        metric: Metric,
        required: usize,
        available: usize,
    },

    /// Division by zero or non-finite input; affected values are undefined.
    #[error("{metric}: degenerate input ({reason})")]
    DegenerateInput { metric: Metric, reason: String },

    /// The provider returned no data for the ticker.
    #[error("no price data for {symbol}")]
    MissingTickerData { symbol: String },
}

impl MetricWarning {
    pub fn degenerate(metric: Metric, reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            metric,
            reason: reason.into(),
        }
    }

    /// The metric the warning refers to, if any.
    #[must_use]
    pub const fn metric(&self) -> Option<Metric> {
        match self {
            Self::InsufficientData { metric, .. } | Self::DegenerateInput { metric, .. } => {
                Some(*metric)
            }
            Self::MissingTickerData { .. } => None,
        }
    }
}
