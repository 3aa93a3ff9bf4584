//! Metric identifiers and per-ticker metric results.

use crate::error::MetricWarning;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed set of metrics computed for every ticker.
///
/// Declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MeanReversion,
    Vwap,
    Twap,
    Pov,
    DailyReturns,
    SharpeRatio,
    Macd,
    Rsi,
}

impl Metric {
    pub const ALL: [Self; 8] = [
        Self::MeanReversion,
        Self::Vwap,
        Self::Twap,
        Self::Pov,
        Self::DailyReturns,
        Self::SharpeRatio,
        Self::Macd,
        Self::Rsi,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MeanReversion => "mean_reversion",
            Self::Vwap => "vwap",
            Self::Twap => "twap",
            Self::Pov => "pov",
            Self::DailyReturns => "daily_returns",
            Self::SharpeRatio => "sharpe_ratio",
            Self::Macd => "macd",
            Self::Rsi => "rsi",
        }
    }

    /// Returns true if the metric yields a series aligned with the input bars.
    #[must_use]
    pub const fn is_series(self) -> bool {
        matches!(self, Self::Pov | Self::DailyReturns | Self::Macd | Self::Rsi)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed metric. `None` marks an undefined value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(Option<f64>),
    Series(Vec<Option<f64>>),
}

impl MetricValue {
    /// The all-undefined value for `metric` over `len` observations.
    #[must_use]
    pub fn undefined(metric: Metric, len: usize) -> Self {
        if metric.is_series() {
            Self::Series(vec![None; len])
        } else {
            Self::Scalar(None)
        }
    }

    #[must_use]
    pub const fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => *value,
            Self::Series(_) => None,
        }
    }

    #[must_use]
    pub fn as_series(&self) -> Option<&[Option<f64>]> {
        match self {
            Self::Scalar(_) => None,
            Self::Series(values) => Some(values),
        }
    }

    /// Number of defined points (0 or 1 for scalars).
    #[must_use]
    pub fn defined_count(&self) -> usize {
        match self {
            Self::Scalar(value) => usize::from(value.is_some()),
            Self::Series(values) => values.iter().filter(|v| v.is_some()).count(),
        }
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.defined_count() == 0
    }

    /// The most recent defined point.
    #[must_use]
    pub fn last_defined(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => *value,
            Self::Series(values) => values.iter().rev().find_map(|v| *v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickerStatus {
    Available,
    /// The provider returned no usable data for the ticker.
    Unavailable,
}

/// All eight metrics for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub symbol: String,
    pub status: TickerStatus,
    /// Number of observations the metrics were computed from.
    pub observations: usize,
    pub values: BTreeMap<Metric, MetricValue>,
    pub warnings: Vec<MetricWarning>,
}

impl MetricResult {
    /// Result for a ticker without data: every entry undefined.
    #[must_use]
    pub fn unavailable(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let values = Metric::ALL
            .into_iter()
            .map(|m| (m, MetricValue::undefined(m, 0)))
            .collect();

        Self {
            warnings: vec![MetricWarning::MissingTickerData {
                symbol: symbol.clone(),
            }],
            symbol,
            status: TickerStatus::Unavailable,
            observations: 0,
            values,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == TickerStatus::Available
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<&MetricValue> {
        self.values.get(&metric)
    }

    #[must_use]
    pub fn scalar(&self, metric: Metric) -> Option<f64> {
        self.get(metric).and_then(MetricValue::as_scalar)
    }

    #[must_use]
    pub fn series(&self, metric: Metric) -> Option<&[Option<f64>]> {
        self.get(metric).and_then(MetricValue::as_series)
    }
}
