use crate::metrics::MetricsParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub metrics: MetricsParams,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub screener_url: String,
    pub chart_url: String,
    /// Predefined screener used as the ticker source.
    pub screener_id: String,
    /// Number of tickers requested from the screener.
    pub ticker_count: u32,
    /// History range, e.g. `1y`.
    pub lookback: String,
    /// Bar interval, e.g. `1d`.
    pub interval: String,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Invalid report format: '{}'. Valid values: text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Print soft warnings under each ticker in text reports.
    pub show_warnings: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            screener_url: "https://query1.finance.yahoo.com/v1/finance/screener/predefined/saved"
                .to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            screener_id: "day_gainers".to_string(),
            ticker_count: 25,
            lookback: "1y".to_string(),
            interval: "1d".to_string(),
            timeout_secs: 30,
            requests_per_minute: 60,
            user_agent: "Mozilla/5.0 (compatible; stock-metrics/0.1)".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            show_warnings: true,
        }
    }
}
