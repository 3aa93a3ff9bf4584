#![allow(clippy::format_push_string)]

use crate::engine::BatchSummary;
use crate::metric::{Metric, MetricResult, TickerStatus};

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════════════\n";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────────────\n";

pub struct MetricsFormatter;

impl MetricsFormatter {
    #[must_use]
    pub fn format(result: &MetricResult, show_warnings: bool) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE_HEAVY);
        output.push_str(&format!("Metrics for {}\n", result.symbol));
        output.push_str(RULE_HEAVY);

        if result.status == TickerStatus::Unavailable {
            output.push_str("No price data available; all metrics undefined.\n");
        } else {
            output.push_str(&format!("Observations:          {}\n", result.observations));
        }
        output.push('\n');

        // Scalars
        output.push_str("Summary\n");
        output.push_str(RULE_LIGHT);
        for metric in Metric::ALL.into_iter().filter(|m| !m.is_series()) {
            let value = result.scalar(metric);
            output.push_str(&format!("{:<23}{}\n", label(metric), fmt_value(value)));
        }
        output.push('\n');

        // Series
        output.push_str("Series (defined / total, latest)\n");
        output.push_str(RULE_LIGHT);
        for metric in Metric::ALL.into_iter().filter(|m| m.is_series()) {
            let (defined, total, latest) = result.get(metric).map_or((0, 0, None), |value| {
                (
                    value.defined_count(),
                    value.as_series().map_or(0, <[Option<f64>]>::len),
                    value.last_defined(),
                )
            });
            output.push_str(&format!(
                "{:<23}{:>4} / {:<4} {}\n",
                label(metric),
                defined,
                total,
                fmt_value(latest)
            ));
        }

        if show_warnings && !result.warnings.is_empty() {
            output.push('\n');
            output.push_str("Warnings\n");
            output.push_str(RULE_LIGHT);
            for warning in &result.warnings {
                output.push_str(&format!("⚠️  {warning}\n"));
            }
        }

        output
    }

    #[must_use]
    pub fn format_batch(results: &[MetricResult], show_warnings: bool) -> String {
        let mut output: String = results
            .iter()
            .map(|r| Self::format(r, show_warnings))
            .collect();

        let summary = BatchSummary::from_results(results);
        output.push('\n');
        output.push_str(RULE_HEAVY);
        output.push_str(&format!(
            "{} tickers: {} available, {} unavailable\n",
            summary.total, summary.available, summary.unavailable
        ));
        output.push_str(RULE_HEAVY);

        output
    }
}

fn label(metric: Metric) -> &'static str {
    match metric {
        Metric::MeanReversion => "Mean Close:",
        Metric::Vwap => "VWAP:",
        Metric::Twap => "TWAP:",
        Metric::Pov => "Volume Change:",
        Metric::DailyReturns => "Daily Returns:",
        Metric::SharpeRatio => "Sharpe Ratio:",
        Metric::Macd => "MACD:",
        Metric::Rsi => "RSI:",
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.4}"))
}
