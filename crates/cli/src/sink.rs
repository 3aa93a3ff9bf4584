//! Report sinks writing to stdout (or any writer).

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use stock_metrics_core::{BatchSummary, MetricResult, MetricsFormatter, ReportSink};

/// Plain-text report built by [`MetricsFormatter`].
pub struct TextSink<W: Write + Send> {
    writer: W,
    show_warnings: bool,
}

impl<W: Write + Send> TextSink<W> {
    pub const fn new(writer: W, show_warnings: bool) -> Self {
        Self {
            writer,
            show_warnings,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ReportSink for TextSink<W> {
    fn render(&mut self, results: &[MetricResult]) -> Result<()> {
        let report = MetricsFormatter::format_batch(results, self.show_warnings);
        self.writer
            .write_all(report.as_bytes())
            .context("Failed to write text report")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: BatchSummary,
    tickers: &'a [MetricResult],
}

/// Pretty-printed JSON report; undefined values are `null`.
pub struct JsonSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ReportSink for JsonSink<W> {
    fn render(&mut self, results: &[MetricResult]) -> Result<()> {
        let report = JsonReport {
            summary: BatchSummary::from_results(results),
            tickers: results,
        };
        serde_json::to_writer_pretty(&mut self.writer, &report)
            .context("Failed to write JSON report")?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use stock_metrics_core::{compute_metrics, Bar, Metric, MetricsParams, PriceSeries};

    fn results() -> Vec<MetricResult> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = [10.0, 11.0, 12.0, 11.0, 10.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                adj_close: close,
                volume: 100.0,
            })
            .collect();
        let series = PriceSeries::new("ABC", bars).unwrap();
        vec![
            compute_metrics(&series, &MetricsParams::default()).unwrap(),
            MetricResult::unavailable("GONE"),
        ]
    }

    #[test]
    fn test_text_sink_writes_formatted_report() {
        let mut sink = TextSink::new(Vec::new(), false);
        sink.render(&results()).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("Metrics for ABC"));
        assert!(output.contains("Metrics for GONE"));
        assert!(output.contains("2 tickers: 1 available, 1 unavailable"));
    }

    #[test]
    fn test_json_sink_uses_null_for_undefined() {
        let mut sink = JsonSink::new(Vec::new());
        sink.render(&results()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(value["summary"]["total"], 2);

        let abc = &value["tickers"][0];
        assert_eq!(abc["symbol"], "ABC");
        assert!((abc["values"][Metric::MeanReversion.as_str()].as_f64().unwrap() - 10.8).abs() < 1e-9);
        assert!(abc["values"]["daily_returns"][0].is_null());
        assert!(abc["values"]["rsi"].as_array().unwrap().iter().all(serde_json::Value::is_null));

        let gone = &value["tickers"][1];
        assert!(gone["values"]["vwap"].is_null());
    }
}
