use crate::error::{MetricsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

/// Chronologically ordered daily bars for a single ticker.
///
/// Bars are strictly increasing by date. The series is read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Creates a series from bars that are already in chronological order.
    ///
    /// # Errors
    /// Returns `MetricsError::UnorderedSeries` if a bar's date is not later
    /// than the previous bar's date.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();

        if let Some(index) = bars.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(MetricsError::UnorderedSeries {
                symbol,
                index: index + 1,
                date: bars[index + 1].date,
            });
        }

        Ok(Self { symbol, bars })
    }

    /// Sorts bars by date and keeps the last bar for each duplicated date.
    #[must_use]
    pub fn from_unsorted(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps provider order within a date, so the last bar wins.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    #[must_use]
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    #[must_use]
    pub fn adj_closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.adj_close).collect()
    }

    #[must_use]
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn test_new_accepts_ordered_bars() {
        let series = PriceSeries::new("AAPL", vec![bar(1, 10.0), bar(4, 11.0), bar(5, 12.0)]).unwrap();

        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let err = PriceSeries::new("AAPL", vec![bar(1, 10.0), bar(1, 11.0)]).unwrap_err();
        assert!(matches!(err, MetricsError::UnorderedSeries { index: 1, .. }));
    }

    #[test]
    fn test_new_rejects_out_of_order_bars() {
        let err = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 11.0), bar(1, 9.0)]).unwrap_err();
        assert!(matches!(err, MetricsError::UnorderedSeries { index: 2, .. }));
    }

    #[test]
    fn test_from_unsorted_sorts_and_keeps_last_duplicate() {
        let series = PriceSeries::from_unsorted(
            "MSFT",
            vec![bar(3, 30.0), bar(1, 10.0), bar(3, 31.0), bar(2, 20.0)],
        );

        assert_eq!(series.closes(), vec![10.0, 20.0, 31.0]);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("NONE");
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
        assert!(series.volumes().is_empty());
    }
}
