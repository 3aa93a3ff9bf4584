//! Descriptive financial metrics over a single [`PriceSeries`].
//!
//! Every function is pure and reads the series without modifying it.
//! Undefined values are reported as `None`:
//! - the first element of percentage-change series,
//! - the warm-up prefix of windowed series (RSI, MACD with `min_periods`),
//! - any point where the formula would divide by zero.
//!
//! Rolling computations use explicit accumulators (a sliding window for RSI,
//! incremental state for the EMA) rather than a table-wide library.

use crate::error::{MetricWarning, MetricsError, Result};
use crate::metric::{Metric, MetricResult, MetricValue, TickerStatus};
use crate::price::PriceSeries;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;
pub const DEFAULT_MACD_SHORT: usize = 12;
pub const DEFAULT_MACD_LONG: usize = 26;
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Standard deviations at or below this (relative to the mean) count as zero variance.
const VARIANCE_EPSILON: f64 = 1e-12;

/// Tunable inputs of the parameterised metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsParams {
    /// Per-period risk-free rate subtracted from daily returns.
    pub risk_free_rate: f64,
    /// Span of the fast EMA.
    pub macd_short: usize,
    /// Span of the slow EMA.
    pub macd_long: usize,
    /// Observations required before MACD is reported (0 = from the first bar).
    pub macd_min_periods: usize,
    /// Number of close-to-close differences averaged by RSI.
    pub rsi_period: usize,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            macd_short: DEFAULT_MACD_SHORT,
            macd_long: DEFAULT_MACD_LONG,
            macd_min_periods: 0,
            rsi_period: DEFAULT_RSI_PERIOD,
        }
    }
}

impl MetricsParams {
    #[must_use]
    pub const fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    #[must_use]
    pub const fn with_macd_windows(mut self, short: usize, long: usize) -> Self {
        self.macd_short = short;
        self.macd_long = long;
        self
    }

    #[must_use]
    pub const fn with_macd_min_periods(mut self, min_periods: usize) -> Self {
        self.macd_min_periods = min_periods;
        self
    }

    #[must_use]
    pub const fn with_rsi_period(mut self, period: usize) -> Self {
        self.rsi_period = period;
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    /// Returns `MetricsError::InvalidParameter` for zero spans or periods,
    /// a short span not below the long span, or a non-finite risk-free rate.
    pub fn validate(&self) -> Result<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(MetricsError::invalid_parameter(
                "risk_free_rate",
                format!("must be finite, got {}", self.risk_free_rate),
            ));
        }
        if self.macd_short == 0 {
            return Err(MetricsError::invalid_parameter("macd_short", "must be at least 1"));
        }
        if self.macd_short >= self.macd_long {
            return Err(MetricsError::invalid_parameter(
                "macd_short",
                format!(
                    "must be less than macd_long ({} >= {})",
                    self.macd_short, self.macd_long
                ),
            ));
        }
        if self.rsi_period == 0 {
            return Err(MetricsError::invalid_parameter("rsi_period", "must be at least 1"));
        }
        Ok(())
    }
}

/// Arithmetic mean of the close price.
#[must_use]
pub fn mean_reversion(series: &PriceSeries) -> Option<f64> {
    mean(&series.closes())
}

/// Volume-weighted average of the adjusted close.
///
/// ```
/// use chrono::NaiveDate;
/// use stock_metrics_core::{metrics::vwap, Bar, PriceSeries};
///
/// let bar = |day, price, volume| Bar {
///     date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
///     open: price, high: price, low: price, close: price, adj_close: price, volume,
/// };
/// let series = PriceSeries::new("ABC", vec![bar(2, 10.0, 100.0), bar(3, 20.0, 300.0)]).unwrap();
/// assert_eq!(vwap(&series), Some(17.5));
/// ```
#[must_use]
pub fn vwap(series: &PriceSeries) -> Option<f64> {
    let (notional, volume) = series
        .bars()
        .iter()
        .fold((0.0, 0.0), |(pv, v), bar| (pv + bar.adj_close * bar.volume, v + bar.volume));

    if volume == 0.0 {
        return None;
    }
    finite(notional / volume)
}

/// Time-weighted average of the adjusted close.
#[must_use]
pub fn twap(series: &PriceSeries) -> Option<f64> {
    mean(&series.adj_closes())
}

/// Period-over-period fractional change in volume.
#[must_use]
pub fn pov(series: &PriceSeries) -> Vec<Option<f64>> {
    pct_change(&series.volumes())
}

/// Period-over-period fractional change in close.
#[must_use]
pub fn daily_returns(series: &PriceSeries) -> Vec<Option<f64>> {
    pct_change(&series.closes())
}

/// Mean excess daily return divided by its sample standard deviation.
///
/// Not annualised. `None` with fewer than two returns or zero variance.
#[must_use]
pub fn sharpe_ratio(series: &PriceSeries, risk_free_rate: f64) -> Option<f64> {
    let excess: Vec<f64> = daily_returns(series)
        .into_iter()
        .flatten()
        .map(|r| r - risk_free_rate)
        .collect();

    if excess.len() < 2 {
        return None;
    }

    let mean_excess = mean(&excess)?;
    let variance = excess
        .iter()
        .map(|r| (r - mean_excess).powi(2))
        .sum::<f64>()
        / (excess.len() - 1) as f64;
    let std_dev = variance.sqrt();

    if !std_dev.is_finite() || std_dev <= VARIANCE_EPSILON * mean_excess.abs().max(1.0) {
        return None;
    }
    finite(mean_excess / std_dev)
}

/// Fast EMA minus slow EMA of the close.
///
/// Both EMAs are seeded at the first close. Points before `min_periods`
/// observations are undefined.
#[must_use]
pub fn macd(series: &PriceSeries, short: usize, long: usize, min_periods: usize) -> Vec<Option<f64>> {
    let closes = series.closes();
    let fast = ema(&closes, short);
    let slow = ema(&closes, long);

    fast.into_iter()
        .zip(slow)
        .enumerate()
        .map(|(i, (f, s))| {
            if i + 1 < min_periods {
                None
            } else {
                f.zip(s).and_then(|(f, s)| finite(f - s))
            }
        })
        .collect()
}

/// Relative strength index over a trailing window of `period` differences.
///
/// Index `i` is defined only once `period` differences are available
/// (`i >= period`). A window with no losses reads 100; a flat window is undefined.
#[must_use]
pub fn rsi(series: &PriceSeries, period: usize) -> Vec<Option<f64>> {
    let closes = series.closes();
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }

    // (gain, loss) per difference; None where the difference is not finite.
    let mut window: VecDeque<Option<(f64, f64)>> = VecDeque::with_capacity(period + 1);

    for i in 1..closes.len() {
        let diff = closes[i] - closes[i - 1];
        let entry = diff.is_finite().then(|| (diff.max(0.0), (-diff).max(0.0)));

        window.push_back(entry);
        if window.len() > period {
            window.pop_front();
        }
        if window.len() < period {
            continue;
        }

        let sums = window
            .iter()
            .try_fold((0.0, 0.0), |(g, l), e| e.map(|(eg, el)| (g + eg, l + el)));
        if let Some((gain_sum, loss_sum)) = sums {
            out[i] = rsi_value(gain_sum / period as f64, loss_sum / period as f64);
        }
    }

    out
}

/// Runs all eight metrics for one ticker and collects soft warnings.
///
/// An empty series yields an unavailable result with every entry undefined.
///
/// # Errors
/// Returns an error only if `params` fail validation.
pub fn compute_metrics(series: &PriceSeries, params: &MetricsParams) -> Result<MetricResult> {
    params.validate()?;

    if series.is_empty() {
        return Ok(MetricResult::unavailable(series.symbol()));
    }

    let n = series.len();
    let mut warnings = Vec::new();
    let mut values = BTreeMap::new();

    let mean_close = mean_reversion(series);
    if mean_close.is_none() {
        warnings.push(MetricWarning::degenerate(
            Metric::MeanReversion,
            "non-finite close prices",
        ));
    }
    values.insert(Metric::MeanReversion, MetricValue::Scalar(mean_close));

    let vwap_value = vwap(series);
    if vwap_value.is_none() {
        warnings.push(MetricWarning::degenerate(
            Metric::Vwap,
            "total volume is zero or non-finite",
        ));
    }
    values.insert(Metric::Vwap, MetricValue::Scalar(vwap_value));

    let twap_value = twap(series);
    if twap_value.is_none() {
        warnings.push(MetricWarning::degenerate(
            Metric::Twap,
            "non-finite adjusted close prices",
        ));
    }
    values.insert(Metric::Twap, MetricValue::Scalar(twap_value));

    for (metric, changes, field) in [
        (Metric::Pov, pov(series), "volume"),
        (Metric::DailyReturns, daily_returns(series), "close"),
    ] {
        if n < 2 {
            warnings.push(MetricWarning::InsufficientData {
                metric,
                required: 2,
                available: n,
            });
        } else {
            let gaps = changes.iter().skip(1).filter(|c| c.is_none()).count();
            if gaps > 0 {
                warnings.push(MetricWarning::degenerate(
                    metric,
                    format!("{gaps} period(s) follow a zero or non-finite {field}"),
                ));
            }
        }
        values.insert(metric, MetricValue::Series(changes));
    }

    let sharpe = sharpe_ratio(series, params.risk_free_rate);
    if sharpe.is_none() {
        let defined_returns = values
            .get(&Metric::DailyReturns)
            .map_or(0, MetricValue::defined_count);
        if defined_returns < 2 {
            warnings.push(MetricWarning::InsufficientData {
                metric: Metric::SharpeRatio,
                required: 2,
                available: defined_returns,
            });
        } else {
            warnings.push(MetricWarning::degenerate(
                Metric::SharpeRatio,
                "excess returns have zero variance",
            ));
        }
    }
    values.insert(Metric::SharpeRatio, MetricValue::Scalar(sharpe));

    if params.macd_min_periods > n {
        warnings.push(MetricWarning::InsufficientData {
            metric: Metric::Macd,
            required: params.macd_min_periods,
            available: n,
        });
    }
    values.insert(
        Metric::Macd,
        MetricValue::Series(macd(
            series,
            params.macd_short,
            params.macd_long,
            params.macd_min_periods,
        )),
    );

    if n <= params.rsi_period {
        warnings.push(MetricWarning::InsufficientData {
            metric: Metric::Rsi,
            required: params.rsi_period + 1,
            available: n,
        });
    }
    values.insert(Metric::Rsi, MetricValue::Series(rsi(series, params.rsi_period)));

    Ok(MetricResult {
        symbol: series.symbol().to_string(),
        status: TickerStatus::Available,
        observations: n,
        values,
        warnings,
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    finite(values.iter().sum::<f64>() / values.len() as f64)
}

fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    out.push(None);
    for pair in values.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        out.push(if prev == 0.0 { None } else { finite(curr / prev - 1.0) });
    }
    out
}

/// EMA with smoothing factor `2 / (span + 1)`, seeded at the first finite value.
fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut state: Option<f64> = None;

    values
        .iter()
        .map(|&x| {
            if !x.is_finite() {
                return None;
            }
            let next = match state {
                None => x,
                Some(prev) => prev + alpha * (x - prev),
            };
            state = Some(next);
            state
        })
        .collect()
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return (avg_gain > 0.0).then_some(100.0);
    }
    finite(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Bar;
    use chrono::{Days, NaiveDate};

    fn series_from(closes: &[f64], volumes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| Bar {
                date: start + Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                adj_close: close,
                volume,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn closes_only(closes: &[f64]) -> PriceSeries {
        series_from(closes, &vec![100.0; closes.len()])
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be defined");
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    // ==================== Scalar Metric Tests ====================

    #[test]
    fn test_constant_price_averages_equal_constant() {
        let series = series_from(&[42.5; 10], &[10.0, 20.0, 5.0, 1.0, 7.0, 3.0, 9.0, 2.0, 4.0, 8.0]);

        assert_eq!(mean_reversion(&series), Some(42.5));
        assert_eq!(twap(&series), Some(42.5));
        assert_close(vwap(&series), 42.5);
    }

    #[test]
    fn test_scenario_mean_and_vwap() {
        let series = series_from(&[10.0, 11.0, 12.0, 11.0, 10.0], &[100.0; 5]);

        assert_close(mean_reversion(&series), 10.8);
        assert_close(vwap(&series), 10.8);
        assert_close(twap(&series), 10.8);
    }

    #[test]
    fn test_vwap_invariant_to_volume_scaling() {
        let closes = [10.0, 12.5, 11.0, 14.0];
        let volumes = [300.0, 100.0, 250.0, 50.0];
        let scaled: Vec<f64> = volumes.iter().map(|v| v * 37.0).collect();

        let base = vwap(&series_from(&closes, &volumes)).unwrap();
        let scaled = vwap(&series_from(&closes, &scaled)).unwrap();

        assert!((base - scaled).abs() < 1e-9);
    }

    #[test]
    fn test_vwap_zero_volume_is_undefined() {
        let series = series_from(&[10.0, 11.0], &[0.0, 0.0]);
        assert_eq!(vwap(&series), None);
    }

    #[test]
    fn test_vwap_uses_adjusted_close() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = vec![
            Bar {
                date: start,
                open: 20.0,
                high: 20.0,
                low: 20.0,
                close: 20.0,
                adj_close: 10.0,
                volume: 1.0,
            },
            Bar {
                date: start + Days::new(1),
                open: 20.0,
                high: 20.0,
                low: 20.0,
                close: 20.0,
                adj_close: 30.0,
                volume: 3.0,
            },
        ];
        let series = PriceSeries::new("ADJ", bars).unwrap();

        assert_eq!(vwap(&series), Some(25.0));
        assert_eq!(twap(&series), Some(20.0));
        assert_eq!(mean_reversion(&series), Some(20.0));
    }

    #[test]
    fn test_scalars_on_empty_series_are_undefined() {
        let series = PriceSeries::empty("NONE");
        assert_eq!(mean_reversion(&series), None);
        assert_eq!(vwap(&series), None);
        assert_eq!(twap(&series), None);
        assert_eq!(sharpe_ratio(&series, 0.01), None);
    }

    // ==================== Percentage Change Tests ====================

    #[test]
    fn test_scenario_daily_returns() {
        let returns = daily_returns(&closes_only(&[10.0, 11.0, 12.0, 11.0, 10.0]));

        assert_eq!(returns.len(), 5);
        assert_eq!(returns[0], None);
        assert_close(returns[1], 0.10);
        assert_close(returns[2], 0.0909);
        assert_close(returns[3], -0.0833);
        assert_close(returns[4], -0.0909);
    }

    #[test]
    fn test_daily_returns_match_ratio_definition() {
        let closes = [3.0, 7.5, 6.0, 6.6, 1.2, 9.9];
        let returns = daily_returns(&closes_only(&closes));

        for i in 1..closes.len() {
            let expected = closes[i] / closes[i - 1] - 1.0;
            assert!((returns[i].unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pov_tracks_volume_changes() {
        let series = series_from(&[1.0, 1.0, 1.0, 1.0], &[100.0, 150.0, 75.0, 0.0]);
        let changes = pov(&series);

        assert_eq!(changes, vec![None, Some(0.5), Some(-0.5), Some(-1.0)]);
    }

    #[test]
    fn test_pct_change_after_zero_is_undefined() {
        let series = series_from(&[1.0, 1.0, 1.0], &[0.0, 10.0, 20.0]);
        assert_eq!(pov(&series), vec![None, None, Some(1.0)]);
    }

    // ==================== Sharpe Ratio Tests ====================

    #[test]
    fn test_sharpe_ratio_known_value() {
        let series = closes_only(&[100.0, 110.0, 99.0]);
        // excess = [0.09, -0.11], mean = -0.01, sample std = 0.141421
        assert_close(sharpe_ratio(&series, 0.01), -0.070_710_7);
    }

    #[test]
    fn test_sharpe_ratio_zero_variance_is_undefined() {
        let series = closes_only(&[50.0; 30]);
        assert_eq!(sharpe_ratio(&series, 0.01), None);
    }

    #[test]
    fn test_sharpe_ratio_constant_growth_is_undefined() {
        let closes: Vec<f64> = (0..20).map(|i| 2f64.powi(i)).collect();
        assert_eq!(sharpe_ratio(&closes_only(&closes), 0.0), None);
    }

    #[test]
    fn test_sharpe_ratio_single_return_is_undefined() {
        assert_eq!(sharpe_ratio(&closes_only(&[10.0, 11.0]), 0.01), None);
    }

    // ==================== MACD Tests ====================

    #[test]
    fn test_macd_constant_series_is_zero() {
        let series = closes_only(&[73.25; 40]);
        let values = macd(&series, 12, 26, 0);

        assert_eq!(values.len(), 40);
        assert!(values.iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_macd_known_values() {
        // span 1 tracks the price exactly; span 3 uses alpha = 0.5
        let values = macd(&closes_only(&[1.0, 2.0, 4.0]), 1, 3, 0);
        // slow EMA: 1.0, 1.5, 2.75
        assert_eq!(values, vec![Some(0.0), Some(0.5), Some(1.25)]);
    }

    #[test]
    fn test_macd_min_periods_masks_warm_up() {
        let values = macd(&closes_only(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2, 4, 3);

        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert!(values[2..].iter().all(Option::is_some));
    }

    #[test]
    fn test_macd_rising_series_is_positive() {
        let closes: Vec<f64> = (1..=60).map(f64::from).collect();
        let values = macd(&closes_only(&closes), 12, 26, 0);
        assert!(values[1..].iter().all(|v| v.unwrap() > 0.0));
    }

    // ==================== RSI Tests ====================

    #[test]
    fn test_rsi_short_series_is_all_undefined() {
        let values = rsi(&closes_only(&[10.0, 11.0, 12.0, 11.0, 10.0]), 14);
        assert_eq!(values, vec![None; 5]);
    }

    #[test]
    fn test_rsi_first_defined_index_equals_period() {
        let closes: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        let values = rsi(&closes_only(&closes), 14);

        assert!(values[..14].iter().all(Option::is_none));
        assert!(values[14..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_balanced_window_is_fifty() {
        let values = rsi(&closes_only(&[1.0, 2.0, 1.0, 2.0]), 2);
        assert_eq!(values, vec![None, None, Some(50.0), Some(50.0)]);
    }

    #[test]
    fn test_rsi_increasing_series_reads_hundred() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let values = rsi(&closes_only(&closes), 14);
        assert!(values[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_decreasing_series_reads_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(f64::from).collect();
        let values = rsi(&closes_only(&closes), 14);
        assert!(values[14..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_rsi_flat_window_is_undefined() {
        let values = rsi(&closes_only(&[5.0; 20]), 14);
        assert!(values.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_stays_in_range() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.21, 46.25, 45.71, 46.45,
        ];
        let values = rsi(&closes_only(&closes), 14);

        for value in values.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI out of range: {value}");
        }
    }

    // ==================== Parameter Tests ====================

    #[test]
    fn test_default_params() {
        let params = MetricsParams::default();
        assert!((params.risk_free_rate - 0.01).abs() < f64::EPSILON);
        assert_eq!(params.macd_short, 12);
        assert_eq!(params.macd_long, 26);
        assert_eq!(params.rsi_period, 14);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_reject_inverted_macd_windows() {
        let params = MetricsParams::default().with_macd_windows(26, 12);
        assert!(matches!(
            params.validate(),
            Err(MetricsError::InvalidParameter { name: "macd_short", .. })
        ));
    }

    #[test]
    fn test_params_reject_zero_rsi_period() {
        let params = MetricsParams::default().with_rsi_period(0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_reject_nan_risk_free_rate() {
        let params = MetricsParams::default().with_risk_free_rate(f64::NAN);
        assert!(params.validate().is_err());
    }

    // ==================== compute_metrics Tests ====================

    #[test]
    fn test_compute_metrics_scenario() {
        let series = series_from(&[10.0, 11.0, 12.0, 11.0, 10.0], &[100.0; 5]);
        let result = compute_metrics(&series, &MetricsParams::default()).unwrap();

        assert!(result.is_available());
        assert_eq!(result.observations, 5);
        assert_eq!(result.values.len(), 8);
        assert_close(result.scalar(Metric::MeanReversion), 10.8);
        assert_close(result.scalar(Metric::Vwap), 10.8);

        for metric in Metric::ALL.into_iter().filter(|m| m.is_series()) {
            assert_eq!(result.series(metric).unwrap().len(), 5);
        }
        assert!(result.series(Metric::Rsi).unwrap().iter().all(Option::is_none));
        assert!(result.warnings.contains(&MetricWarning::InsufficientData {
            metric: Metric::Rsi,
            required: 15,
            available: 5,
        }));
    }

    #[test]
    fn test_compute_metrics_empty_series_is_unavailable() {
        let result = compute_metrics(&PriceSeries::empty("GONE"), &MetricsParams::default()).unwrap();

        assert!(!result.is_available());
        assert_eq!(result.symbol, "GONE");
        assert!(result.values.values().all(MetricValue::is_undefined));
        assert_eq!(result.values.len(), 8);
    }

    #[test]
    fn test_compute_metrics_flags_zero_variance_sharpe() {
        let result = compute_metrics(&closes_only(&[20.0; 10]), &MetricsParams::default()).unwrap();

        assert_eq!(result.scalar(Metric::SharpeRatio), None);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, MetricWarning::DegenerateInput { metric: Metric::SharpeRatio, .. })));
    }

    #[test]
    fn test_compute_metrics_sharpe_counts_defined_returns() {
        // Every return follows a zero close, so none is defined.
        let result =
            compute_metrics(&closes_only(&[0.0, 0.0, 0.0, 1.0]), &MetricsParams::default()).unwrap();

        assert_eq!(result.scalar(Metric::SharpeRatio), None);
        let sharpe: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| w.metric() == Some(Metric::SharpeRatio))
            .collect();
        assert_eq!(
            sharpe,
            vec![&MetricWarning::InsufficientData {
                metric: Metric::SharpeRatio,
                required: 2,
                available: 0,
            }]
        );
    }

    #[test]
    fn test_compute_metrics_flags_zero_volume() {
        let series = series_from(&[10.0, 11.0, 12.0], &[0.0, 0.0, 0.0]);
        let result = compute_metrics(&series, &MetricsParams::default()).unwrap();

        assert_eq!(result.scalar(Metric::Vwap), None);
        let degenerate: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| matches!(w, MetricWarning::DegenerateInput { .. }))
            .filter_map(MetricWarning::metric)
            .collect();
        assert!(degenerate.contains(&Metric::Vwap));
        assert!(degenerate.contains(&Metric::Pov));
    }

    #[test]
    fn test_compute_metrics_rejects_invalid_params() {
        let params = MetricsParams::default().with_macd_windows(0, 26);
        assert!(compute_metrics(&closes_only(&[1.0, 2.0]), &params).is_err());
    }
}
