//! Indicator library.
//!
//! Indicators are pure functions: point history in, numeric series out, with
//! `f64::NAN` marking undefined warmup values. Undefined is never silently
//! treated as zero — snapshot assembly converts trailing NaN to `None` and
//! the signal layer skips rules whose inputs are undefined.
//!
//! All smoothing here is a simple rolling mean; the trend band is the one
//! stateful exception (a left-to-right scan, see [`trend_band`]).

pub mod atr;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod trend_band;

pub use atr::Atr;
pub use rsi::Rsi;
pub use sma::Sma;
pub use snapshot::IndicatorSnapshot;
pub use trend_band::{TrendBand, TrendDirection, TrendPoint};

use crate::domain::PricePoint;

/// Trait for indicators.
///
/// Indicators take a full point series and produce a numeric output series of
/// the same length. Values before the warmup boundary are `f64::NAN`.
/// No output at index t may depend on data from index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "atr_14", "sma_200").
    fn name(&self) -> &str;

    /// Number of points consumed before the first defined output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    fn compute(&self, points: &[PricePoint]) -> Vec<f64>;
}

/// Simple rolling mean over a window of `period` values.
///
/// Output[i] is the mean of values[i-period+1..=i]; NaN while the window is
/// incomplete or contains a NaN. Windows are rechecked after a NaN passes
/// through so a single undefined input cannot poison the running sum.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let mut sum = 0.0;
    let mut nan_in_window = false;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            nan_in_window = true;
        }
        sum += v;
    }
    if !nan_in_window {
        result[period - 1] = sum / period as f64;
    }

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];
        sum = sum - leaving + entering;

        if entering.is_nan() || leaving.is_nan() || nan_in_window {
            nan_in_window = false;
            sum = 0.0;
            for &v in &values[(i + 1 - period)..=i] {
                if v.is_nan() {
                    nan_in_window = true;
                }
                sum += v;
            }
            if nan_in_window {
                continue;
            }
        }

        result[i] = sum / period as f64;
    }

    result
}

/// Last value of a computed series if defined; the "current" snapshot value.
pub(crate) fn current_value(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| !v.is_nan())
}

/// Create synthetic points from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for the first
/// point), high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000.
#[cfg(test)]
pub fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PricePoint {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
