//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR is the simple rolling mean of true range over `period` points, so the
//! first defined value sits at index period-1 (TR[0] falls back to high-low,
//! which has no previous close to compare against).

use crate::domain::PricePoint;
use crate::indicators::{rolling_mean, Indicator};

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// Compute the True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(points: &[PricePoint]) -> Vec<f64> {
    let n = points.len();
    let mut tr = vec![f64::NAN; n];

    if n == 0 {
        return tr;
    }

    tr[0] = points[0].high - points[0].low;

    for i in 1..n {
        let h = points[i].high;
        let l = points[i].low;
        let pc = points[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        rolling_mean(&true_range(points), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn make_ohlc_points(data: &[(f64, f64, f64, f64)]) -> Vec<PricePoint> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| PricePoint {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn true_range_basic() {
        let points = make_ohlc_points(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&points);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 108-115
        let points = make_ohlc_points(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range(&points);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let points = make_ohlc_points(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let atr = Atr::new(3);
        let result = atr.compute(&points);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // ATR[2] = mean(10, 8, 9) = 9
        assert_approx(result[2], 9.0, DEFAULT_EPSILON);
        // ATR[3] = mean(8, 9, 6)
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        // ATR[4] = mean(9, 6, 6) = 7
        assert_approx(result[4], 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_exact_period_points() {
        // Series of exactly `period` points: first period-1 undefined, the
        // last value equals the mean of all true ranges.
        let points = make_ohlc_points(&[
            (100.0, 104.0, 96.0, 100.0), // TR = 8
            (100.0, 106.0, 98.0, 104.0), // TR = 8
            (104.0, 110.0, 104.0, 108.0), // TR = 6
        ]);
        let atr = Atr::new(3);
        let result = atr.compute(&points);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 22.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_too_few_points() {
        let points = make_ohlc_points(&[(100.0, 105.0, 95.0, 102.0)]);
        let result = Atr::new(3).compute(&points);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn atr_lookback() {
        assert_eq!(Atr::new(14).lookback(), 13);
    }
}
