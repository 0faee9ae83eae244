//! Relative Strength Index (RSI).
//!
//! Simple rolling means of gains and losses over `period` close deltas.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), defined from index `period`.
//! avg_loss == 0 saturates to 100 (including an all-flat window);
//! avg_gain == 0 pins to 0.

use crate::domain::PricePoint;
use crate::indicators::{rolling_mean, Indicator};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        let n = points.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let delta = points[i].close - points[i - 1].close;
            gains[i] = delta.max(0.0);
            losses[i] = (-delta).max(0.0);
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else {
                    rsi_value(g, l)
                }
            })
            .collect()
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_points};

    #[test]
    fn rsi_all_gains() {
        let points = make_points(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&points);
        // All positive deltas → RSI = 100 from the first defined index on.
        assert!(result[2].is_nan());
        assert_approx(result[3], 100.0, 1e-9);
        assert_approx(result[5], 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses() {
        let points = make_points(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&points);
        assert_approx(result[3], 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_window_saturates_high() {
        // No movement at all: every delta is zero, hence non-negative → 100.
        let points = make_points(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let result = Rsi::new(3).compute(&points);
        assert_approx(result[3], 100.0, 1e-9);
    }

    #[test]
    fn rsi_mixed_value() {
        // Closes: 44, 44.34, 44.09, 43.61, 44.33
        // Deltas: +0.34, -0.25, -0.48, +0.72
        // Window [deltas 2..=4]: gains (0 + 0 + 0.72)/3, losses (0.25 + 0.48 + 0)/3
        let points = make_points(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&points);
        let avg_gain = 0.72 / 3.0;
        let avg_loss = 0.73 / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert_approx(result[4], expected, 1e-9);
    }

    #[test]
    fn rsi_undefined_before_period_deltas() {
        let points = make_points(&[100.0, 101.0, 99.0, 102.0, 98.0]);
        let result = Rsi::new(3).compute(&points);
        for v in &result[..3] {
            assert!(v.is_nan());
        }
        assert!(!result[3].is_nan());
    }

    #[test]
    fn rsi_bounds() {
        let points = make_points(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&points);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at index {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_short_series_all_undefined() {
        let points = make_points(&[100.0, 101.0]);
        let result = Rsi::new(14).compute(&points);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
