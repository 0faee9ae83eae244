//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices; with period 200 this is the long-horizon
//! trend reference the regime classifier gates on.

use crate::domain::PricePoint;
use crate::indicators::{rolling_mean, Indicator};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        rolling_mean(&closes, self.period)
    }
}
