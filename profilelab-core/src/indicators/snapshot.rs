//! Current-value snapshot of the indicator set.
//!
//! One evaluation cycle needs only the latest value of each indicator; this
//! collapses the full series into `Option`s so undefined warmup values can
//! never leak into the signal layer as zeros.

use serde::Serialize;

use crate::domain::PricePoint;
use crate::indicators::{current_value, Atr, Indicator, Rsi, Sma, TrendBand, TrendPoint};
use crate::params::StrategyParams;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IndicatorSnapshot {
    /// Average true range, None until `atr_period` points exist.
    pub atr: Option<f64>,
    /// Relative strength index, None until `rsi_period` deltas exist.
    pub rsi: Option<f64>,
    /// Long-horizon SMA (trend reference), None until `sma_period` points exist.
    pub sma: Option<f64>,
    /// Trend band direction + active stop, None during ATR warmup.
    pub trend: Option<TrendPoint>,
}

impl IndicatorSnapshot {
    /// Assemble the snapshot from the latest values of each indicator.
    pub fn from_series(points: &[PricePoint], params: &StrategyParams) -> Self {
        let atr = current_value(&Atr::new(params.atr_period).compute(points));
        let rsi = current_value(&Rsi::new(params.rsi_period).compute(points));
        let sma = current_value(&Sma::new(params.sma_period).compute(points));
        let trend = TrendBand::new(params.trend_band_period, params.trend_band_multiplier)
            .compute_points(points)
            .last()
            .copied()
            .flatten();

        Self {
            atr,
            rsi,
            sma,
            trend,
        }
    }
}
