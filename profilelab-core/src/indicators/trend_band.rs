//! Trend band — ATR-based directional stop indicator.
//!
//! Inherently sequential: each point's bands depend on the previous point's
//! bands and direction, so the series is produced by a left-to-right scan
//! carrying `{prior_upper, prior_lower, prior_direction}` — never as an
//! independent-per-point map.
//!
//! Band recurrence over hl2 ± multiplier * ATR: the upper band only ratchets
//! down while closes stay below it, the lower band only ratchets up while
//! closes stay above it, and direction flips when close crosses the active
//! band. Output per point: the direction and the active stop (lower band
//! while trending up, upper band while trending down).

use serde::{Deserialize, Serialize};

use crate::domain::PricePoint;
use crate::indicators::atr::true_range;
use crate::indicators::{rolling_mean, Indicator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
}

/// One defined trend-band output: current direction and the active stop level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub direction: TrendDirection,
    pub stop: f64,
}

/// Carried scan state: the prior point's bands and direction.
#[derive(Debug, Clone, Copy)]
struct BandState {
    upper: f64,
    lower: f64,
    direction: TrendDirection,
}

#[derive(Debug, Clone)]
pub struct TrendBand {
    period: usize,
    multiplier: f64,
    name: String,
}

impl TrendBand {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "trend band period must be >= 1");
        Self {
            period,
            multiplier,
            name: format!("trend_band_{period}_{multiplier}"),
        }
    }

    /// Full output series; None while ATR is still warming up.
    pub fn compute_points(&self, points: &[PricePoint]) -> Vec<Option<TrendPoint>> {
        let n = points.len();
        let atr = rolling_mean(&true_range(points), self.period);

        let Some(start) = atr.iter().position(|v| !v.is_nan()) else {
            return vec![None; n];
        };

        // Initial state: direction defaults to Up, bands equal the first
        // defined basic band values.
        let hl2 = (points[start].high + points[start].low) / 2.0;
        let seed = BandState {
            upper: hl2 + self.multiplier * atr[start],
            lower: hl2 - self.multiplier * atr[start],
            direction: TrendDirection::Up,
        };

        let tail = (start + 1..n).scan(seed, |state, i| {
            if atr[i].is_nan() {
                return Some(None);
            }

            let p = &points[i];
            let hl2 = (p.high + p.low) / 2.0;
            let basic_upper = hl2 + self.multiplier * atr[i];
            let basic_lower = hl2 - self.multiplier * atr[i];

            // Ratchet: bands may only tighten while price stays inside them.
            let prev_close = points[i - 1].close;
            let upper = if prev_close <= state.upper {
                basic_upper.min(state.upper)
            } else {
                basic_upper
            };
            let lower = if prev_close >= state.lower {
                basic_lower.max(state.lower)
            } else {
                basic_lower
            };

            let direction = match state.direction {
                TrendDirection::Up if p.close < lower => TrendDirection::Down,
                TrendDirection::Down if p.close > upper => TrendDirection::Up,
                d => d,
            };

            *state = BandState {
                upper,
                lower,
                direction,
            };

            let stop = match direction {
                TrendDirection::Up => lower,
                TrendDirection::Down => upper,
            };
            Some(Some(TrendPoint { direction, stop }))
        });

        let mut out = vec![None; start];
        out.push(Some(TrendPoint {
            direction: TrendDirection::Up,
            stop: seed.lower,
        }));
        out.extend(tail);
        out
    }
}

impl Indicator for TrendBand {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    /// Active stop level as a plain series (NaN during warmup).
    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        self.compute_points(points)
            .into_iter()
            .map(|tp| tp.map_or(f64::NAN, |tp| tp.stop))
            .collect()
    }
}
