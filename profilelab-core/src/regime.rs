//! Market-regime classification.
//!
//! Three independent flags derived once per evaluation from the current
//! snapshot. Each flag is `Some` only when every input it depends on is
//! defined; `None` makes the dependent signal rules skip instead of guessing.

use serde::Serialize;

use crate::params::StrategyParams;

/// Regime flags; all may co-occur. Never cached across evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Regime {
    /// Price above the long-horizon SMA.
    pub is_bull_market: Option<bool>,
    /// Today's range exceeds `panic_multiplier` ATRs.
    pub is_panic_day: Option<bool>,
    /// Oversold contrarian zone: RSI and bias both below their thresholds.
    pub is_sniper_zone: Option<bool>,
}

/// Inputs to the classifier; Options mirror indicator availability.
#[derive(Debug, Clone, Copy)]
pub struct RegimeInputs {
    pub current_price: f64,
    pub today_high: f64,
    pub today_low: f64,
    pub sma: Option<f64>,
    pub atr: Option<f64>,
    pub rsi: Option<f64>,
}

/// Fractional deviation of price from its long-horizon average; negative
/// when price sits below it.
pub fn bias(price: f64, sma: f64) -> f64 {
    (price - sma) / sma
}

/// Derive the regime flags. Pure; no state.
pub fn classify(inputs: &RegimeInputs, params: &StrategyParams) -> Regime {
    let is_bull_market = inputs.sma.map(|sma| inputs.current_price > sma);

    let is_panic_day = inputs
        .atr
        .map(|atr| (inputs.today_high - inputs.today_low) > params.panic_multiplier * atr);

    let is_sniper_zone = match (inputs.rsi, inputs.sma) {
        (Some(rsi), Some(sma)) => Some(
            rsi < params.rsi_threshold
                && bias(inputs.current_price, sma) < params.bias_threshold,
        ),
        _ => None,
    };

    Regime {
        is_bull_market,
        is_panic_day,
        is_sniper_zone,
    }
}
