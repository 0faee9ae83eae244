//! Signal engine: the priority-ordered decision tree.
//!
//! Exactly one signal per evaluation; the first matching rule wins and later
//! rules are unreachable. A rule whose inputs are undefined (indicator or
//! profile unavailable) is skipped and the decision falls through — an
//! undefined input never becomes a trading signal by default.

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSnapshot;
use crate::params::StrategyParams;
use crate::profile::ProfileResult;
use crate::regime::{bias, Regime};

/// Enumerated signal outcomes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Aggressive contrarian entry in the oversold zone.
    SniperBuy,
    /// Bear market, but price still holds the short-horizon stop.
    SniperHold,
    /// Bear market: exit all positions.
    BearExit,
    /// Bull market but volatility too high to act this cycle.
    PanicHold,
    /// Price retraced below the lower value-area bound: strongest buy.
    DipBuy,
    /// Ran above POC but lost the trailing stop: take profit.
    TakeProfit,
    /// Above POC and above the trailing stop: hold or add.
    TrendHold,
    /// Neutral: observe.
    Indecision,
}

/// Coarse stance used by the cross-instrument verdict table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Bullish,
    Neutral,
    Bearish,
}

/// Severity/color tag for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Green,
    Red,
    Yellow,
    Cyan,
    Gray,
}

impl SignalKind {
    /// Stable wire code for downstream aggregation, in descending conviction:
    /// positive = accumulate, zero = observe, negative = defensive.
    pub fn code(self) -> i8 {
        match self {
            SignalKind::SniperBuy => 3,
            SignalKind::TrendHold => 2,
            SignalKind::DipBuy => 1,
            SignalKind::Indecision => 0,
            SignalKind::PanicHold => -1,
            SignalKind::TakeProfit => -2,
            SignalKind::SniperHold => -3,
            SignalKind::BearExit => -4,
        }
    }

    pub fn stance(self) -> Stance {
        match self {
            SignalKind::SniperBuy | SignalKind::DipBuy | SignalKind::TrendHold => Stance::Bullish,
            SignalKind::BearExit => Stance::Bearish,
            _ => Stance::Neutral,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            SignalKind::SniperBuy | SignalKind::DipBuy => Tone::Green,
            SignalKind::TrendHold => Tone::Cyan,
            SignalKind::SniperHold | SignalKind::PanicHold | SignalKind::Indecision => Tone::Yellow,
            SignalKind::TakeProfit | SignalKind::BearExit => Tone::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalKind::SniperBuy => "Sniper Buy",
            SignalKind::SniperHold => "Sniper Hold",
            SignalKind::BearExit => "Bear Exit",
            SignalKind::PanicHold => "Panic Hold",
            SignalKind::DipBuy => "Dip Buy",
            SignalKind::TakeProfit => "Take Profit",
            SignalKind::TrendHold => "Trend Hold",
            SignalKind::Indecision => "Indecision",
        }
    }
}

/// A decided signal with its human-readable rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub rationale: String,
    /// Recommended capital fraction; Some only for the sniper entry.
    pub allocation: Option<f64>,
}

/// Trailing stops fed to the engine: long horizon (profile lookback) and
/// short horizon (sniper stop lookback), each highest-close minus
/// `atr_multiplier * atr`; None when ATR is undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stops {
    pub long_stop: Option<f64>,
    pub short_stop: Option<f64>,
}

/// Everything the decision tree reads.
#[derive(Debug, Clone, Copy)]
pub struct SignalInputs<'a> {
    pub current_price: f64,
    pub profile: Option<&'a ProfileResult>,
    pub snapshot: &'a IndicatorSnapshot,
    pub regime: Regime,
    pub stops: Stops,
}

/// Walk the decision tree; first matching rule wins.
pub fn decide(inputs: &SignalInputs, params: &StrategyParams) -> Signal {
    let price = inputs.current_price;
    let regime = inputs.regime;

    // 1. Sniper entry fires regardless of bull/bear state.
    if regime.is_sniper_zone == Some(true) {
        let rsi = inputs.snapshot.rsi.unwrap_or(f64::NAN);
        let bias_pct = inputs
            .snapshot
            .sma
            .map(|sma| bias(price, sma) * 100.0)
            .unwrap_or(f64::NAN);
        return Signal {
            kind: SignalKind::SniperBuy,
            rationale: format!(
                "oversold sniper zone: RSI {rsi:.1} < {:.0} and bias {bias_pct:+.1}% < {:+.1}%; \
                 deploy {:.0}% of capital",
                params.rsi_threshold,
                params.bias_threshold * 100.0,
                params.sniper_size * 100.0
            ),
            allocation: Some(params.sniper_size),
        };
    }

    // 2. Bear market, but the short-horizon stop still holds.
    if regime.is_bull_market == Some(false) {
        if let Some(short_stop) = inputs.stops.short_stop {
            if price > short_stop {
                return Signal {
                    kind: SignalKind::SniperHold,
                    rationale: format!(
                        "bear market, but price {price:.2} still holds the \
                         {}-period stop {short_stop:.2}",
                        params.sniper_stop_lookback
                    ),
                    allocation: None,
                };
            }
        }
        // 3. Bear market: exit.
        let sma = inputs.snapshot.sma.unwrap_or(f64::NAN);
        return Signal {
            kind: SignalKind::BearExit,
            rationale: format!(
                "price {price:.2} below SMA-{} {sma:.2}; exit all positions",
                params.sma_period
            ),
            allocation: None,
        };
    }

    if regime.is_bull_market == Some(true) {
        // 4. Volatility too high to act on profile signals.
        if regime.is_panic_day == Some(true) {
            let atr = inputs.snapshot.atr.unwrap_or(f64::NAN);
            return Signal {
                kind: SignalKind::PanicHold,
                rationale: format!(
                    "panic range: today's swing exceeds {:.1}x ATR {atr:.2}; no new entries",
                    params.panic_multiplier
                ),
                allocation: None,
            };
        }

        if regime.is_panic_day == Some(false) {
            if let Some(profile) = inputs.profile {
                // 5. Retraced into or below the lower value-area bound.
                if price < profile.val_price {
                    let dist_pct = (profile.val_price - price) / price * 100.0;
                    return Signal {
                        kind: SignalKind::DipBuy,
                        rationale: format!(
                            "price {price:.2} retraced {dist_pct:.2}% below VAL {:.2}",
                            profile.val_price
                        ),
                        allocation: None,
                    };
                }

                if price > profile.poc_price {
                    if let Some(long_stop) = inputs.stops.long_stop {
                        // 6. Above POC but below the trailing stop: exit.
                        if price < long_stop {
                            return Signal {
                                kind: SignalKind::TakeProfit,
                                rationale: format!(
                                    "price {price:.2} above POC {:.2} but lost the trailing \
                                     stop {long_stop:.2}",
                                    profile.poc_price
                                ),
                                allocation: None,
                            };
                        }
                        // 7. Above POC and above the trailing stop: hold.
                        return Signal {
                            kind: SignalKind::TrendHold,
                            rationale: format!(
                                "price {price:.2} above POC {:.2} and holding the trailing \
                                 stop {long_stop:.2}",
                                profile.poc_price
                            ),
                            allocation: None,
                        };
                    }
                }
            }
        }
    }

    // 8. Default: observe. The direction of approach is ambiguous without
    // the prior tick, so both readings are offered as advisory text.
    let rationale = match inputs.profile {
        Some(profile) => format!(
            "price {price:.2} sitting between VAL {:.2} and POC {:.2}: either a fresh \
             break below POC (lean exit) or a recovery from below (lean hold)",
            profile.val_price, profile.poc_price
        ),
        None => format!("price {price:.2}: no usable profile or trend reference this cycle"),
    };
    Signal {
        kind: SignalKind::Indecision,
        rationale,
        allocation: None,
    }
}
