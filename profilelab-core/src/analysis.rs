//! Per-instrument evaluation pipeline.
//!
//! One parameterized pass: snapshot the daily indicators, build the volume
//! profile over the trailing lookback window, derive the trailing stops and
//! regime flags, and walk the decision tree. Everything is computed fresh
//! from the supplied series; nothing is carried between cycles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Series;
use crate::indicators::{IndicatorSnapshot, TrendDirection};
use crate::params::StrategyParams;
use crate::profile::volume_profile;
use crate::regime::{classify, RegimeInputs};
use crate::signal::{decide, SignalInputs, SignalKind, Stops, Tone};

/// Per-instrument evaluation failures. Partial indicator availability is not
/// an error — it degrades rule by rule; only a series with no points at all
/// fails the instrument.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no data points for {ticker}")]
    EmptySeries { ticker: String },
}

/// Structured record handed to the presenter, one per instrument.
/// Undefined values stay None; they are never coerced to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentReport {
    pub ticker: String,
    pub name: String,
    pub current_price: f64,
    pub poc: Option<f64>,
    pub val: Option<f64>,
    pub vah: Option<f64>,
    pub sma_200: Option<f64>,
    pub atr: Option<f64>,
    pub rsi: Option<f64>,
    pub trend_direction: Option<TrendDirection>,
    pub trend_stop: Option<f64>,
    pub long_stop: Option<f64>,
    pub short_stop: Option<f64>,
    pub is_bull_market: Option<bool>,
    pub is_panic_day: Option<bool>,
    pub is_sniper_zone: Option<bool>,
    pub signal: SignalKind,
    pub signal_code: i8,
    pub rationale: String,
    pub tone: Tone,
    /// Capital fraction recommended by the signal, when it recommends one.
    pub allocation: Option<f64>,
}

/// Evaluate one instrument.
///
/// `daily` drives the indicators, regime, and stops; `intraday` (when
/// present and non-empty) drives the volume profile, falling back to the
/// daily series otherwise — the daily-cadence configurations simply pass
/// None.
pub fn evaluate_instrument(
    ticker: &str,
    name: &str,
    daily: &Series,
    intraday: Option<&Series>,
    params: &StrategyParams,
) -> Result<InstrumentReport, EvalError> {
    let last = daily.last().ok_or_else(|| EvalError::EmptySeries {
        ticker: ticker.to_string(),
    })?;
    let current_price = last.close;

    let snapshot = IndicatorSnapshot::from_series(daily.points(), params);

    let profile_series = match intraday {
        Some(s) if !s.is_empty() => s,
        _ => daily,
    };
    let profile = volume_profile(
        profile_series.tail_days(params.lookback_days),
        params.bin_count,
        params.value_area_fraction,
        params.bin_range_policy,
    );

    // Trailing stops: highest close over the window minus an ATR multiple.
    let stops = match snapshot.atr {
        Some(atr) => {
            let window = daily.tail_days(params.lookback_days);
            let long_high = window
                .iter()
                .map(|p| p.close)
                .fold(f64::NEG_INFINITY, f64::max);
            Stops {
                long_stop: (!window.is_empty())
                    .then(|| long_high - params.atr_multiplier * atr),
                short_stop: daily
                    .highest_close(params.sniper_stop_lookback)
                    .map(|h| h - params.atr_multiplier * atr),
            }
        }
        None => Stops::default(),
    };

    let regime = classify(
        &RegimeInputs {
            current_price,
            today_high: last.high,
            today_low: last.low,
            sma: snapshot.sma,
            atr: snapshot.atr,
            rsi: snapshot.rsi,
        },
        params,
    );

    let signal = decide(
        &SignalInputs {
            current_price,
            profile: profile.as_ref(),
            snapshot: &snapshot,
            regime,
            stops,
        },
        params,
    );

    Ok(InstrumentReport {
        ticker: ticker.to_string(),
        name: name.to_string(),
        current_price,
        poc: profile.as_ref().map(|p| p.poc_price),
        val: profile.as_ref().map(|p| p.val_price),
        vah: profile.as_ref().map(|p| p.vah_price),
        sma_200: snapshot.sma,
        atr: snapshot.atr,
        rsi: snapshot.rsi,
        trend_direction: snapshot.trend.map(|t| t.direction),
        trend_stop: snapshot.trend.map(|t| t.stop),
        long_stop: stops.long_stop,
        short_stop: stops.short_stop,
        is_bull_market: regime.is_bull_market,
        is_panic_day: regime.is_panic_day,
        is_sniper_zone: regime.is_sniper_zone,
        signal: signal.kind,
        signal_code: signal.kind.code(),
        rationale: signal.rationale,
        tone: signal.kind.tone(),
        allocation: signal.allocation,
    })
}
