//! End-to-end scenarios for the analysis core.
//!
//! Concrete constructions: a volume spike profile, a forced dip-buy, the
//! sniper-vs-bear gating, the ATR warmup boundary, and the empty-series
//! degenerate case.

use chrono::NaiveDate;

use profilelab_core::domain::{PricePoint, Series};
use profilelab_core::indicators::{Atr, Indicator, IndicatorSnapshot};
use profilelab_core::profile::{volume_profile, PriceBin, ProfileResult};
use profilelab_core::regime::Regime;
use profilelab_core::signal::{decide, SignalInputs, SignalKind, Stops};
use profilelab_core::{evaluate_instrument, BinRangePolicy, EvalError, StrategyParams};

fn daily_point(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> PricePoint {
    PricePoint {
        timestamp: NaiveDate::from_ymd_opt(2023, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::days(i as i64),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Scenario A: 300 bars, gently drifting price, one massive volume spike at
/// bar 150. The POC bin must contain the spike's price level and the 80%
/// value area must form a contiguous band around it.
#[test]
fn volume_spike_anchors_poc_and_value_area() {
    let mut points = Vec::new();
    for i in 0..300 {
        let price = 100.0 + (i as f64) / 30.0; // drifts 100 → 110
        let volume = if i == 150 { 1_000_000.0 } else { 1_000.0 };
        points.push(daily_point(i, price, price + 0.2, price - 0.2, price, volume));
    }
    let spike_price = points[150].typical_price();

    let result = volume_profile(&points, 10, 0.8, BinRangePolicy::TypicalPrice).unwrap();

    // POC bin contains the spike's price level.
    let poc_bin = result
        .bins
        .iter()
        .find(|b| (b.mid - result.poc_price).abs() < 1e-9)
        .unwrap();
    assert!(
        spike_price >= poc_bin.lower && spike_price <= poc_bin.upper,
        "spike at {spike_price} outside POC bin [{}, {}]",
        poc_bin.lower,
        poc_bin.upper
    );

    // The band is contiguous by construction; check it holds >= 80%.
    let band_volume: f64 = result
        .bins
        .iter()
        .filter(|b| b.lower >= result.val_price - 1e-9 && b.upper <= result.vah_price + 1e-9)
        .map(|b| b.volume)
        .sum();
    assert!(band_volume >= 0.8 * result.total_volume);
    assert!(result.val_price <= result.poc_price);
    assert!(result.poc_price <= result.vah_price);
}

fn fixed_profile(val: f64, poc: f64, vah: f64) -> ProfileResult {
    ProfileResult {
        poc_price: poc,
        val_price: val,
        vah_price: vah,
        bins: vec![PriceBin {
            lower: val,
            upper: vah,
            mid: poc,
            volume: 1000.0,
        }],
        total_volume: 1000.0,
    }
}

/// Scenario B: price 5% below a known VAL in a calm bull market → DipBuy.
#[test]
fn calm_bull_below_val_is_dip_buy() {
    let val = 100.0;
    let price = val * 0.95;
    let profile = fixed_profile(val, 104.0, 108.0);
    let snapshot = IndicatorSnapshot {
        atr: Some(2.0),
        rsi: Some(45.0),
        sma: Some(90.0),
        trend: None,
    };
    let regime = Regime {
        is_bull_market: Some(true),
        is_panic_day: Some(false),
        is_sniper_zone: Some(false),
    };
    let signal = decide(
        &SignalInputs {
            current_price: price,
            profile: Some(&profile),
            snapshot: &snapshot,
            regime,
            stops: Stops::default(),
        },
        &StrategyParams::core(),
    );
    assert_eq!(signal.kind, SignalKind::DipBuy);
}

/// Scenario C: bear market with price above the short stop. SniperHold is
/// reached only because the sniper zone did not already match; flipping the
/// zone on yields SniperBuy instead.
#[test]
fn bear_above_short_stop_gates_on_sniper_zone() {
    let snapshot = IndicatorSnapshot {
        atr: Some(2.0),
        rsi: Some(40.0),
        sma: Some(110.0),
        trend: None,
    };
    let stops = Stops {
        long_stop: None,
        short_stop: Some(92.0),
    };
    let mut regime = Regime {
        is_bull_market: Some(false),
        is_panic_day: Some(false),
        is_sniper_zone: Some(false),
    };
    let inputs = SignalInputs {
        current_price: 95.0,
        profile: None,
        snapshot: &snapshot,
        regime,
        stops,
    };
    let signal = decide(&inputs, &StrategyParams::core());
    assert_eq!(signal.kind, SignalKind::SniperHold);

    regime.is_sniper_zone = Some(true);
    let signal = decide(
        &SignalInputs { regime, ..inputs },
        &StrategyParams::core(),
    );
    assert_eq!(signal.kind, SignalKind::SniperBuy);
}

/// Scenario D: ATR over a series of exactly `period` points — the first
/// period-1 outputs are undefined and the last equals the plain mean of the
/// true ranges.
#[test]
fn atr_warmup_boundary() {
    let points = vec![
        daily_point(0, 100.0, 104.0, 96.0, 101.0, 1000.0), // TR = 8
        daily_point(1, 101.0, 105.0, 99.0, 103.0, 1000.0), // TR = 6
        daily_point(2, 103.0, 109.0, 103.0, 108.0, 1000.0), // TR = 6
        daily_point(3, 108.0, 112.0, 106.0, 110.0, 1000.0), // TR = 6
    ];
    let result = Atr::new(4).compute(&points);
    assert!(result[0].is_nan());
    assert!(result[1].is_nan());
    assert!(result[2].is_nan());
    assert!((result[3] - 26.0 / 4.0).abs() < 1e-9);
}

/// Scenario E: empty input produces "no profile" and a contained
/// per-instrument error, never a panic.
#[test]
fn empty_series_degrades_cleanly() {
    assert!(volume_profile(&[], 10, 0.7, BinRangePolicy::TypicalPrice).is_none());

    let empty = Series::new(vec![]).unwrap();
    let err = evaluate_instrument("SPY", "S&P 500", &empty, None, &StrategyParams::core())
        .unwrap_err();
    assert!(matches!(err, EvalError::EmptySeries { .. }));
}
