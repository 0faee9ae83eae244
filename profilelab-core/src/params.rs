//! Strategy parameters and named presets.
//!
//! One parameterized pipeline serves every named strategy; a "strategy" is a
//! preset of this struct, not a separate code path. Violating values are
//! construction-time errors — nothing downstream re-validates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the volume-profile price range is bounded.
///
/// `TypicalPrice` bounds the range by the min/max typical price of the slice
/// (intraday cadence); `HighLow` bounds it by min(low)/max(high) (daily
/// cadence). Both are valid configurations; the choice is a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinRangePolicy {
    TypicalPrice,
    HighLow,
}

/// Invalid parameter values, reported at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("bin_count must be at least 2, got {got}")]
    BinCountTooSmall { got: usize },

    #[error("{field} must be in (0, 1], got {got}")]
    FractionOutOfRange { field: &'static str, got: String },
}

/// Full configuration surface consumed by the analysis core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyParams {
    /// Trailing calendar window feeding the volume profile.
    pub lookback_days: u32,
    /// Number of equal-width price bins.
    pub bin_count: usize,
    /// Target fraction of total volume inside the value area.
    pub value_area_fraction: f64,
    /// Bin-range policy (see [`BinRangePolicy`]).
    pub bin_range_policy: BinRangePolicy,
    /// ATR rolling-mean period.
    pub atr_period: usize,
    /// Trailing-stop distance in ATR multiples.
    pub atr_multiplier: f64,
    /// A day counts as panic when its range exceeds this many ATRs.
    pub panic_multiplier: f64,
    /// RSI rolling-mean period.
    pub rsi_period: usize,
    /// Sniper entry requires RSI below this.
    pub rsi_threshold: f64,
    /// Sniper entry requires bias (fractional deviation from the long SMA)
    /// below this; negative in practice.
    pub bias_threshold: f64,
    /// Capital fraction deployed on a sniper entry.
    pub sniper_size: f64,
    /// Short-horizon stop lookback (points) for the sniper exit.
    pub sniper_stop_lookback: usize,
    /// Trend band ATR period.
    pub trend_band_period: usize,
    /// Trend band width in ATR multiples.
    pub trend_band_multiplier: f64,
    /// Long-horizon trend reference period.
    pub sma_period: usize,
}

impl StrategyParams {
    /// Daily-cadence preset (quarterly health-check parameters).
    pub fn core() -> Self {
        Self {
            lookback_days: 98,
            bin_count: 7,
            value_area_fraction: 0.80,
            bin_range_policy: BinRangePolicy::HighLow,
            atr_period: 14,
            atr_multiplier: 2.7,
            panic_multiplier: 2.0,
            rsi_period: 14,
            rsi_threshold: 30.0,
            bias_threshold: -0.11,
            sniper_size: 0.5,
            sniper_stop_lookback: 14,
            trend_band_period: 10,
            trend_band_multiplier: 3.0,
            sma_period: 200,
        }
    }

    /// Intraday-cadence preset: wider window, high-resolution bins.
    pub fn hourly() -> Self {
        Self {
            lookback_days: 126,
            bin_count: 70,
            value_area_fraction: 0.70,
            bin_range_policy: BinRangePolicy::TypicalPrice,
            panic_multiplier: 1.8,
            ..Self::core()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "core" => Some(Self::core()),
            "hourly" => Some(Self::hourly()),
            _ => None,
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["core", "hourly"]
    }

    /// Check every field; called by whatever deserialized or built the value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive_f64(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositive { field })
            }
        }
        fn positive_usize(field: &'static str, v: usize) -> Result<(), ConfigError> {
            if v > 0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositive { field })
            }
        }
        fn fraction(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(ConfigError::FractionOutOfRange {
                    field,
                    got: format!("{v}"),
                })
            }
        }

        if self.lookback_days == 0 {
            return Err(ConfigError::NonPositive {
                field: "lookback_days",
            });
        }
        if self.bin_count < 2 {
            return Err(ConfigError::BinCountTooSmall {
                got: self.bin_count,
            });
        }
        fraction("value_area_fraction", self.value_area_fraction)?;
        fraction("sniper_size", self.sniper_size)?;
        positive_usize("atr_period", self.atr_period)?;
        positive_usize("rsi_period", self.rsi_period)?;
        positive_usize("sniper_stop_lookback", self.sniper_stop_lookback)?;
        positive_usize("trend_band_period", self.trend_band_period)?;
        positive_usize("sma_period", self.sma_period)?;
        positive_f64("atr_multiplier", self.atr_multiplier)?;
        positive_f64("panic_multiplier", self.panic_multiplier)?;
        positive_f64("rsi_threshold", self.rsi_threshold)?;
        positive_f64("trend_band_multiplier", self.trend_band_multiplier)?;
        // bias_threshold is a signed fraction; negative values are the norm.
        if !self.bias_threshold.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "bias_threshold",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        StrategyParams::core().validate().unwrap();
        StrategyParams::hourly().validate().unwrap();
    }

    #[test]
    fn preset_lookup() {
        assert!(StrategyParams::preset("core").is_some());
        assert!(StrategyParams::preset("hourly").is_some());
        assert!(StrategyParams::preset("nope").is_none());
        assert_eq!(StrategyParams::preset_names().len(), 2);
    }

    #[test]
    fn core_preset_values() {
        let p = StrategyParams::core();
        assert_eq!(p.lookback_days, 98);
        assert_eq!(p.bin_count, 7);
        assert!((p.value_area_fraction - 0.80).abs() < 1e-12);
        assert!((p.atr_multiplier - 2.7).abs() < 1e-12);
        assert_eq!(p.bin_range_policy, BinRangePolicy::HighLow);
    }

    #[test]
    fn hourly_preset_overrides() {
        let p = StrategyParams::hourly();
        assert_eq!(p.lookback_days, 126);
        assert_eq!(p.bin_count, 70);
        assert!((p.panic_multiplier - 1.8).abs() < 1e-12);
        assert_eq!(p.bin_range_policy, BinRangePolicy::TypicalPrice);
        // Sniper overlay is shared with the core preset.
        assert!((p.bias_threshold - -0.11).abs() < 1e-12);
    }

    #[test]
    fn rejects_small_bin_count() {
        let mut p = StrategyParams::core();
        p.bin_count = 1;
        assert_eq!(
            p.validate().unwrap_err(),
            ConfigError::BinCountTooSmall { got: 1 }
        );
    }

    #[test]
    fn rejects_fraction_out_of_range() {
        let mut p = StrategyParams::core();
        p.value_area_fraction = 1.2;
        assert!(matches!(
            p.validate().unwrap_err(),
            ConfigError::FractionOutOfRange { .. }
        ));
        p.value_area_fraction = 0.0;
        assert!(matches!(
            p.validate().unwrap_err(),
            ConfigError::FractionOutOfRange { .. }
        ));
    }

    #[test]
    fn rejects_zero_periods() {
        let mut p = StrategyParams::core();
        p.atr_period = 0;
        assert_eq!(
            p.validate().unwrap_err(),
            ConfigError::NonPositive { field: "atr_period" }
        );
    }

    #[test]
    fn serde_roundtrip() {
        let p = StrategyParams::hourly();
        let text = serde_json::to_string(&p).unwrap();
        let back: StrategyParams = serde_json::from_str(&text).unwrap();
        assert_eq!(p, back);
    }
}
