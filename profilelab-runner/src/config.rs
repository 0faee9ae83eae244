//! Serializable batch configuration.
//!
//! A batch names the instruments (with their portfolio roles), picks the
//! strategy parameters by preset name or inline table, and carries the
//! ambient knobs (capital, data directory, cadence). Loaded from TOML;
//! `run_id()` is a deterministic content hash so identical configs produce
//! identical report fingerprints.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use profilelab_core::StrategyParams;

/// Unique identifier for a batch run (content-addressable hash).
pub type RunId = String;

/// Portfolio role of an instrument in the verdict table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentRole {
    /// Broad-market benchmark (e.g. the cap-weighted large index).
    Broad,
    /// Growth/risk proxy.
    Growth,
    /// Risk canary: small caps or whatever breaks first.
    Canary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub ticker: String,
    pub name: String,
    pub role: InstrumentRole,
}

/// Errors from loading or resolving a batch configuration.
#[derive(Debug, Error)]
pub enum BatchConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("config must set either `preset` or a `[params]` table")]
    MissingParams,

    #[error("no instruments configured")]
    NoInstruments,

    #[error(transparent)]
    Params(#[from] profilelab_core::ConfigError),
}

/// Complete configuration for one batch evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub instruments: Vec<InstrumentSpec>,

    /// Named preset; ignored when `params` is set inline.
    #[serde(default)]
    pub preset: Option<String>,

    /// Inline parameter table; wins over `preset`.
    #[serde(default)]
    pub params: Option<StrategyParams>,

    /// Daily history window handed to the provider (indicators need the
    /// long SMA, so this is much wider than the profile lookback).
    #[serde(default = "default_daily_lookback")]
    pub daily_lookback_days: u32,

    /// Whether to fetch an intraday series for the volume profile.
    #[serde(default)]
    pub use_intraday: bool,

    #[serde(default = "default_capital")]
    pub initial_capital: f64,

    /// Directory for the CSV provider; providers that need no directory
    /// ignore it.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_daily_lookback() -> u32 {
    730
}

fn default_capital() -> f64 {
    10_000.0
}

impl BatchConfig {
    /// The default three-index batch: broad, growth, and the canary.
    pub fn default_indices() -> Self {
        Self {
            instruments: vec![
                InstrumentSpec {
                    ticker: "SPY".into(),
                    name: "S&P 500".into(),
                    role: InstrumentRole::Broad,
                },
                InstrumentSpec {
                    ticker: "QQQ".into(),
                    name: "Nasdaq 100".into(),
                    role: InstrumentRole::Growth,
                },
                InstrumentSpec {
                    ticker: "IWM".into(),
                    name: "Russell 2000".into(),
                    role: InstrumentRole::Canary,
                },
            ],
            preset: Some("core".into()),
            params: None,
            daily_lookback_days: default_daily_lookback(),
            use_intraday: false,
            initial_capital: default_capital(),
            data_dir: None,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, BatchConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, BatchConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| BatchConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn check(&self) -> Result<(), BatchConfigError> {
        if self.instruments.is_empty() {
            return Err(BatchConfigError::NoInstruments);
        }
        if self.preset.is_none() && self.params.is_none() {
            return Err(BatchConfigError::MissingParams);
        }
        Ok(())
    }

    /// Resolve and validate the strategy parameters.
    pub fn resolve_params(&self) -> Result<StrategyParams, BatchConfigError> {
        let params = match (&self.params, &self.preset) {
            (Some(params), _) => params.clone(),
            (None, Some(name)) => StrategyParams::preset(name)
                .ok_or_else(|| BatchConfigError::UnknownPreset(name.clone()))?,
            (None, None) => return Err(BatchConfigError::MissingParams),
        };
        params.validate()?;
        Ok(params)
    }

    /// Deterministic hash ID for this configuration.
    ///
    /// Two identical configs share a RunId, so reports can be compared and
    /// deduplicated downstream.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BatchConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        preset = "core"
        daily_lookback_days = 500
        initial_capital = 25000.0

        [[instruments]]
        ticker = "SPY"
        name = "S&P 500"
        role = "broad"

        [[instruments]]
        ticker = "IWM"
        name = "Russell 2000"
        role = "canary"
    "#;

    #[test]
    fn parses_toml() {
        let config = BatchConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.instruments.len(), 2);
        assert_eq!(config.instruments[1].role, InstrumentRole::Canary);
        assert_eq!(config.daily_lookback_days, 500);
        assert!((config.initial_capital - 25_000.0).abs() < 1e-9);
        let params = config.resolve_params().unwrap();
        assert_eq!(params.bin_count, 7);
    }

    #[test]
    fn inline_params_win_over_preset() {
        let text = r#"
            preset = "core"

            [[instruments]]
            ticker = "SPY"
            name = "S&P 500"
            role = "broad"

            [params]
            lookback_days = 40
            bin_count = 12
            value_area_fraction = 0.6
            bin_range_policy = "typical_price"
            atr_period = 14
            atr_multiplier = 2.0
            panic_multiplier = 1.5
            rsi_period = 14
            rsi_threshold = 30.0
            bias_threshold = -0.08
            sniper_size = 0.3
            sniper_stop_lookback = 10
            trend_band_period = 10
            trend_band_multiplier = 3.0
            sma_period = 200
        "#;
        let config = BatchConfig::from_toml_str(text).unwrap();
        let params = config.resolve_params().unwrap();
        assert_eq!(params.bin_count, 12);
        assert_eq!(params.lookback_days, 40);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let text = r#"
            preset = "supernova"

            [[instruments]]
            ticker = "SPY"
            name = "S&P 500"
            role = "broad"
        "#;
        let config = BatchConfig::from_toml_str(text).unwrap();
        assert!(matches!(
            config.resolve_params().unwrap_err(),
            BatchConfigError::UnknownPreset(name) if name == "supernova"
        ));
    }

    #[test]
    fn missing_params_and_preset_is_rejected() {
        let text = r#"
            [[instruments]]
            ticker = "SPY"
            name = "S&P 500"
            role = "broad"
        "#;
        assert!(matches!(
            BatchConfig::from_toml_str(text).unwrap_err(),
            BatchConfigError::MissingParams
        ));
    }

    #[test]
    fn empty_instruments_is_rejected() {
        let text = r#"preset = "core""#;
        assert!(matches!(
            BatchConfig::from_toml_str(text).unwrap_err(),
            BatchConfigError::NoInstruments
        ));
    }

    #[test]
    fn invalid_inline_params_are_rejected() {
        let mut config = BatchConfig::default_indices();
        let mut params = StrategyParams::core();
        params.bin_count = 1;
        config.params = Some(params);
        assert!(matches!(
            config.resolve_params().unwrap_err(),
            BatchConfigError::Params(_)
        ));
    }

    #[test]
    fn run_id_is_deterministic() {
        let a = BatchConfig::default_indices();
        let b = BatchConfig::default_indices();
        assert_eq!(a.run_id(), b.run_id());
        assert!(!a.run_id().is_empty());
    }

    #[test]
    fn run_id_changes_with_config() {
        let a = BatchConfig::default_indices();
        let mut b = a.clone();
        b.initial_capital = 99_999.0;
        assert_ne!(a.run_id(), b.run_id());
    }
}
