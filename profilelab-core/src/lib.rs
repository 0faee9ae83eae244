//! ProfileLab Core — domain types, indicator library, volume profile,
//! regime classifier, and the signal decision engine.
//!
//! This crate contains the quantitative heart of the system:
//! - Validated OHLCV series (points are sane, timestamps strictly increase)
//! - Indicator library (ATR, RSI, SMA, trend band) with explicit warmup
//! - Volume profile with Point of Control and Value Area
//! - Regime flags (bull, panic, sniper zone) as tri-state values
//! - Priority-ordered signal decision tree
//! - The per-instrument evaluation pipeline tying it together
//!
//! Everything here is pure and synchronous; concurrency across instruments
//! lives in `profilelab-runner`.

pub mod analysis;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod params;
pub mod profile;
pub mod regime;
pub mod signal;

pub use analysis::{evaluate_instrument, EvalError, InstrumentReport};
pub use params::{BinRangePolicy, ConfigError, StrategyParams};
pub use profile::{volume_profile, PriceBin, ProfileResult};
pub use regime::{classify, Regime, RegimeInputs};
pub use signal::{decide, Signal, SignalInputs, SignalKind, Stance, Stops, Tone};
