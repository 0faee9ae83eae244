//! Series provider trait and structured error types.
//!
//! The SeriesProvider trait abstracts over data sources (CSV directories,
//! synthetic generators, anything network-backed living outside this crate)
//! so the runner can swap implementations and tests can mock failures.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Series, SeriesError};

/// Sampling cadence of a requested series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Daily,
    Hourly,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Daily => write!(f, "1d"),
            Interval::Hourly => write!(f, "1h"),
        }
    }
}

/// Structured errors for series fetching.
///
/// An empty or undersized source is signaled distinctly (`NotEnoughData`)
/// so the caller can short-circuit instead of analyzing a stub.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("not enough data for {symbol}: needed {needed} points, got {got}")]
    NotEnoughData {
        symbol: String,
        needed: usize,
        got: usize,
    },

    #[error("malformed source {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("invalid series for {symbol}")]
    BadSeries {
        symbol: String,
        #[source]
        source: SeriesError,
    },
}

/// Trait for series providers.
///
/// `fetch` returns a chronologically sorted, gap-tolerant series covering
/// the trailing `lookback_days` window (weekends/holidays naturally absent).
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch OHLCV points for a ticker over a trailing window.
    fn fetch(
        &self,
        ticker: &str,
        interval: Interval,
        lookback_days: u32,
    ) -> Result<Series, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_display() {
        assert_eq!(Interval::Daily.to_string(), "1d");
        assert_eq!(Interval::Hourly.to_string(), "1h");
    }

    #[test]
    fn fetch_error_messages() {
        let e = FetchError::NotEnoughData {
            symbol: "SPY".into(),
            needed: 200,
            got: 12,
        };
        assert!(e.to_string().contains("needed 200"));
        let e = FetchError::SymbolNotFound {
            symbol: "NOPE".into(),
        };
        assert!(e.to_string().contains("NOPE"));
    }
}
