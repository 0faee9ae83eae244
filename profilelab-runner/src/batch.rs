//! Batch evaluation: fan out across instruments, join, tolerate failures.
//!
//! Each instrument's pipeline is independent and CPU-bound, so the fan-out
//! is a rayon `par_iter`; the collect is the join barrier the verdict step
//! waits on. A failure evaluating one instrument degrades to a skip entry —
//! it never aborts the batch and never becomes a trading signal.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use profilelab_core::data::{FetchError, Interval, SeriesProvider};
use profilelab_core::{evaluate_instrument, EvalError, InstrumentReport, StrategyParams};

use crate::config::{BatchConfig, BatchConfigError, InstrumentRole, InstrumentSpec};

/// Per-instrument failure inside a batch; contained, never fatal.
#[derive(Debug, Error)]
enum InstrumentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Fatal batch errors: only configuration problems stop a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] BatchConfigError),
}

/// One successfully evaluated instrument, tagged with its portfolio role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedInstrument {
    pub role: InstrumentRole,
    pub report: InstrumentReport,
}

/// An instrument the batch had to skip, with the reason for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedInstrument {
    pub ticker: String,
    pub reason: String,
}

/// Joined batch result; input order is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub evaluated: Vec<EvaluatedInstrument>,
    pub skipped: Vec<SkippedInstrument>,
}

impl BatchOutcome {
    /// Signal for a role; a missing or skipped instrument reads as neutral.
    pub fn signal_for(&self, role: InstrumentRole) -> profilelab_core::SignalKind {
        self.evaluated
            .iter()
            .find(|e| e.role == role)
            .map(|e| e.report.signal)
            .unwrap_or(profilelab_core::SignalKind::Indecision)
    }
}

/// Evaluate every configured instrument against the provider.
pub fn evaluate_batch(
    config: &BatchConfig,
    provider: &dyn SeriesProvider,
) -> Result<BatchOutcome, BatchError> {
    let params = config.resolve_params()?;

    let results: Vec<Result<EvaluatedInstrument, SkippedInstrument>> = config
        .instruments
        .par_iter()
        .map(|spec| {
            evaluate_one(spec, &params, config, provider).map_err(|err| {
                log::warn!("skipping {}: {err}", spec.ticker);
                SkippedInstrument {
                    ticker: spec.ticker.clone(),
                    reason: err.to_string(),
                }
            })
        })
        .collect();

    let mut evaluated = Vec::new();
    let mut skipped = Vec::new();
    for result in results {
        match result {
            Ok(e) => evaluated.push(e),
            Err(s) => skipped.push(s),
        }
    }
    Ok(BatchOutcome { evaluated, skipped })
}

fn evaluate_one(
    spec: &InstrumentSpec,
    params: &StrategyParams,
    config: &BatchConfig,
    provider: &dyn SeriesProvider,
) -> Result<EvaluatedInstrument, InstrumentError> {
    let daily = provider.fetch(&spec.ticker, Interval::Daily, config.daily_lookback_days)?;

    // The intraday leg is optional: when it cannot be fetched the profile
    // falls back to the daily series rather than skipping the instrument.
    let intraday = if config.use_intraday {
        match provider.fetch(&spec.ticker, Interval::Hourly, params.lookback_days) {
            Ok(series) => Some(series),
            Err(err) => {
                log::warn!(
                    "{}: no intraday series ({err}); profiling the daily series",
                    spec.ticker
                );
                None
            }
        }
    } else {
        None
    };

    let report = evaluate_instrument(
        &spec.ticker,
        &spec.name,
        &daily,
        intraday.as_ref(),
        params,
    )?;
    Ok(EvaluatedInstrument {
        role: spec.role,
        report,
    })
}
