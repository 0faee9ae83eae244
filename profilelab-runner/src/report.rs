//! Batch report: the structured record and its text rendering.
//!
//! The JSON form is the presenter contract; the text form is a terminal
//! rendering of the same record, one card per instrument plus the verdict.

use std::fmt::Write as _;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use profilelab_core::Tone;

use crate::batch::{BatchOutcome, EvaluatedInstrument, SkippedInstrument};
use crate::config::BatchConfig;
use crate::verdict::Verdict;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete output of one batch evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub initial_capital: f64,
    pub instruments: Vec<EvaluatedInstrument>,
    pub skipped: Vec<SkippedInstrument>,
    pub verdict: Verdict,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Assemble the report record from the batch pieces.
pub fn build_report(config: &BatchConfig, outcome: BatchOutcome, verdict: Verdict) -> BatchReport {
    BatchReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        generated_at: Utc::now().to_rfc3339(),
        initial_capital: config.initial_capital,
        instruments: outcome.evaluated,
        skipped: outcome.skipped,
        verdict,
    }
}

fn tone_tag(tone: Tone) -> &'static str {
    match tone {
        Tone::Green => "green",
        Tone::Red => "red",
        Tone::Yellow => "yellow",
        Tone::Cyan => "cyan",
        Tone::Gray => "gray",
    }
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

/// Render the report as plain text for the terminal.
pub fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# ProfileLab Signals");
    let _ = writeln!(out, "Run ID: `{}`", report.run_id);
    let _ = writeln!(out, "Generated: {}", report.generated_at);

    for entry in &report.instruments {
        let r = &entry.report;
        let _ = writeln!(out, "\n## {} — {} [{:?}]", r.ticker, r.name, entry.role);
        let _ = writeln!(
            out,
            "Price {:.2} | Signal {} (code {:+}) [{}]",
            r.current_price,
            r.signal.label(),
            r.signal_code,
            tone_tag(r.tone)
        );
        let _ = writeln!(
            out,
            "POC {} | VAL {} | VAH {}",
            opt(r.poc),
            opt(r.val),
            opt(r.vah)
        );
        let _ = writeln!(
            out,
            "SMA {} | ATR {} | RSI {} | Trend {}",
            opt(r.sma_200),
            opt(r.atr),
            opt(r.rsi),
            r.trend_direction
                .map_or_else(|| "-".to_string(), |d| format!("{d:?} (stop {})", opt(r.trend_stop))),
        );
        let _ = writeln!(
            out,
            "Regime: bull {} | panic {} | sniper {}",
            flag(r.is_bull_market),
            flag(r.is_panic_day),
            flag(r.is_sniper_zone)
        );
        if let Some(allocation) = r.allocation {
            let _ = writeln!(
                out,
                "Suggested allocation: {:.0}% of {:.0}",
                allocation * 100.0,
                report.initial_capital
            );
        }
        let _ = writeln!(out, "> {}", r.rationale);
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\n## Skipped");
        for s in &report.skipped {
            let _ = writeln!(out, "- {}: {}", s.ticker, s.reason);
        }
    }

    let _ = writeln!(
        out,
        "\n## Verdict: {} (code {:+}) [{}]",
        report.verdict.title,
        report.verdict.code,
        tone_tag(report.verdict.tone)
    );
    for (i, advice) in report.verdict.advice.iter().enumerate() {
        let _ = writeln!(out, "{}. {advice}", i + 1);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::evaluate_batch;
    use crate::verdict::{default_rules, portfolio_verdict};
    use profilelab_core::data::SyntheticProvider;

    fn sample_report() -> BatchReport {
        let config = BatchConfig::default_indices();
        let outcome = evaluate_batch(&config, &SyntheticProvider).unwrap();
        let verdict = portfolio_verdict(&default_rules(), &outcome);
        build_report(&config, outcome, verdict)
    }

    #[test]
    fn report_carries_every_instrument() {
        let report = sample_report();
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.instruments.len(), 3);
        assert!(!report.run_id.is_empty());
    }

    #[test]
    fn text_rendering_mentions_tickers_and_verdict() {
        let report = sample_report();
        let text = render_text(&report);
        for ticker in ["SPY", "QQQ", "IWM"] {
            assert!(text.contains(ticker), "missing {ticker} in rendering");
        }
        assert!(text.contains(&report.verdict.title));
        assert!(text.contains("Run ID"));
    }

    #[test]
    fn json_roundtrip() {
        let report = sample_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.instruments.len(), report.instruments.len());
        assert_eq!(back.run_id, report.run_id);
        assert_eq!(back.verdict, report.verdict);
    }

    #[test]
    fn schema_version_defaults_when_absent() {
        let report = sample_report();
        let mut value: serde_json::Value = serde_json::to_value(&report).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let back: BatchReport = serde_json::from_value(value).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }
}
