//! Portfolio verdict: an ordered rule table over per-role signals.
//!
//! Cross-instrument aggregation is a first-match lookup: each rule names a
//! pattern per role; the first rule whose three patterns all match wins.
//! Skipped instruments read as neutral, so a partial batch still resolves.

use serde::{Deserialize, Serialize};

use profilelab_core::{SignalKind, Stance, Tone};

use crate::batch::BatchOutcome;
use crate::config::InstrumentRole;

/// Portfolio-level outcome handed to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub code: i8,
    pub title: String,
    pub advice: Vec<String>,
    pub tone: Tone,
}

impl Verdict {
    /// Catch-all: range-bound market, stand aside.
    pub fn neutral() -> Self {
        Self {
            code: 0,
            title: "Range-bound market / volatility protection".into(),
            advice: vec![
                "Watch more, trade less.".into(),
                "Wait for price to come back to VAL.".into(),
                "Avoid high-volatility days.".into(),
            ],
            tone: Tone::Cyan,
        }
    }
}

/// Pattern one role's signal must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolePattern {
    Is(SignalKind),
    Stance(Stance),
    NotStance(Stance),
    Any,
}

impl RolePattern {
    fn matches(&self, signal: SignalKind) -> bool {
        match self {
            RolePattern::Is(kind) => signal == *kind,
            RolePattern::Stance(stance) => signal.stance() == *stance,
            RolePattern::NotStance(stance) => signal.stance() != *stance,
            RolePattern::Any => true,
        }
    }
}

/// One row of the verdict table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictRule {
    pub broad: RolePattern,
    pub growth: RolePattern,
    pub canary: RolePattern,
    pub verdict: Verdict,
}

impl VerdictRule {
    fn matches(&self, outcome: &BatchOutcome) -> bool {
        self.broad.matches(outcome.signal_for(InstrumentRole::Broad))
            && self
                .growth
                .matches(outcome.signal_for(InstrumentRole::Growth))
            && self
                .canary
                .matches(outcome.signal_for(InstrumentRole::Canary))
    }
}

/// The shipped rule table, in priority order.
pub fn default_rules() -> Vec<VerdictRule> {
    vec![
        // Deep oversold strike on the growth leg outranks everything: the
        // contrarian entry is taken even while the tape looks broken.
        VerdictRule {
            broad: RolePattern::Any,
            growth: RolePattern::Is(SignalKind::SniperBuy),
            canary: RolePattern::Any,
            verdict: Verdict {
                code: 3,
                title: "Deep oversold: sniper entry".into(),
                advice: vec![
                    "Deploy the configured sniper fraction into the growth leg.".into(),
                    "Stop at the short-horizon trailing level.".into(),
                    "Do not average down a second time.".into(),
                ],
                tone: Tone::Green,
            },
        },
        // Every leg breaking down at once.
        VerdictRule {
            broad: RolePattern::Stance(Stance::Bearish),
            growth: RolePattern::Stance(Stance::Bearish),
            canary: RolePattern::Stance(Stance::Bearish),
            verdict: Verdict {
                code: -2,
                title: "Crash alert: systemic selloff".into(),
                advice: vec![
                    "Exit all longs; cash is king.".into(),
                    "Consider shorting the canary.".into(),
                    "Do not catch knives.".into(),
                ],
                tone: Tone::Red,
            },
        },
        // The canary died first (reachable only when not all legs are
        // bearish, because the crash rule sits above).
        VerdictRule {
            broad: RolePattern::Any,
            growth: RolePattern::Any,
            canary: RolePattern::Stance(Stance::Bearish),
            verdict: Verdict {
                code: -1,
                title: "Regime warning: the canary just died".into(),
                advice: vec![
                    "Market risk is rising fast.".into(),
                    "Tighten stops on growth positions.".into(),
                    "No new size.".into(),
                ],
                tone: Tone::Yellow,
            },
        },
        // Both major legs pulled back into value together.
        VerdictRule {
            broad: RolePattern::Is(SignalKind::DipBuy),
            growth: RolePattern::Is(SignalKind::DipBuy),
            canary: RolePattern::Any,
            verdict: Verdict {
                code: 2,
                title: "Golden opportunity: textbook pullback".into(),
                advice: vec![
                    "Buy the broad and growth legs with conviction.".into(),
                    "Defend today's low.".into(),
                ],
                tone: Tone::Green,
            },
        },
        // Growth dipped while the canary still breathes.
        VerdictRule {
            broad: RolePattern::Any,
            growth: RolePattern::Is(SignalKind::DipBuy),
            canary: RolePattern::NotStance(Stance::Bearish),
            verdict: Verdict {
                code: 1,
                title: "Growth entry: benign pullback".into(),
                advice: vec![
                    "The canary is alive; this is rotation, not distribution.".into(),
                    "Scale into the growth leg.".into(),
                ],
                tone: Tone::Green,
            },
        },
    ]
}

/// First-match lookup; falls back to the neutral verdict.
pub fn portfolio_verdict(rules: &[VerdictRule], outcome: &BatchOutcome) -> Verdict {
    rules
        .iter()
        .find(|rule| rule.matches(outcome))
        .map(|rule| rule.verdict.clone())
        .unwrap_or_else(Verdict::neutral)
}
