//! ProfileLab Runner — batch orchestration over the analysis core.
//!
//! This crate builds on `profilelab-core` to provide:
//! - TOML batch configuration with named presets and a content-hash RunId
//! - Parallel per-instrument evaluation with per-instrument isolation
//! - The ordered portfolio verdict table (first match wins)
//! - Report assembly: the JSON presenter contract and a text rendering
//! - The market-structure overview (watchlist momentum + breadth)

pub mod batch;
pub mod config;
pub mod report;
pub mod structure;
pub mod verdict;

pub use batch::{evaluate_batch, BatchError, BatchOutcome, EvaluatedInstrument, SkippedInstrument};
pub use config::{BatchConfig, BatchConfigError, InstrumentRole, InstrumentSpec, RunId};
pub use report::{build_report, render_text, BatchReport, SCHEMA_VERSION};
pub use structure::{
    build_structure_report, default_watchlist, BreadthDiagnosis, StructureReport, WatchCategory,
    WatchItem,
};
pub use verdict::{default_rules, portfolio_verdict, RolePattern, Verdict, VerdictRule};
