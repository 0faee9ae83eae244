//! ProfileLab CLI — evaluate signal batches and render reports.
//!
//! Commands:
//! - `run` — evaluate a batch from a TOML config (or the built-in index
//!   batch) and print the report as text or JSON
//! - `structure` — the market-structure overview table
//! - `presets` — list named parameter presets
//! - `check-data` — verify a CSV data directory can serve a config

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use profilelab_core::data::{CsvProvider, Interval, SeriesProvider, SyntheticProvider};
use profilelab_core::StrategyParams;
use profilelab_runner::{
    build_report, build_structure_report, default_rules, default_watchlist, evaluate_batch,
    portfolio_verdict, render_text, BatchConfig,
};

#[derive(Parser)]
#[command(
    name = "profilelab",
    about = "ProfileLab CLI — volume-profile signal engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a batch and print the signal report.
    Run {
        /// Path to a TOML batch config. Defaults to the built-in index batch.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preset override: core, hourly.
        #[arg(long)]
        preset: Option<String>,

        /// Directory of {TICKER}.{interval}.csv files.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Emit the report as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write the JSON report to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the market-structure overview (momentum table + breadth).
    Structure {
        /// Directory of {TICKER}.{interval}.csv files.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Daily history window in days.
        #[arg(long, default_value_t = 730)]
        lookback_days: u32,

        /// Emit JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List named parameter presets.
    Presets,
    /// Verify a CSV data directory can serve every instrument in a config.
    CheckData {
        /// Directory of {TICKER}.{interval}.csv files.
        #[arg(long)]
        data_dir: PathBuf,

        /// Path to a TOML batch config. Defaults to the built-in index batch.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            preset,
            data_dir,
            synthetic,
            json,
            output,
        } => run_batch(config, preset, data_dir, synthetic, json, output),
        Commands::Structure {
            data_dir,
            synthetic,
            lookback_days,
            json,
        } => run_structure(data_dir, synthetic, lookback_days, json),
        Commands::Presets => run_presets(),
        Commands::CheckData { data_dir, config } => run_check_data(data_dir, config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<BatchConfig> {
    match path {
        Some(path) => BatchConfig::from_path(&path)
            .with_context(|| format!("loading batch config {}", path.display())),
        None => Ok(BatchConfig::default_indices()),
    }
}

fn make_provider(
    data_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    synthetic: bool,
) -> Result<Box<dyn SeriesProvider>> {
    if synthetic {
        return Ok(Box::new(SyntheticProvider));
    }
    match data_dir.or(config_dir) {
        Some(dir) => Ok(Box::new(CsvProvider::new(dir))),
        None => bail!("no data source: pass --data-dir, set data_dir in the config, or use --synthetic"),
    }
}

fn run_batch(
    config_path: Option<PathBuf>,
    preset: Option<String>,
    data_dir: Option<PathBuf>,
    synthetic: bool,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(preset) = preset {
        config.preset = Some(preset);
        config.params = None;
    }

    let provider = make_provider(data_dir, config.data_dir.clone(), synthetic)?;
    let outcome = evaluate_batch(&config, provider.as_ref())?;
    if outcome.evaluated.is_empty() {
        log::warn!("no instrument produced a report; verdict falls back to neutral");
    }
    let verdict = portfolio_verdict(&default_rules(), &outcome);
    let report = build_report(&config, outcome, verdict);

    if let Some(path) = &output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        println!("Wrote {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn run_structure(
    data_dir: Option<PathBuf>,
    synthetic: bool,
    lookback_days: u32,
    json: bool,
) -> Result<()> {
    let provider = make_provider(data_dir, None, synthetic)?;
    let watchlist = default_watchlist();
    let report =
        build_structure_report(&watchlist, provider.as_ref(), lookback_days, Some(("SPY", "RSP")));

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("# Market structure");
    println!("{:<28} {:>10} {:>8} {:>8} {:>8}", "Name", "Last", "1d %", "1w %", "1m %");
    for row in &report.rows {
        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:+.2}"));
        println!(
            "{:<28} {:>10.2} {:>8} {:>8} {:>8}",
            format!("{} ({})", row.name, row.ticker),
            row.last,
            format!("{:+.2}", row.chg_1d),
            fmt_opt(row.chg_1w),
            fmt_opt(row.chg_1m),
        );
    }
    if !report.missing.is_empty() {
        println!("\nMissing data: {}", report.missing.join(", "));
    }
    if let Some(breadth) = &report.breadth {
        println!(
            "\nBreadth ({} vs {}): {:?} (spread {:+.2} pp)",
            breadth.equal_ticker, breadth.cap_ticker, breadth.diagnosis, breadth.spread
        );
    }
    Ok(())
}

fn run_presets() -> Result<()> {
    for name in StrategyParams::preset_names() {
        let params = StrategyParams::preset(name).expect("listed preset exists");
        println!(
            "{name}: lookback {}d, {} bins, VA {:.0}%, ATR x{}, panic x{}",
            params.lookback_days,
            params.bin_count,
            params.value_area_fraction * 100.0,
            params.atr_multiplier,
            params.panic_multiplier
        );
    }
    Ok(())
}

fn run_check_data(data_dir: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = CsvProvider::new(&data_dir);

    let mut failures = 0usize;
    for spec in &config.instruments {
        match provider.fetch(&spec.ticker, Interval::Daily, config.daily_lookback_days) {
            Ok(series) => println!("OK   {} ({} points)", spec.ticker, series.len()),
            Err(err) => {
                failures += 1;
                println!("FAIL {}: {err}", spec.ticker);
            }
        }
    }
    if failures > 0 {
        bail!("{failures} instrument(s) cannot be served from {}", data_dir.display());
    }
    println!("All {} instruments readable.", config.instruments.len());
    Ok(())
}
