//! Market-structure overview: watchlist momentum table + breadth check.
//!
//! A coarse second dashboard beside the signal batch: daily/weekly/monthly
//! percentage moves for a categorized watchlist, sectors ranked by the daily
//! move, and a breadth diagnosis comparing the equal-weight proxy against
//! the cap-weight proxy. Thin tickers are reported as missing, not errors.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use profilelab_core::data::{Interval, SeriesProvider};
use profilelab_core::Tone;

/// Watchlist grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchCategory {
    Macro,
    Sectors,
    Breadth,
}

/// One watched ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchItem {
    pub ticker: String,
    pub name: String,
    pub category: WatchCategory,
    /// Risk gauges (VIX-like) color green when falling, red when rising.
    #[serde(default)]
    pub risk_inverted: bool,
}

/// Momentum row for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMomentum {
    pub ticker: String,
    pub name: String,
    pub category: WatchCategory,
    pub risk_inverted: bool,
    pub last: f64,
    /// Percent change over 1 trading day.
    pub chg_1d: f64,
    /// Percent change over 5 trading days; None with insufficient history.
    pub chg_1w: Option<f64>,
    /// Percent change over 22 trading days; None with insufficient history.
    pub chg_1m: Option<f64>,
}

impl TickerMomentum {
    /// Presentation tone for the daily move, honoring risk inversion.
    pub fn tone_1d(&self) -> Tone {
        let rising = self.chg_1d > 0.0;
        match (rising, self.risk_inverted) {
            (true, false) | (false, true) => Tone::Green,
            (true, true) | (false, false) => Tone::Red,
        }
    }
}

/// Breadth reading from the equal-weight vs cap-weight daily spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadthDiagnosis {
    /// Equal-weight leading: participation is broad.
    Healthy,
    /// Cap-weight carrying the tape alone.
    Weak,
    /// Moving together.
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthBanner {
    pub diagnosis: BreadthDiagnosis,
    /// equal-weight chg_1d minus cap-weight chg_1d, in percent points.
    pub spread: f64,
    pub cap_ticker: String,
    pub equal_ticker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureReport {
    pub rows: Vec<TickerMomentum>,
    pub missing: Vec<String>,
    pub breadth: Option<BreadthBanner>,
}

/// The shipped watchlist: macro gauges, the eleven sectors, breadth proxies.
pub fn default_watchlist() -> Vec<WatchItem> {
    fn item(ticker: &str, name: &str, category: WatchCategory, risk_inverted: bool) -> WatchItem {
        WatchItem {
            ticker: ticker.into(),
            name: name.into(),
            category,
            risk_inverted,
        }
    }
    vec![
        item("^VIX", "Volatility (VIX)", WatchCategory::Macro, true),
        item("^TNX", "US 10Y yield", WatchCategory::Macro, true),
        item("DX-Y.NYB", "Dollar index (DXY)", WatchCategory::Macro, true),
        item("BTC-USD", "Bitcoin", WatchCategory::Macro, false),
        item("GC=F", "Gold", WatchCategory::Macro, false),
        item("CL=F", "Crude oil", WatchCategory::Macro, false),
        item("TLT", "20Y Treasuries", WatchCategory::Macro, false),
        item("HYG", "High yield credit", WatchCategory::Macro, false),
        item("XLK", "Technology", WatchCategory::Sectors, false),
        item("XLF", "Financials", WatchCategory::Sectors, false),
        item("XLE", "Energy", WatchCategory::Sectors, false),
        item("XLV", "Health care", WatchCategory::Sectors, false),
        item("XLY", "Discretionary", WatchCategory::Sectors, false),
        item("XLP", "Staples", WatchCategory::Sectors, false),
        item("XLI", "Industrials", WatchCategory::Sectors, false),
        item("XLC", "Communications", WatchCategory::Sectors, false),
        item("XLB", "Materials", WatchCategory::Sectors, false),
        item("XLU", "Utilities", WatchCategory::Sectors, false),
        item("SMH", "Semiconductors", WatchCategory::Sectors, false),
        item("SPY", "S&P 500 (cap weight)", WatchCategory::Breadth, false),
        item("RSP", "S&P 500 (equal weight)", WatchCategory::Breadth, false),
    ]
}

fn pct_change(closes: &[f64], bars_back: usize) -> Option<f64> {
    let n = closes.len();
    if n <= bars_back {
        return None;
    }
    let then = closes[n - 1 - bars_back];
    if then == 0.0 {
        return None;
    }
    Some((closes[n - 1] - then) / then * 100.0)
}

fn momentum_for(
    item: &WatchItem,
    provider: &dyn SeriesProvider,
    lookback_days: u32,
) -> Option<TickerMomentum> {
    let series = match provider.fetch(&item.ticker, Interval::Daily, lookback_days) {
        Ok(series) => series,
        Err(err) => {
            log::warn!("structure: no data for {} ({err})", item.ticker);
            return None;
        }
    };
    let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
    if closes.len() < 2 {
        return None;
    }
    Some(TickerMomentum {
        ticker: item.ticker.clone(),
        name: item.name.clone(),
        category: item.category,
        risk_inverted: item.risk_inverted,
        last: *closes.last().unwrap(),
        chg_1d: pct_change(&closes, 1).unwrap_or(0.0),
        chg_1w: pct_change(&closes, 5),
        chg_1m: pct_change(&closes, 22),
    })
}

const BREADTH_THRESHOLD: f64 = 0.1;

fn diagnose(spread: f64) -> BreadthDiagnosis {
    if spread > BREADTH_THRESHOLD {
        BreadthDiagnosis::Healthy
    } else if spread < -BREADTH_THRESHOLD {
        BreadthDiagnosis::Weak
    } else {
        BreadthDiagnosis::Balanced
    }
}

/// Build the structure report.
///
/// `breadth_pair` is (cap-weight ticker, equal-weight ticker); the banner is
/// omitted when either leg is missing.
pub fn build_structure_report(
    watchlist: &[WatchItem],
    provider: &dyn SeriesProvider,
    lookback_days: u32,
    breadth_pair: Option<(&str, &str)>,
) -> StructureReport {
    let fetched: Vec<(usize, Option<TickerMomentum>)> = watchlist
        .par_iter()
        .enumerate()
        .map(|(i, item)| (i, momentum_for(item, provider, lookback_days)))
        .collect();

    let mut macro_rows = Vec::new();
    let mut sector_rows = Vec::new();
    let mut breadth_rows = Vec::new();
    let mut missing = Vec::new();
    for (i, row) in fetched {
        match row {
            Some(row) => match row.category {
                WatchCategory::Macro => macro_rows.push(row),
                WatchCategory::Sectors => sector_rows.push(row),
                WatchCategory::Breadth => breadth_rows.push(row),
            },
            None => missing.push(watchlist[i].ticker.clone()),
        }
    }

    // Sectors rank by the daily move; other categories keep watchlist order.
    sector_rows.sort_by(|a, b| {
        b.chg_1d
            .partial_cmp(&a.chg_1d)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut rows = macro_rows;
    rows.extend(sector_rows);
    rows.extend(breadth_rows);

    let breadth = breadth_pair.and_then(|(cap, equal)| {
        let find = |t: &str| rows.iter().find(|r| r.ticker == t);
        match (find(cap), find(equal)) {
            (Some(c), Some(e)) => {
                let spread = e.chg_1d - c.chg_1d;
                Some(BreadthBanner {
                    diagnosis: diagnose(spread),
                    spread,
                    cap_ticker: cap.to_string(),
                    equal_ticker: equal.to_string(),
                })
            }
            _ => None,
        }
    });

    StructureReport {
        rows,
        missing,
        breadth,
    }
}
