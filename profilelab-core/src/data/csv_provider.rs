//! CSV-backed series provider.
//!
//! Reads `{dir}/{TICKER}.{interval}.csv` with a
//! `timestamp,open,high,low,close,volume` header. Timestamps accept
//! `YYYY-MM-DD HH:MM:SS` or bare `YYYY-MM-DD` (midnight). Rows are trimmed,
//! validated through the Series constructor, and cut to the requested
//! trailing window.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::data::provider::{FetchError, Interval, SeriesProvider};
use crate::domain::{PricePoint, Series};

pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self, ticker: &str, interval: Interval) -> PathBuf {
        self.dir.join(format!("{ticker}.{interval}.csv"))
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_field(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn read_points(path: &Path) -> Result<Vec<PricePoint>, FetchError> {
    let display = path.display().to_string();
    let malformed = |reason: String| FetchError::Malformed {
        path: display.clone(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| malformed(e.to_string()))?;

    let mut points = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // Header occupies line 1; data starts on line 2.
        let line = i + 2;
        let record = record.map_err(|e| malformed(format!("line {line}: {e}")))?;
        if record.len() < 6 {
            return Err(malformed(format!(
                "line {line}: expected 6 columns, got {}",
                record.len()
            )));
        }
        let timestamp = parse_timestamp(&record[0])
            .ok_or_else(|| malformed(format!("line {line}: bad timestamp '{}'", &record[0])))?;
        let mut fields = [0.0_f64; 5];
        for (slot, idx) in fields.iter_mut().zip(1..6) {
            *slot = parse_field(&record[idx]).ok_or_else(|| {
                malformed(format!("line {line}: bad numeric field '{}'", &record[idx]))
            })?;
        }
        points.push(PricePoint {
            timestamp,
            open: fields[0],
            high: fields[1],
            low: fields[2],
            close: fields[3],
            volume: fields[4],
        });
    }
    Ok(points)
}

impl SeriesProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        ticker: &str,
        interval: Interval,
        lookback_days: u32,
    ) -> Result<Series, FetchError> {
        let path = self.file_path(ticker, interval);
        if !path.is_file() {
            return Err(FetchError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }

        let points = read_points(&path)?;
        if points.is_empty() {
            return Err(FetchError::NotEnoughData {
                symbol: ticker.to_string(),
                needed: 1,
                got: 0,
            });
        }

        let full = Series::new(points).map_err(|source| FetchError::BadSeries {
            symbol: ticker.to_string(),
            source,
        })?;
        let window = full.tail_days(lookback_days).to_vec();
        Series::new(window).map_err(|source| FetchError::BadSeries {
            symbol: ticker.to_string(),
            source,
        })
    }
}
