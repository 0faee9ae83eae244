//! Deterministic synthetic series for demos and tests.
//!
//! Waveform data, not random: each ticker gets a phase offset derived from
//! its name, so repeated runs (and assertions) see identical series. Tagged
//! as a developer convenience — synthetic output must never be mistaken for
//! market data.

use chrono::{NaiveDate, NaiveDateTime};

use crate::data::provider::{FetchError, Interval, SeriesProvider};
use crate::domain::{PricePoint, Series};

pub struct SyntheticProvider;

fn phase_for(ticker: &str) -> f64 {
    let sum: u32 = ticker.bytes().map(u32::from).sum();
    f64::from(sum % 628) / 100.0
}

fn base_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn make_point(timestamp: NaiveDateTime, t: f64, phase: f64) -> PricePoint {
    let base = 100.0 + 20.0 * (t / 37.0 + phase).sin() + 0.05 * t;
    let close = base + 0.8 * (t / 5.0 + phase).sin();
    let open = base;
    let high = open.max(close) + 1.2;
    let low = open.min(close) - 1.2;
    // Volume pulses so profiles get a usable distribution.
    let volume = 1.0e6 * (1.5 + (t / 11.0 + phase).cos());
    PricePoint {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
    }
}

impl SeriesProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        ticker: &str,
        interval: Interval,
        lookback_days: u32,
    ) -> Result<Series, FetchError> {
        let phase = phase_for(ticker);
        let base = base_timestamp();

        let points: Vec<PricePoint> = match interval {
            Interval::Daily => (0..lookback_days)
                .map(|i| {
                    make_point(
                        base + chrono::Duration::days(i64::from(i)),
                        f64::from(i),
                        phase,
                    )
                })
                .collect(),
            // Seven bars per session, hour-spaced.
            Interval::Hourly => (0..lookback_days.saturating_mul(7))
                .map(|i| {
                    let day = i / 7;
                    let hour = 9 + (i % 7);
                    make_point(
                        base + chrono::Duration::days(i64::from(day))
                            + chrono::Duration::hours(i64::from(hour)),
                        f64::from(i) / 7.0,
                        phase,
                    )
                })
                .collect(),
        };

        Series::new(points).map_err(|source| FetchError::BadSeries {
            symbol: ticker.to_string(),
            source,
        })
    }
}
