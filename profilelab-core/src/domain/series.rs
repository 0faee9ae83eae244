//! Series — a validated, chronologically ordered OHLCV sequence.
//!
//! Construction is the validation boundary: a `Series` can only exist if its
//! points are sane and strictly increasing by timestamp. Everything downstream
//! (indicators, profile, signal engine) reads it as an immutable slice.

use chrono::Duration;
use thiserror::Error;

use crate::domain::PricePoint;

/// Errors raised while constructing a Series.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("point {index}: timestamps must be strictly increasing")]
    NonMonotonicTimestamp { index: usize },

    #[error("point {index}: malformed OHLCV values")]
    MalformedPoint { index: usize },
}

/// Chronologically ordered OHLCV series; read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    /// Validate and wrap a point sequence.
    ///
    /// Rejects out-of-order or duplicate timestamps and insane OHLCV values.
    /// An empty sequence is a valid (empty) series; callers that need data
    /// signal that separately.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, point) in points.iter().enumerate() {
            if !point.is_sane() {
                return Err(SeriesError::MalformedPoint { index });
            }
            if index > 0 && point.timestamp <= points[index - 1].timestamp {
                return Err(SeriesError::NonMonotonicTimestamp { index });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The last `n` points (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Points within the trailing `days` calendar window, measured back from
    /// the last timestamp (exclusive cutoff, matching a `ts > last - days`
    /// slice). Empty series yields an empty slice.
    pub fn tail_days(&self, days: u32) -> &[PricePoint] {
        let Some(last) = self.points.last() else {
            return &[];
        };
        let cutoff = last.timestamp - Duration::days(i64::from(days));
        let start = self.points.partition_point(|p| p.timestamp <= cutoff);
        &self.points[start..]
    }

    /// Highest close over the last `n` points; None for an empty series.
    pub fn highest_close(&self, n: usize) -> Option<f64> {
        self.tail(n)
            .iter()
            .map(|p| p.close)
            .fold(None, |acc, c| Some(acc.map_or(c, |a: f64| a.max(c))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn accepts_ordered_points() {
        let s = Series::new(vec![point(1, 100.0), point(2, 101.0), point(3, 99.0)]).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.last().unwrap().close, 99.0);
    }

    #[test]
    fn rejects_duplicate_timestamp() {
        let err = Series::new(vec![point(1, 100.0), point(1, 101.0)]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonMonotonicTimestamp { index: 1 }
        ));
    }

    #[test]
    fn rejects_backward_timestamp() {
        let err = Series::new(vec![point(2, 100.0), point(1, 101.0)]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonMonotonicTimestamp { index: 1 }
        ));
    }

    #[test]
    fn rejects_malformed_point() {
        let mut bad = point(1, 100.0);
        bad.high = bad.low - 5.0;
        let err = Series::new(vec![bad]).unwrap_err();
        assert!(matches!(err, SeriesError::MalformedPoint { index: 0 }));
    }

    #[test]
    fn empty_series_is_valid() {
        let s = Series::new(vec![]).unwrap();
        assert!(s.is_empty());
        assert!(s.last().is_none());
        assert!(s.tail_days(30).is_empty());
    }

    #[test]
    fn tail_returns_last_n() {
        let s = Series::new((1..=5).map(|d| point(d, 100.0 + d as f64)).collect()).unwrap();
        let tail = s.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].close, 104.0);
        assert_eq!(tail[1].close, 105.0);
        assert_eq!(s.tail(10).len(), 5);
    }

    #[test]
    fn tail_days_cuts_by_timestamp() {
        let s = Series::new((1..=10).map(|d| point(d, 100.0)).collect()).unwrap();
        // Last timestamp is Jan 10; a 3-day window keeps Jan 8, 9, 10.
        let window = s.tail_days(3);
        assert_eq!(window.len(), 3);
        assert_eq!(
            window[0].timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
    }

    #[test]
    fn highest_close_over_window() {
        let s = Series::new(vec![point(1, 100.0), point(2, 110.0), point(3, 105.0)]).unwrap();
        assert_eq!(s.highest_close(2), Some(110.0));
        assert_eq!(s.highest_close(1), Some(105.0));
        assert_eq!(Series::new(vec![]).unwrap().highest_close(5), None);
    }
}
