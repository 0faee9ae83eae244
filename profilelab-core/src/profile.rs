//! Volume profile: price binning, Point of Control, Value Area.
//!
//! Bins partition the price range into `bin_count` equal-width intervals and
//! accumulate each point's volume at its typical price. The POC is the
//! highest-volume bin (ties to the lowest price); the value area grows
//! outward from the POC toward the heavier neighbor until it holds the
//! target volume fraction or runs out of bins.
//!
//! Tie-break conventions (POC → lowest bin, VA tie → extend upward) are
//! load-bearing and must not be altered without domain confirmation.

use serde::{Deserialize, Serialize};

use crate::domain::PricePoint;
use crate::params::BinRangePolicy;

/// One price bucket of the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBin {
    pub lower: f64,
    pub upper: f64,
    pub mid: f64,
    pub volume: f64,
}

/// Computed profile: POC, value area bounds, and the full bin ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    /// Midpoint of the highest-volume bin.
    pub poc_price: f64,
    /// Lower bound of the lowest value-area bin.
    pub val_price: f64,
    /// Upper bound of the highest value-area bin.
    pub vah_price: f64,
    /// Contiguous equal-width bins covering the full range.
    pub bins: Vec<PriceBin>,
    /// Total accumulated volume (contributing points only).
    pub total_volume: f64,
}

/// Compute the volume profile for a series slice.
///
/// Returns None when no profile is computable: an empty slice or a price
/// range that collapses to zero width. Callers treat None as "profile
/// unavailable" for the cycle; it is never an error.
pub fn volume_profile(
    points: &[PricePoint],
    bin_count: usize,
    value_area_fraction: f64,
    policy: BinRangePolicy,
) -> Option<ProfileResult> {
    let (range_min, range_max) = match policy {
        BinRangePolicy::TypicalPrice => bounds(points.iter().map(|p| p.typical_price()))?,
        BinRangePolicy::HighLow => {
            let (min_low, _) = bounds(points.iter().map(|p| p.low))?;
            let (_, max_high) = bounds(points.iter().map(|p| p.high))?;
            (min_low, max_high)
        }
    };
    profile_in_range(points, range_min, range_max, bin_count, value_area_fraction)
}

fn bounds(prices: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    prices.fold(None, |acc, p| {
        Some(match acc {
            None => (p, p),
            Some((lo, hi)) => (lo.min(p), hi.max(p)),
        })
    })
}

/// Profile over an explicit price range. Points whose typical price falls
/// outside the range are dropped, not errored.
fn profile_in_range(
    points: &[PricePoint],
    range_min: f64,
    range_max: f64,
    bin_count: usize,
    value_area_fraction: f64,
) -> Option<ProfileResult> {
    debug_assert!(bin_count >= 2);
    if points.is_empty() || !(range_max > range_min) {
        return None;
    }

    let width = (range_max - range_min) / bin_count as f64;
    let mut bins: Vec<PriceBin> = (0..bin_count)
        .map(|i| {
            let lower = range_min + i as f64 * width;
            let upper = if i + 1 == bin_count {
                range_max
            } else {
                range_min + (i + 1) as f64 * width
            };
            PriceBin {
                lower,
                upper,
                mid: (lower + upper) / 2.0,
                volume: 0.0,
            }
        })
        .collect();

    for point in points {
        let price = point.typical_price();
        if price < range_min || price > range_max {
            log::warn!(
                "typical price {price} outside profile range [{range_min}, {range_max}]; dropping point"
            );
            continue;
        }
        let idx = (((price - range_min) / width) as usize).min(bin_count - 1);
        bins[idx].volume += point.volume;
    }

    // POC: max volume, ties to the lowest bin index.
    let mut poc_idx = 0;
    for (i, bin) in bins.iter().enumerate() {
        if bin.volume > bins[poc_idx].volume {
            poc_idx = i;
        }
    }

    let total_volume: f64 = bins.iter().map(|b| b.volume).sum();
    let target = value_area_fraction * total_volume;

    // Greedy value-area expansion from the POC. Both boundary indices move
    // monotonically outward and are bounded, so this terminates.
    let mut low = poc_idx;
    let mut up = poc_idx;
    let mut accumulated = bins[poc_idx].volume;
    while accumulated < target {
        let up_next = (up + 1 < bin_count).then(|| bins[up + 1].volume);
        let down_next = (low > 0).then(|| bins[low - 1].volume);
        match (up_next, down_next) {
            (None, None) => break,
            (Some(v), None) => {
                up += 1;
                accumulated += v;
            }
            (None, Some(v)) => {
                low -= 1;
                accumulated += v;
            }
            // Equal adjacent volume extends upward.
            (Some(vu), Some(vd)) => {
                if vu >= vd {
                    up += 1;
                    accumulated += vu;
                } else {
                    low -= 1;
                    accumulated += vd;
                }
            }
        }
    }

    Some(ProfileResult {
        poc_price: bins[poc_idx].mid,
        val_price: bins[low].lower,
        vah_price: bins[up].upper,
        bins,
        total_volume,
    })
}

impl ProfileResult {
    /// Accumulated volume inside [val_price, vah_price].
    pub fn value_area_volume(&self) -> f64 {
        self.bins
            .iter()
            .filter(|b| b.lower >= self.val_price - 1e-9 && b.upper <= self.vah_price + 1e-9)
            .map(|b| b.volume)
            .sum()
    }
}
