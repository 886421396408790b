//! Time axis and series models for the forecasting engine.
//!
//! All series amounts are integer minor currency units (cents) so that
//! aggregation never accumulates floating rounding drift; conversion to
//! major units happens only inside the numeric models.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar-month identifier, totally ordered, used as the time axis
/// for every history series.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Period { year, month }
    }

    /// The period containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Period::new(date.year(), date.month())
    }

    /// Absolute month index, used for gap-free arithmetic on the axis.
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_index(index: i64) -> Self {
        Period::new(index.div_euclid(12) as i32, (index.rem_euclid(12) + 1) as u32)
    }

    pub fn next(&self) -> Self {
        Period::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Self {
        Period::from_index(self.index() - 1)
    }

    /// The period `n` months earlier.
    pub fn minus_months(&self, n: usize) -> Self {
        Period::from_index(self.index() - n as i64)
    }

    /// Contiguous ascending window of `n` periods ending at `self`.
    pub fn window_ending_here(&self, n: usize) -> Vec<Period> {
        (0..n)
            .rev()
            .map(|back| self.minus_months(back))
            .collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One month of a series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub period: Period,
    pub amount_minor: i64,
}

/// A fixed-cadence monthly series: contiguous ascending periods with no
/// gaps (missing months are zero-filled, never skipped).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_all_zero(&self) -> bool {
        self.points.iter().all(|p| p.amount_minor == 0)
    }

    /// Last observed amount, zero when the series is empty.
    pub fn last_amount_minor(&self) -> i64 {
        self.points.last().map(|p| p.amount_minor).unwrap_or(0)
    }

    /// Values in major currency units, for the numeric models.
    pub fn values_major(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p.amount_minor as f64 / 100.0)
            .collect()
    }

    /// Lifetime total across the window, in minor units.
    pub fn total_minor(&self) -> i64 {
        self.points.iter().map(|p| p.amount_minor).sum()
    }
}

/// A time series keyed by a stable category identifier, with a best-effort
/// display name resolved from the catalog or the most recent record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    pub category_id: String,
    pub name: String,
    pub series: TimeSeries,
}

/// The full per-target history produced by one aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedHistory {
    pub savings: TimeSeries,
    pub commitments: TimeSeries,
    pub events: TimeSeries,
    pub categories: Vec<CategorySeries>,
}

impl AggregatedHistory {
    /// True when no record contributed anything to any series.
    pub fn is_empty(&self) -> bool {
        self.savings.is_all_zero()
            && self.commitments.is_all_zero()
            && self.events.is_all_zero()
            && self.categories.iter().all(|c| c.series.is_all_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_ordering_and_arithmetic() {
        let jan = Period::new(2025, 1);
        let dec_prev = Period::new(2024, 12);
        assert!(dec_prev < jan);
        assert_eq!(jan.prev(), dec_prev);
        assert_eq!(dec_prev.next(), jan);
        assert_eq!(jan.minus_months(13), Period::new(2023, 12));
    }

    #[test]
    fn test_period_index_roundtrip() {
        for year in [1999, 2024, 2025] {
            for month in 1..=12 {
                let p = Period::new(year, month);
                assert_eq!(Period::from_index(p.index()), p);
            }
        }
    }

    #[test]
    fn test_window_is_contiguous_ascending() {
        let window = Period::new(2025, 2).window_ending_here(14);
        assert_eq!(window.len(), 14);
        assert_eq!(window[0], Period::new(2024, 1));
        assert_eq!(window[13], Period::new(2025, 2));
        for pair in window.windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
        }
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::new(2025, 3).to_string(), "2025-03");
    }

    #[test]
    fn test_last_amount_of_empty_series_is_zero() {
        assert_eq!(TimeSeries::default().last_amount_minor(), 0);
    }
}
