//! Aggregation data types for bikestat
//!
//! Pure data structures produced by the aggregation reducers.
//! These types have no dependencies on the data loader or output layer.

use crate::types::UserTotals;
use serde::{Deserialize, Serialize};

/// Mean total count for one hour of day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyMean {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Mean of `total_count` over records in this hour
    pub mean_count: f64,
}

/// Mean total count for one weekday
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayMean {
    /// Day of week (0 = Sunday)
    pub weekday: u8,
    /// Mean of `total_count` over records on this weekday
    pub mean_count: f64,
}

/// Mean casual and registered counts for one hour of day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyUserSplit {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Mean of `casual_count`
    pub mean_casual: f64,
    /// Mean of `registered_count`
    pub mean_registered: f64,
}

/// Busiest and quietest hour by mean count
///
/// Ties resolve to the first hour in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakTrough {
    pub peak_hour: u8,
    pub peak_value: f64,
    pub trough_hour: u8,
    pub trough_value: f64,
}

/// One equal-width histogram bin over `total_count`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub lower: f64,
    /// Upper edge (exclusive, except for the last bin)
    pub upper: f64,
    /// Number of records in the bin
    pub count: u64,
}

/// Distribution of hourly rental counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Sum of all bin counts
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Largest single bin count, zero for an empty histogram
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

/// Pearson correlations between the numeric record columns
///
/// `values[i][j]` is the correlation between `columns[i]` and `columns[j]`.
/// A `None` entry means one of the two columns has zero variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Look up the correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values.get(i)?.get(j).copied().flatten()
    }
}

/// Every aggregate for one filtered record set
///
/// Derived fresh on each filter pass and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Number of filtered records the aggregates were computed from
    pub record_count: usize,
    pub hourly_means: Vec<HourlyMean>,
    pub weekday_means: Vec<WeekdayMean>,
    pub hourly_user_split: Vec<HourlyUserSplit>,
    #[serde(flatten)]
    pub peak_trough: PeakTrough,
    pub user_totals: UserTotals,
}
