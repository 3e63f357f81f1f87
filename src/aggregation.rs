//! Aggregation module for summarizing filtered rental records
//!
//! This module provides the reducers run over a filtered record set: group-by
//! means per hour and weekday, the casual/registered split per hour, the
//! peak and trough hour, user totals, a count histogram and a correlation
//! matrix of the numeric columns.
//!
//! # Empty input
//!
//! Every reducer returns `BikestatError::EmptyInput` when given zero records
//! instead of a zero or empty table, so a genuinely empty selection can never
//! be mistaken for a day with no rentals. Callers check emptiness before
//! rendering anything.
//!
//! # Examples
//!
//! ```no_run
//! use bikestat::{aggregation::Aggregator, data_loader::DataLoader, filters::{apply_filters, FilterCriteria}};
//!
//! # async fn example() -> bikestat::Result<()> {
//! let loaded = DataLoader::new(None).await?.load_records().await?;
//! let filtered = apply_filters(&loaded.records, &FilterCriteria::new().with_year(1))?;
//!
//! let result = Aggregator::new().summarize(&filtered)?;
//! println!("Busiest hour: {}", result.peak_trough.peak_hour);
//! # Ok(())
//! # }
//! ```

use crate::aggregation_types::{
    AggregateResult, CorrelationMatrix, Histogram, HistogramBin, HourlyMean, HourlyUserSplit,
    PeakTrough, WeekdayMean,
};
use crate::error::{BikestatError, Result};
use crate::types::{RentalRecord, UserTotals};
use std::collections::BTreeMap;
use tracing::debug;

/// Default number of histogram bins
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Running sums for one group key
#[derive(Debug, Default, Clone, Copy)]
struct GroupAccumulator {
    count: u64,
    total: u64,
    casual: u64,
    registered: u64,
}

impl GroupAccumulator {
    fn add(&mut self, record: &RentalRecord) {
        self.count += 1;
        self.total += record.total_count;
        self.casual += record.casual_count;
        self.registered += record.registered_count;
    }

    fn mean(sum: u64, count: u64) -> f64 {
        sum as f64 / count as f64
    }

    fn mean_total(&self) -> f64 {
        Self::mean(self.total, self.count)
    }

    fn mean_casual(&self) -> f64 {
        Self::mean(self.casual, self.count)
    }

    fn mean_registered(&self) -> f64 {
        Self::mean(self.registered, self.count)
    }
}

/// Group records by a key, in ascending key order
fn group_by<F>(records: &[RentalRecord], key: F) -> BTreeMap<u8, GroupAccumulator>
where
    F: Fn(&RentalRecord) -> u8,
{
    let mut groups: BTreeMap<u8, GroupAccumulator> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

fn ensure_non_empty(records: &[RentalRecord], operation: &'static str) -> Result<()> {
    if records.is_empty() {
        return Err(BikestatError::EmptyInput(operation));
    }
    Ok(())
}

/// Mean `total_count` per hour of day
///
/// Hours with no records produce no entry.
pub fn mean_by_hour(records: &[RentalRecord]) -> Result<Vec<HourlyMean>> {
    ensure_non_empty(records, "mean_by_hour")?;

    Ok(group_by(records, |r| r.hour)
        .into_iter()
        .map(|(hour, acc)| HourlyMean {
            hour,
            mean_count: acc.mean_total(),
        })
        .collect())
}

/// Mean `total_count` per weekday (0 = Sunday)
pub fn mean_by_weekday(records: &[RentalRecord]) -> Result<Vec<WeekdayMean>> {
    ensure_non_empty(records, "mean_by_weekday")?;

    Ok(group_by(records, |r| r.weekday)
        .into_iter()
        .map(|(weekday, acc)| WeekdayMean {
            weekday,
            mean_count: acc.mean_total(),
        })
        .collect())
}

/// Mean casual and registered counts per hour of day
pub fn mean_user_split_by_hour(records: &[RentalRecord]) -> Result<Vec<HourlyUserSplit>> {
    ensure_non_empty(records, "mean_user_split_by_hour")?;

    Ok(group_by(records, |r| r.hour)
        .into_iter()
        .map(|(hour, acc)| HourlyUserSplit {
            hour,
            mean_casual: acc.mean_casual(),
            mean_registered: acc.mean_registered(),
        })
        .collect())
}

/// Busiest and quietest hour of an hourly mean table
///
/// Scans once with strict comparisons, so the first hour seen wins a tie.
pub fn peak_and_trough(hourly_means: &[HourlyMean]) -> Result<PeakTrough> {
    let (first, rest) = hourly_means
        .split_first()
        .ok_or(BikestatError::EmptyInput("peak_and_trough"))?;

    let mut result = PeakTrough {
        peak_hour: first.hour,
        peak_value: first.mean_count,
        trough_hour: first.hour,
        trough_value: first.mean_count,
    };

    for entry in rest {
        if entry.mean_count > result.peak_value {
            result.peak_hour = entry.hour;
            result.peak_value = entry.mean_count;
        }
        if entry.mean_count < result.trough_value {
            result.trough_hour = entry.hour;
            result.trough_value = entry.mean_count;
        }
    }

    Ok(result)
}

/// Sum of casual and registered rentals
pub fn totals(records: &[RentalRecord]) -> Result<UserTotals> {
    ensure_non_empty(records, "totals")?;

    let mut totals = UserTotals::default();
    for record in records {
        totals += UserTotals::from(record);
    }
    Ok(totals)
}

/// Equal-width histogram of `total_count`
///
/// Bins span `[min, max]` of the counts and the last bin is closed on the
/// right. When all counts are equal the span is widened by 0.5 on each side.
pub fn histogram(records: &[RentalRecord], bins: usize) -> Result<Histogram> {
    ensure_non_empty(records, "histogram")?;
    if bins == 0 {
        return Err(BikestatError::InvalidArgument(
            "histogram needs at least one bin".to_string(),
        ));
    }

    let min = records.iter().map(|r| r.total_count).min().unwrap_or(0) as f64;
    let max = records.iter().map(|r| r.total_count).max().unwrap_or(0) as f64;
    let (lower, upper) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (upper - lower) / bins as f64;

    let mut counts = vec![0u64; bins];
    for record in records {
        let offset = (record.total_count as f64 - lower) / width;
        let idx = (offset.floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lower + width * i as f64,
            upper: lower + width * (i + 1) as f64,
            count,
        })
        .collect();

    Ok(Histogram { bins })
}

/// Numeric columns included in the correlation matrix
pub const CORRELATION_COLUMNS: [&str; 9] = [
    "year",
    "month",
    "hour",
    "weekday",
    "working_day",
    "weather",
    "casual",
    "registered",
    "total",
];

fn numeric_columns(record: &RentalRecord) -> [f64; 9] {
    [
        f64::from(record.year),
        f64::from(record.month),
        f64::from(record.hour),
        f64::from(record.weekday),
        if record.working_day { 1.0 } else { 0.0 },
        f64::from(record.weather_category.code()),
        record.casual_count as f64,
        record.registered_count as f64,
        record.total_count as f64,
    ]
}

/// Pearson correlation between every pair of numeric columns
///
/// A pair involving a zero-variance column yields `None`.
pub fn correlation_matrix(records: &[RentalRecord]) -> Result<CorrelationMatrix> {
    ensure_non_empty(records, "correlation_matrix")?;

    const N: usize = CORRELATION_COLUMNS.len();
    let n = records.len() as f64;

    let mut means = [0.0f64; N];
    for record in records {
        for (mean, value) in means.iter_mut().zip(numeric_columns(record)) {
            *mean += value;
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    // Co-moment sums around the means
    let mut comoments = [[0.0f64; N]; N];
    for record in records {
        let values = numeric_columns(record);
        for i in 0..N {
            let di = values[i] - means[i];
            for j in i..N {
                comoments[i][j] += di * (values[j] - means[j]);
            }
        }
    }

    let mut values = vec![vec![None; N]; N];
    for i in 0..N {
        for j in i..N {
            let denom = (comoments[i][i] * comoments[j][j]).sqrt();
            let r = (denom > 0.0).then(|| (comoments[i][j] / denom).clamp(-1.0, 1.0));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: CORRELATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

/// Runs the summary reducers over a filtered record set
#[derive(Debug, Clone, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Compute every summary aggregate for one filtered record set
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` when `records` is empty.
    pub fn summarize(&self, records: &[RentalRecord]) -> Result<AggregateResult> {
        let hourly_means = mean_by_hour(records)?;
        let peak_trough = peak_and_trough(&hourly_means)?;

        let result = AggregateResult {
            record_count: records.len(),
            weekday_means: mean_by_weekday(records)?,
            hourly_user_split: mean_user_split_by_hour(records)?,
            user_totals: totals(records)?,
            hourly_means,
            peak_trough,
        };

        debug!(
            "Summarized {} records across {} hours",
            result.record_count,
            result.hourly_means.len()
        );
        Ok(result)
    }
}
