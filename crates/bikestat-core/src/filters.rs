//! Filtering module for rental records
//!
//! This module provides the filter stage of the pipeline. A [`FilterCriteria`]
//! combines optional clauses for year, months, working-day flag, weather
//! categories and an inclusive date range; a record passes when it satisfies
//! every active clause.
//!
//! # Examples
//!
//! ```
//! use bikestat_core::filters::{FilterCriteria, WorkingDayFilter};
//! use bikestat_core::types::WeatherCategory;
//! use chrono::NaiveDate;
//!
//! // Working days in the first quarter of 2011 with clear weather
//! let criteria = FilterCriteria::new()
//!     .with_year(0)
//!     .with_months([1, 2, 3])
//!     .with_working_day(WorkingDayFilter::Working)
//!     .with_weather([WeatherCategory::Clear]);
//! assert!(!criteria.is_unrestricted());
//! ```

use crate::error::{BikestatError, Result};
use crate::types::{RentalRecord, WeatherCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Working-day clause of a filter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingDayFilter {
    /// No filtering on the working-day flag
    #[default]
    Any,
    /// Keep working days only
    Working,
    /// Keep weekends and holidays only
    Holiday,
}

impl WorkingDayFilter {
    /// Check a working-day flag against this clause
    pub fn matches(self, working_day: bool) -> bool {
        match self {
            WorkingDayFilter::Any => true,
            WorkingDayFilter::Working => working_day,
            WorkingDayFilter::Holiday => !working_day,
        }
    }
}

/// Inclusive date range
///
/// Construction does not check ordering so that a reversed range can reach
/// the filter stage and be reported there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Ensure `start <= end`
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(BikestatError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Check whether a date falls within the range (both ends inclusive)
    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.start && *date <= self.end
    }
}

/// Filter configuration for rental records
///
/// All clauses are optional and can be combined. Empty month or weather
/// sets mean "all".
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Year flag (0 or 1)
    pub year: Option<u8>,
    /// Months to keep (1-12)
    pub months: BTreeSet<u8>,
    /// Working-day clause
    pub working_day: WorkingDayFilter,
    /// Weather categories to keep
    pub weather_categories: BTreeSet<WeatherCategory>,
    /// Inclusive date range
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the year filter
    pub fn with_year(mut self, year: u8) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the month filter
    pub fn with_months(mut self, months: impl IntoIterator<Item = u8>) -> Self {
        self.months = months.into_iter().collect();
        self
    }

    /// Set the working-day filter
    pub fn with_working_day(mut self, working_day: WorkingDayFilter) -> Self {
        self.working_day = working_day;
        self
    }

    /// Set the weather filter
    pub fn with_weather(mut self, weather: impl IntoIterator<Item = WeatherCategory>) -> Self {
        self.weather_categories = weather.into_iter().collect();
        self
    }

    /// Set the date range filter
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    /// Validate the criteria before filtering
    pub fn validate(&self) -> Result<()> {
        if let Some(range) = &self.date_range {
            range.validate()?;
        }
        Ok(())
    }

    /// True when no clause restricts the record set
    pub fn is_unrestricted(&self) -> bool {
        self.year.is_none()
            && self.months.is_empty()
            && self.working_day == WorkingDayFilter::Any
            && self.weather_categories.is_empty()
            && self.date_range.is_none()
    }

    /// Check if a record passes the filter
    pub fn matches(&self, record: &RentalRecord) -> bool {
        if let Some(year) = self.year {
            if record.year != year {
                return false;
            }
        }

        if !self.months.is_empty() && !self.months.contains(&record.month) {
            return false;
        }

        if !self.working_day.matches(record.working_day) {
            return false;
        }

        if !self.weather_categories.is_empty()
            && !self.weather_categories.contains(&record.weather_category)
        {
            return false;
        }

        if let Some(range) = &self.date_range {
            if !range.contains(&record.date) {
                return false;
            }
        }

        true
    }
}

/// Apply filter criteria to a record set
///
/// Returns the matching records in input order.
///
/// # Errors
///
/// Returns `BikestatError::InvalidRange` when the date range starts after it ends.
pub fn apply_filters(records: &[RentalRecord], criteria: &FilterCriteria) -> Result<Vec<RentalRecord>> {
    criteria.validate()?;

    let filtered: Vec<RentalRecord> = records
        .iter()
        .filter(|record| criteria.matches(record))
        .copied()
        .collect();

    debug!("Filtered {} of {} records", filtered.len(), records.len());
    Ok(filtered)
}

/// Result of a filter pass that may have fallen back to the full record set
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Records passed on to aggregation
    pub records: Vec<RentalRecord>,
    /// True when an invalid date range caused the unfiltered set to be used
    pub range_fallback: bool,
}

/// Apply filter criteria, substituting the unfiltered set on an invalid date range
///
/// A reversed date range logs a warning and yields every record instead of failing.
pub fn apply_filters_with_fallback(records: &[RentalRecord], criteria: &FilterCriteria) -> FilterOutcome {
    match apply_filters(records, criteria) {
        Ok(records) => FilterOutcome {
            records,
            range_fallback: false,
        },
        Err(e) => {
            warn!("{e}; showing all {} records", records.len());
            FilterOutcome {
                records: records.to_vec(),
                range_fallback: true,
            }
        }
    }
}

/// Complete a possibly one-sided date range from the data bounds
///
/// A missing start defaults to the earliest record date and a missing end to
/// the latest, never crossing the given bound. A one-sided range that lies
/// wholly outside the data therefore matches nothing. Returns `None` when
/// neither bound is given or there are no records.
pub fn resolve_date_range(
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    records: &[RentalRecord],
) -> Option<DateRange> {
    let (min_date, max_date) = date_bounds(records)?;

    match (since, until) {
        (None, None) => None,
        (Some(start), Some(end)) => Some(DateRange::new(start, end)),
        (Some(start), None) => Some(DateRange::new(start, max_date.max(start))),
        (None, Some(end)) => Some(DateRange::new(min_date.min(end), end)),
    }
}

/// Earliest and latest record date
pub fn date_bounds(records: &[RentalRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|r| r.date).min()?;
    let max = records.iter().map(|r| r.date).max()?;
    Some((min, max))
}
