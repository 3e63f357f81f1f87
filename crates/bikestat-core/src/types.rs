//! Core domain types for bikestat
//!
//! This module contains the fundamental types used throughout the bikestat library:
//! the validated hourly rental record, the weather category code, and
//! casual/registered user totals.

use crate::error::{BikestatError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Calendar year encoded by `year == 0`
pub const BASE_YEAR: i32 = 2011;

/// Weather situation code for an hourly record
///
/// The numeric codes 1-4 are ordinal: higher means more adverse conditions.
///
/// # Examples
/// ```
/// use bikestat_core::types::WeatherCategory;
///
/// let weather = WeatherCategory::try_from(2).unwrap();
/// assert_eq!(weather, WeatherCategory::Mist);
/// assert_eq!(weather.code(), 2);
/// assert!(WeatherCategory::try_from(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WeatherCategory {
    /// Clear, few clouds, partly cloudy
    Clear = 1,
    /// Mist, cloudy, broken clouds
    Mist = 2,
    /// Light snow, light rain, scattered clouds
    LightPrecipitation = 3,
    /// Heavy rain, ice pellets, thunderstorm, fog
    HeavyPrecipitation = 4,
}

impl WeatherCategory {
    /// All categories in ascending code order
    pub const ALL: [WeatherCategory; 4] = [
        WeatherCategory::Clear,
        WeatherCategory::Mist,
        WeatherCategory::LightPrecipitation,
        WeatherCategory::HeavyPrecipitation,
    ];

    /// Numeric code (1-4)
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear",
            WeatherCategory::Mist => "Mist",
            WeatherCategory::LightPrecipitation => "Light precipitation",
            WeatherCategory::HeavyPrecipitation => "Heavy precipitation",
        }
    }
}

impl TryFrom<u8> for WeatherCategory {
    type Error = BikestatError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(WeatherCategory::Clear),
            2 => Ok(WeatherCategory::Mist),
            3 => Ok(WeatherCategory::LightPrecipitation),
            4 => Ok(WeatherCategory::HeavyPrecipitation),
            other => Err(BikestatError::InvalidRecord(format!(
                "weather category must be between 1-4, got {other}"
            ))),
        }
    }
}

impl From<WeatherCategory> for u8 {
    fn from(weather: WeatherCategory) -> Self {
        weather.code()
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One hourly row of the rental dataset
///
/// Records are validated on construction and never mutated afterwards.
/// The count invariant `total_count == casual_count + registered_count`
/// always holds for a constructed record.
///
/// # Examples
/// ```
/// use bikestat_core::types::{RentalRecord, WeatherCategory};
/// use chrono::NaiveDate;
///
/// let record = RentalRecord::new(
///     NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
///     0, 1, 8, 6, false,
///     WeatherCategory::Clear,
///     3, 13, 16,
/// ).unwrap();
/// assert_eq!(record.total_count, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRecord {
    /// Calendar date of the hour
    pub date: NaiveDate,
    /// 0 for the first year of the span, 1 for the second
    pub year: u8,
    /// Month (1-12)
    pub month: u8,
    /// Hour of day (0-23)
    pub hour: u8,
    /// Day of week (0 = Sunday .. 6 = Saturday)
    pub weekday: u8,
    /// Whether the day is neither weekend nor holiday
    pub working_day: bool,
    /// Weather situation
    pub weather_category: WeatherCategory,
    /// Rentals by casual users
    pub casual_count: u64,
    /// Rentals by registered users
    pub registered_count: u64,
    /// All rentals in the hour
    pub total_count: u64,
}

impl RentalRecord {
    /// Build a validated record
    ///
    /// # Errors
    ///
    /// Returns `BikestatError::InvalidRecord` when a field is out of range or
    /// the total does not equal casual plus registered.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        year: u8,
        month: u8,
        hour: u8,
        weekday: u8,
        working_day: bool,
        weather_category: WeatherCategory,
        casual_count: u64,
        registered_count: u64,
        total_count: u64,
    ) -> Result<Self> {
        if year > 1 {
            return Err(BikestatError::InvalidRecord(format!(
                "year must be 0 or 1, got {year}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(BikestatError::InvalidRecord(format!(
                "month must be between 1-12, got {month}"
            )));
        }
        if hour > 23 {
            return Err(BikestatError::InvalidRecord(format!(
                "hour must be between 0-23, got {hour}"
            )));
        }
        if weekday > 6 {
            return Err(BikestatError::InvalidRecord(format!(
                "weekday must be between 0-6, got {weekday}"
            )));
        }
        if casual_count.checked_add(registered_count) != Some(total_count) {
            return Err(BikestatError::InvalidRecord(format!(
                "total count {total_count} does not equal casual {casual_count} + registered {registered_count}"
            )));
        }

        Ok(Self {
            date,
            year,
            month,
            hour,
            weekday,
            working_day,
            weather_category,
            casual_count,
            registered_count,
            total_count,
        })
    }

    /// Calendar year this record belongs to
    pub fn calendar_year(&self) -> i32 {
        BASE_YEAR + i32::from(self.year)
    }
}

/// Summed casual and registered rentals
///
/// # Examples
/// ```
/// use bikestat_core::types::UserTotals;
///
/// let totals = UserTotals::new(10, 40) + UserTotals::new(5, 5);
/// assert_eq!(totals.casual, 15);
/// assert_eq!(totals.total(), 60);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotals {
    /// Sum of casual rentals
    pub casual: u64,
    /// Sum of registered rentals
    pub registered: u64,
}

impl UserTotals {
    pub fn new(casual: u64, registered: u64) -> Self {
        Self { casual, registered }
    }

    /// Casual plus registered
    pub fn total(&self) -> u64 {
        self.casual + self.registered
    }

    /// Share of casual rentals in the total, `None` when the total is zero
    pub fn casual_share(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.casual as f64 / total as f64)
    }
}

impl Add for UserTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            casual: self.casual + other.casual,
            registered: self.registered + other.registered,
        }
    }
}

impl AddAssign for UserTotals {
    fn add_assign(&mut self, other: Self) {
        self.casual += other.casual;
        self.registered += other.registered;
    }
}

impl From<&RentalRecord> for UserTotals {
    fn from(record: &RentalRecord) -> Self {
        Self::new(record.casual_count, record.registered_count)
    }
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a weekday index (0 = Sunday), `None` when out of range
pub fn weekday_name(weekday: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(weekday)).copied()
}

/// Name of a month (1-12), `None` when out of range
pub fn month_name(month: u8) -> Option<&'static str> {
    usize::from(month)
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx))
        .copied()
}

/// Hour of day as `H:00`
pub fn hour_label(hour: u8) -> String {
    format!("{hour}:00")
}

/// Calendar year for an encoded year flag
pub fn year_label(year: u8) -> i32 {
    BASE_YEAR + i32::from(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, 6, 15).unwrap()
    }

    #[test]
    fn test_record_validation_accepts_valid_row() {
        let record = RentalRecord::new(date(), 1, 6, 17, 5, true, WeatherCategory::Clear, 80, 620, 700)
            .unwrap();
        assert_eq!(record.calendar_year(), 2012);
        assert_eq!(record.total_count, 700);
    }

    #[test]
    fn test_record_validation_rejects_out_of_range_fields() {
        let w = WeatherCategory::Clear;
        assert!(RentalRecord::new(date(), 2, 6, 17, 5, true, w, 1, 1, 2).is_err());
        assert!(RentalRecord::new(date(), 0, 0, 17, 5, true, w, 1, 1, 2).is_err());
        assert!(RentalRecord::new(date(), 0, 13, 17, 5, true, w, 1, 1, 2).is_err());
        assert!(RentalRecord::new(date(), 0, 6, 24, 5, true, w, 1, 1, 2).is_err());
        assert!(RentalRecord::new(date(), 0, 6, 17, 7, true, w, 1, 1, 2).is_err());
    }

    #[test]
    fn test_record_validation_rejects_count_mismatch() {
        let result =
            RentalRecord::new(date(), 0, 6, 17, 5, true, WeatherCategory::Mist, 10, 20, 31);
        assert!(matches!(result, Err(BikestatError::InvalidRecord(_))));
    }

    #[test]
    fn test_weather_category_codes() {
        for weather in WeatherCategory::ALL {
            assert_eq!(WeatherCategory::try_from(weather.code()).unwrap(), weather);
        }
        assert!(WeatherCategory::try_from(0).is_err());
        assert_eq!(
            serde_json::to_string(&WeatherCategory::LightPrecipitation).unwrap(),
            "3"
        );
    }

    #[test]
    fn test_user_totals_arithmetic() {
        let mut totals = UserTotals::default();
        totals += UserTotals::new(3, 7);
        totals += UserTotals::new(1, 9);
        assert_eq!(totals, UserTotals::new(4, 16));
        assert_eq!(totals.total(), 20);
        assert_eq!(totals.casual_share(), Some(0.2));
        assert_eq!(UserTotals::default().casual_share(), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(weekday_name(0), Some("Sunday"));
        assert_eq!(weekday_name(6), Some("Saturday"));
        assert_eq!(weekday_name(7), None);
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(hour_label(7), "7:00");
        assert_eq!(year_label(1), 2012);
    }
}
