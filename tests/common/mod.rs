//! Common test utilities and helpers for bikestat tests
//!
//! This module provides a record builder, a small synthetic dataset and a
//! helper that writes records out as a CSV fixture.

#![allow(dead_code)]

use bikestat::types::{RentalRecord, WeatherCategory};
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::fs;

// Global mutex to serialize environment variable modifications in tests
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Header written by [`write_csv`], matching the published dataset
pub const CSV_HEADER: &str =
    "instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";

/// Builder for creating test RentalRecord instances
pub struct RecordBuilder {
    date: NaiveDate,
    hour: u8,
    working_day: bool,
    weather: WeatherCategory,
    casual: u64,
    registered: u64,
}

impl RecordBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(2011, 1, 3).unwrap(),
            hour: 8,
            working_day: true,
            weather: WeatherCategory::Clear,
            casual: 10,
            registered: 90,
        }
    }

    /// Set the date; year, month and weekday are derived from it
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_hour(mut self, hour: u8) -> Self {
        self.hour = hour;
        self
    }

    pub fn with_working_day(mut self, working_day: bool) -> Self {
        self.working_day = working_day;
        self
    }

    pub fn with_weather(mut self, weather: WeatherCategory) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_counts(mut self, casual: u64, registered: u64) -> Self {
        self.casual = casual;
        self.registered = registered;
        self
    }

    /// Build the RentalRecord
    pub fn build(self) -> RentalRecord {
        RentalRecord::new(
            self.date,
            (self.date.year() - 2011) as u8,
            self.date.month() as u8,
            self.hour,
            self.date.weekday().num_days_from_sunday() as u8,
            self.working_day,
            self.weather,
            self.casual,
            self.registered,
            self.casual + self.registered,
        )
        .expect("builder produced an invalid record")
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a deterministic dataset spanning both years
///
/// One record per hour for every `stride`-th day from 2011-01-01 onwards.
/// Weekends are non-working days; weather cycles through all categories.
pub fn generate_dataset(days: usize, stride: i64) -> Vec<RentalRecord> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
    let mut records = Vec::with_capacity(days * 24);

    for day in 0..days {
        let date = start + Duration::days(day as i64 * stride);
        if date.year() > 2012 {
            break;
        }
        let weekday = date.weekday().num_days_from_sunday();
        let working_day = !(weekday == 0 || weekday == 6);

        for hour in 0..24u8 {
            let weather =
                WeatherCategory::ALL[(day + hour as usize) % WeatherCategory::ALL.len()];
            let rush = matches!(hour, 8 | 17 | 18);
            let casual = (hour as u64 % 7) * 3 + if working_day { 2 } else { 15 };
            let registered = hour as u64 * 4 + if rush { 200 } else { 20 };

            records.push(
                RecordBuilder::new()
                    .with_date(date)
                    .with_hour(hour)
                    .with_working_day(working_day)
                    .with_weather(weather)
                    .with_counts(casual, registered)
                    .build(),
            );
        }
    }

    records
}

/// Render records as CSV rows in the published column layout
pub fn to_csv(records: &[RentalRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for (i, r) in records.iter().enumerate() {
        out.push_str(&format!(
            "{},{},1,{},{},{},0,{},{},{},0.24,0.2879,0.81,0.0,{},{},{}\n",
            i + 1,
            r.date.format("%Y-%m-%d"),
            r.year,
            r.month,
            r.hour,
            r.weekday,
            u8::from(r.working_day),
            r.weather_category.code(),
            r.casual_count,
            r.registered_count,
            r.total_count,
        ));
    }

    out
}

/// Test fixture holding a temporary CSV file
pub struct CsvFixture {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

/// Write records to `hour.csv` inside a fresh temporary directory
pub async fn write_csv(records: &[RentalRecord]) -> CsvFixture {
    write_raw_csv(&to_csv(records)).await
}

/// Write arbitrary CSV text to `hour.csv` inside a fresh temporary directory
pub async fn write_raw_csv(contents: &str) -> CsvFixture {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hour.csv");
    fs::write(&path, contents).await.unwrap();
    CsvFixture { temp_dir, path }
}
