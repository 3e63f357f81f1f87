//! Shared test utilities for unit tests
//!
//! Integration tests in the `bikestat` crate cannot reach this module because
//! it is compiled only under `#[cfg(test)]`; they keep their own builder in
//! `tests/common/mod.rs`.

use crate::types::{RentalRecord, WeatherCategory};
use chrono::NaiveDate;

/// Builder for test rental records with sensible defaults
pub struct RecordBuilder {
    date: NaiveDate,
    year: u8,
    month: u8,
    hour: u8,
    weekday: u8,
    working_day: bool,
    weather: WeatherCategory,
    casual: u64,
    registered: u64,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(2011, 1, 3).unwrap(),
            year: 0,
            month: 1,
            hour: 8,
            weekday: 1,
            working_day: true,
            weather: WeatherCategory::Clear,
            casual: 10,
            registered: 90,
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn year(mut self, year: u8) -> Self {
        self.year = year;
        self
    }

    pub fn month(mut self, month: u8) -> Self {
        self.month = month;
        self
    }

    #[allow(dead_code)]
    pub fn hour(mut self, hour: u8) -> Self {
        self.hour = hour;
        self
    }

    #[allow(dead_code)]
    pub fn weekday(mut self, weekday: u8) -> Self {
        self.weekday = weekday;
        self
    }

    pub fn working_day(mut self, working_day: bool) -> Self {
        self.working_day = working_day;
        self
    }

    pub fn weather(mut self, weather: WeatherCategory) -> Self {
        self.weather = weather;
        self
    }

    #[allow(dead_code)]
    pub fn counts(mut self, casual: u64, registered: u64) -> Self {
        self.casual = casual;
        self.registered = registered;
        self
    }

    pub fn build(self) -> RentalRecord {
        RentalRecord::new(
            self.date,
            self.year,
            self.month,
            self.hour,
            self.weekday,
            self.working_day,
            self.weather,
            self.casual,
            self.registered,
            self.casual + self.registered,
        )
        .expect("test record should be valid")
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
