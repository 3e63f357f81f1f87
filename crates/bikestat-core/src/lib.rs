//! Core types, errors, and the filter stage for bikestat
//!
//! This crate provides the foundational record types, the error type,
//! the aggregate result types and the filter stage used by the
//! `bikestat` binary crate.

pub mod aggregation_types;
pub mod error;
pub mod filters;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{BikestatError, Result};
pub use filters::{DateRange, FilterCriteria, WorkingDayFilter};
pub use types::{RentalRecord, WeatherCategory};
