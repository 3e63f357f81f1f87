//! Error types for bikestat
//!
//! This module defines the error types used throughout the bikestat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use bikestat_core::error::{BikestatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to BikestatError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bikestat operations
///
/// Covers loading failures, invalid filter requests and aggregation over
/// an empty record set.
#[derive(Error, Debug)]
pub enum BikestatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No rental data file could be located
    #[error("No rental data file found (use --data or BIKESTAT_DATA_PATH)")]
    NoDataFile,

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Date range whose start lies after its end
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },

    /// Aggregation requested over zero records
    #[error("No records to aggregate for {0}")]
    EmptyInput(&'static str),

    /// A rental record failed validation
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Parse error with file context
    #[error("Parse error in {file}: {error}")]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in bikestat
///
/// # Example
///
/// ```
/// use bikestat_core::Result;
///
/// fn process_data() -> Result<usize> {
///     Ok(24)
/// }
/// ```
pub type Result<T> = std::result::Result<T, BikestatError>;
