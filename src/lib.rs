//! bikestat - Filter and aggregate hourly bike-sharing rental data
//!
//! This library provides functionality to:
//! - Load hourly rental records from a CSV export
//! - Filter them by year, month, working day, weather and date range
//! - Compute hourly, weekday and user-type means, peak/trough and totals
//! - Render reports as tables or JSON
//!
//! # Examples
//!
//! ```no_run
//! use bikestat::{
//!     aggregation::Aggregator,
//!     data_loader::DataLoader,
//!     filters::{FilterCriteria, WorkingDayFilter, apply_filters},
//! };
//!
//! #[tokio::main]
//! async fn main() -> bikestat::Result<()> {
//!     let loaded = DataLoader::new(None).await?.load_records().await?;
//!
//!     let criteria = FilterCriteria::new()
//!         .with_year(1)
//!         .with_working_day(WorkingDayFilter::Working);
//!     let records = apply_filters(&loaded.records, &criteria)?;
//!
//!     let summary = Aggregator::new().summarize(&records)?;
//!     println!("peak hour: {}", summary.peak_trough.peak_hour);
//!     Ok(())
//! }
//! ```

pub use bikestat_core::{aggregation_types, error, filters, types};

pub mod aggregation;
pub mod cli;
pub mod data_loader;
pub mod output;

// Re-export commonly used types
pub use error::{BikestatError, Result};
pub use filters::{DateRange, FilterCriteria, WorkingDayFilter};
pub use types::{RentalRecord, UserTotals, WeatherCategory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
