//! CLI interface for bikestat
//!
//! This module defines the command-line interface using clap. Filter flags are
//! global so they can be given before or after the report name, and the
//! report defaults to `summary` when omitted.
//!
//! # Example
//!
//! ```bash
//! # Mean rentals per hour on working days in 2012
//! bikestat hourly --year 2012 --working-day working
//!
//! # Summer months with clear or misty weather, as JSON
//! bikestat summary -m 6,7,8 -w 1,2 --json
//!
//! # Count distribution for January 2011
//! bikestat histogram --since 2011-01 --until 2011-01 --bins 20
//! ```

use crate::aggregation::{
    Aggregator, DEFAULT_HISTOGRAM_BINS, correlation_matrix, histogram, mean_by_hour,
    mean_by_weekday, mean_user_split_by_hour, peak_and_trough, totals,
};
use crate::error::{BikestatError, Result};
use crate::filters::{
    FilterCriteria, WorkingDayFilter, apply_filters, apply_filters_with_fallback,
    resolve_date_range,
};
use crate::output::OutputFormatter;
use crate::types::{BASE_YEAR, RentalRecord, WeatherCategory};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Filter and aggregate hourly bike-sharing rental data
#[derive(Parser, Debug, Clone)]
#[command(name = "bikestat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the hourly rental CSV
    #[arg(long, short = 'f', env = "BIKESTAT_DATA_PATH", global = true)]
    pub data: Option<PathBuf>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Report to produce (default: summary)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Working-day clause as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkingDayArg {
    /// Every day
    #[default]
    Any,
    /// Working days only
    Working,
    /// Weekends and holidays only
    Holiday,
}

impl From<WorkingDayArg> for WorkingDayFilter {
    fn from(arg: WorkingDayArg) -> Self {
        match arg {
            WorkingDayArg::Any => WorkingDayFilter::Any,
            WorkingDayArg::Working => WorkingDayFilter::Working,
            WorkingDayArg::Holiday => WorkingDayFilter::Holiday,
        }
    }
}

/// Filter flags shared by every report
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Year to keep: 0, 1, 2011 or 2012
    #[arg(long, short = 'y', global = true)]
    pub year: Option<String>,

    /// Months to keep (1-12, comma separated)
    #[arg(
        long = "month",
        short = 'm',
        value_delimiter = ',',
        value_parser = clap::value_parser!(u8).range(1..=12),
        global = true
    )]
    pub months: Vec<u8>,

    /// Working-day filter
    #[arg(long, value_enum, default_value = "any", global = true)]
    pub working_day: WorkingDayArg,

    /// Weather categories to keep (1-4, comma separated)
    #[arg(
        long = "weather",
        short = 'w',
        value_delimiter = ',',
        value_parser = clap::value_parser!(u8).range(1..=4),
        global = true
    )]
    pub weather: Vec<u8>,

    /// Filter by start date (YYYY-MM-DD or YYYY-MM)
    #[arg(long, global = true)]
    pub since: Option<String>,

    /// Filter by end date (YYYY-MM-DD or YYYY-MM)
    #[arg(long, global = true)]
    pub until: Option<String>,

    /// Fail when --since is after --until instead of showing all records
    #[arg(long, global = true)]
    pub strict_range: bool,
}

impl FilterArgs {
    /// Build filter criteria from the flags
    ///
    /// `records` supplies the data bounds for a one-sided date range.
    pub fn to_criteria(&self, records: &[RentalRecord]) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::new()
            .with_months(self.months.iter().copied())
            .with_working_day(self.working_day.into());

        if let Some(year) = &self.year {
            criteria = criteria.with_year(parse_year(year)?);
        }

        let weather = self
            .weather
            .iter()
            .map(|code| WeatherCategory::try_from(*code))
            .collect::<Result<Vec<_>>>()?;
        criteria = criteria.with_weather(weather);

        let since = self.since.as_deref().map(parse_date_filter).transpose()?;
        let until = self.until.as_deref().map(parse_until_filter).transpose()?;
        criteria.date_range = resolve_date_range(since, until, records);

        Ok(criteria)
    }

    /// Apply the criteria using the configured invalid-range policy
    pub fn select_records(
        &self,
        records: &[RentalRecord],
        criteria: &FilterCriteria,
    ) -> Result<Vec<RentalRecord>> {
        if self.strict_range {
            apply_filters(records, criteria)
        } else {
            Ok(apply_filters_with_fallback(records, criteria).records)
        }
    }
}

/// Arguments for the histogram report
#[derive(Args, Debug, Clone)]
pub struct HistogramArgs {
    /// Number of equal-width bins
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,
}

/// Available reports
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show every aggregate (default)
    Summary,
    /// Show mean rentals per hour of day
    Hourly,
    /// Show mean rentals per weekday
    Weekday,
    /// Show mean casual vs registered rentals per hour
    Users,
    /// Show the busiest and quietest hour
    Peak,
    /// Show total casual and registered rentals
    Totals,
    /// Show the distribution of hourly rental counts
    Histogram(HistogramArgs),
    /// Show correlations between numeric columns
    Correlation,
}

/// Run one report over the filtered records and format it
///
/// # Errors
///
/// Returns `EmptyInput` when `records` is empty; callers are expected to
/// check for that first and show a notice instead.
pub fn render_report(
    command: &Command,
    records: &[RentalRecord],
    formatter: &dyn OutputFormatter,
) -> Result<String> {
    let output = match command {
        Command::Summary => formatter.format_summary(&Aggregator::new().summarize(records)?),
        Command::Hourly => {
            let hourly = mean_by_hour(records)?;
            let peak = peak_and_trough(&hourly)?;
            formatter.format_hourly(&hourly, &peak)
        }
        Command::Weekday => formatter.format_weekday(&mean_by_weekday(records)?),
        Command::Users => formatter.format_user_split(&mean_user_split_by_hour(records)?),
        Command::Peak => formatter.format_peak(&peak_and_trough(&mean_by_hour(records)?)?),
        Command::Totals => formatter.format_totals(&totals(records)?, records.len()),
        Command::Histogram(args) => formatter.format_histogram(&histogram(records, args.bins)?),
        Command::Correlation => formatter.format_correlation(&correlation_matrix(records)?),
    };

    Ok(output)
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse a year selection
///
/// Accepts the encoded flag (`0`, `1`) or the calendar year it stands for.
///
/// # Example
///
/// ```
/// use bikestat::cli::parse_year;
///
/// assert_eq!(parse_year("1").unwrap(), 1);
/// assert_eq!(parse_year("2011").unwrap(), 0);
/// assert!(parse_year("2013").is_err());
/// ```
pub fn parse_year(year_str: &str) -> Result<u8> {
    let value = year_str
        .trim()
        .parse::<i32>()
        .map_err(|_| BikestatError::InvalidArgument(format!("Invalid year '{year_str}'")))?;

    match value {
        0 | 1 => Ok(value as u8),
        y if y == BASE_YEAR || y == BASE_YEAR + 1 => Ok((y - BASE_YEAR) as u8),
        _ => Err(BikestatError::InvalidArgument(format!(
            "Year must be 0, 1, {} or {}, got {value}",
            BASE_YEAR,
            BASE_YEAR + 1
        ))),
    }
}

/// Parse date filter from string
///
/// Accepts dates in YYYY-MM-DD or YYYY-MM format.
/// For YYYY-MM format, defaults to the first day of the month.
///
/// # Example
///
/// ```
/// use bikestat::cli::parse_date_filter;
/// use chrono::Datelike;
///
/// let date = parse_date_filter("2011-01-15").unwrap();
/// assert_eq!(date.day(), 15);
///
/// let date = parse_date_filter("2011-01").unwrap();
/// assert_eq!(date.day(), 1);
/// ```
pub fn parse_date_filter(date_str: &str) -> Result<NaiveDate> {
    // Try YYYY-MM-DD format first
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    // Try YYYY-MM format (convert to first day of month)
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() == 2 {
        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| BikestatError::InvalidDate(format!("Invalid year in '{date_str}'")))?;
        let month = parts[1]
            .parse::<u32>()
            .map_err(|_| BikestatError::InvalidDate(format!("Invalid month in '{date_str}'")))?;

        if !(1..=12).contains(&month) {
            return Err(BikestatError::InvalidDate(format!(
                "Month must be between 1-12, got {month}"
            )));
        }

        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| BikestatError::InvalidDate(format!("Invalid date: {date_str}")))
    } else {
        Err(BikestatError::InvalidDate(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD or YYYY-MM"
        )))
    }
}

/// Parse an end-of-range date filter
///
/// Same formats as [`parse_date_filter`], but YYYY-MM resolves to the last
/// day of the month so `--until 2011-02` covers all of February.
pub fn parse_until_filter(date_str: &str) -> Result<NaiveDate> {
    if NaiveDate::parse_from_str(date_str, "%Y-%m-%d").is_ok() {
        return parse_date_filter(date_str);
    }

    let first = parse_date_filter(date_str)?;
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| BikestatError::InvalidDate(format!("Invalid date: {date_str}")))
}
