//! Data loader module for locating and parsing the rental CSV
//!
//! This module finds the hourly rental dataset on disk and turns its rows into
//! validated [`RentalRecord`]s. Rows that fail to parse or violate a record
//! invariant are logged and skipped, so everything handed to the filter stage
//! is well-formed.
//!
//! # Data file discovery
//!
//! In order of precedence:
//! - an explicit path (`--data`)
//! - the `BIKESTAT_DATA_PATH` environment variable
//! - `./all_data.csv`, `./hour.csv`, `./data/hour.csv`
//! - `<platform data dir>/bikestat/hour.csv`
//!
//! # Examples
//!
//! ```no_run
//! use bikestat::data_loader::DataLoader;
//!
//! # async fn example() -> bikestat::Result<()> {
//! let loader = DataLoader::new(None).await?;
//! let loaded = loader.load_records().await?;
//! println!(
//!     "Loaded {} records ({} skipped)",
//!     loaded.summary.loaded, loaded.summary.skipped
//! );
//! # Ok(())
//! # }
//! ```

use crate::error::{BikestatError, Result};
use crate::types::{RentalRecord, WeatherCategory};
use chrono::{NaiveDate, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding data file discovery
pub const DATA_PATH_ENV: &str = "BIKESTAT_DATA_PATH";

/// Columns the CSV header must provide, each with an accepted alias
const REQUIRED_COLUMNS: [(&str, &str); 10] = [
    ("dteday", "date"),
    ("yr", "year"),
    ("mnth", "month"),
    ("hr", "hour"),
    ("weekday", "weekday"),
    ("workingday", "working_day"),
    ("weathersit", "weather"),
    ("casual", "casual"),
    ("registered", "registered"),
    ("cnt", "total"),
];

/// One CSV row as written by the dataset publisher
#[derive(Debug, Deserialize)]
struct RawRentalRow {
    #[serde(alias = "date")]
    dteday: String,
    #[serde(alias = "year")]
    yr: u8,
    #[serde(alias = "month")]
    mnth: u8,
    #[serde(alias = "hour")]
    hr: u8,
    weekday: u8,
    #[serde(alias = "working_day")]
    workingday: u8,
    #[serde(alias = "weather")]
    weathersit: u8,
    casual: u64,
    registered: u64,
    #[serde(alias = "total")]
    cnt: u64,
}

impl TryFrom<RawRentalRow> for RentalRecord {
    type Error = BikestatError;

    fn try_from(row: RawRentalRow) -> Result<Self> {
        let date = parse_record_date(&row.dteday)?;
        let working_day = match row.workingday {
            0 => false,
            1 => true,
            other => {
                return Err(BikestatError::InvalidRecord(format!(
                    "workingday must be 0 or 1, got {other}"
                )));
            }
        };

        RentalRecord::new(
            date,
            row.yr,
            row.mnth,
            row.hr,
            row.weekday,
            working_day,
            WeatherCategory::try_from(row.weathersit)?,
            row.casual,
            row.registered,
            row.cnt,
        )
    }
}

/// Parse the date column
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time of day.
pub fn parse_record_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    Err(BikestatError::InvalidDate(format!(
        "'{value}', expected YYYY-MM-DD"
    )))
}

/// Counts of accepted and rejected rows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows turned into records
    pub loaded: usize,
    /// Rows skipped because they were malformed
    pub skipped: usize,
}

/// Records read from a data file
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub records: Vec<RentalRecord>,
    pub summary: LoadSummary,
}

/// Data loader for the hourly rental CSV
pub struct DataLoader {
    /// Resolved data file
    path: PathBuf,
    /// Whether to show a progress spinner while parsing
    show_progress: bool,
}

impl DataLoader {
    /// Create a new DataLoader, resolving the data file
    ///
    /// # Errors
    ///
    /// Returns `Config` when an explicit path does not exist and `NoDataFile`
    /// when discovery finds nothing.
    pub async fn new(explicit: Option<PathBuf>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !tokio::fs::try_exists(&path).await? {
                    return Err(BikestatError::Config(format!(
                        "data file {} does not exist",
                        path.display()
                    )));
                }
                path
            }
            None => Self::discover_data_file().await?,
        };

        debug!("Using rental data file {}", path.display());
        Ok(Self::from_path(path))
    }

    /// Create a loader for a known path without checking it
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            show_progress: false,
        }
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The resolved data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Candidate locations searched when no path is given
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(custom_path) = std::env::var(DATA_PATH_ENV) {
            candidates.push(PathBuf::from(custom_path));
        }

        candidates.push(PathBuf::from("all_data.csv"));
        candidates.push(PathBuf::from("hour.csv"));
        candidates.push(PathBuf::from("data").join("hour.csv"));

        if let Some(data_dir) = dirs::data_dir() {
            candidates.push(data_dir.join("bikestat").join("hour.csv"));
        }

        candidates
    }

    /// Find the first existing candidate data file
    async fn discover_data_file() -> Result<PathBuf> {
        for candidate in Self::candidate_paths() {
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                return Ok(candidate);
            }
            debug!("No data file at {}", candidate.display());
        }
        Err(BikestatError::NoDataFile)
    }

    /// Read and parse the data file
    ///
    /// The whole file is read up front; the dataset is small enough that
    /// streaming buys nothing.
    pub async fn load_records(&self) -> Result<LoadedData> {
        let bytes = tokio::fs::read(&self.path).await?;

        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.set_message("Loading rental records");
            Some(pb)
        } else {
            None
        };

        let loaded = Self::parse_records(bytes.as_slice(), &self.path, progress.as_ref());

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let loaded = loaded?;
        info!(
            "Loaded {} records from {} ({} skipped)",
            loaded.summary.loaded,
            self.path.display(),
            loaded.summary.skipped
        );
        Ok(loaded)
    }

    /// Parse rental records from any CSV reader
    ///
    /// `source` is only used for error messages and logging.
    pub fn parse_records<R: std::io::Read>(
        reader: R,
        source: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<LoadedData> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|(name, alias)| !headers.iter().any(|h| h == *name || h == *alias))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(BikestatError::Parse {
                file: source.to_path_buf(),
                error: format!("missing columns: {}", missing.join(", ")),
            });
        }

        let mut records = Vec::new();
        let mut summary = LoadSummary::default();

        for result in csv_reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping unreadable row in {}: {}", source.display(), e);
                    summary.skipped += 1;
                    continue;
                }
            };
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            let record = row
                .deserialize::<RawRentalRow>(Some(&headers))
                .map_err(BikestatError::from)
                .and_then(RentalRecord::try_from);

            match record {
                Ok(record) => {
                    records.push(record);
                    summary.loaded += 1;
                    if let Some(pb) = progress {
                        if summary.loaded % 1000 == 0 {
                            pb.set_message(format!("Loading rental records ({})", summary.loaded));
                            pb.tick();
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {}: {}",
                        line,
                        source.display(),
                        e
                    );
                    summary.skipped += 1;
                }
            }
        }

        Ok(LoadedData { records, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    const HEADER: &str =
        "instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,casual,registered,cnt";

    #[tokio::test]
    async fn test_csv_parsing() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("hour.csv");

        let mut file = tokio::fs::File::create(&csv_path).await.unwrap();
        file.write_all(format!("{HEADER}\n").as_bytes()).await.unwrap();
        file.write_all(b"1,2011-01-01,1,0,1,0,0,6,0,1,0.24,3,13,16\n")
            .await
            .unwrap();
        file.write_all(b"2,2011-01-01,1,0,1,1,0,6,0,2,0.22,8,32,40\n")
            .await
            .unwrap();
        file.flush().await.unwrap();

        let loaded = DataLoader::new(Some(csv_path)).await.unwrap().load_records().await.unwrap();
        assert_eq!(loaded.summary, LoadSummary { loaded: 2, skipped: 0 });

        let first = &loaded.records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(first.weekday, 6);
        assert!(!first.working_day);
        assert_eq!(first.total_count, 16);
        assert_eq!(loaded.records[1].hour, 1);
        assert_eq!(loaded.records[1].weather_category, WeatherCategory::Mist);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let data = format!(
            "{HEADER}\n\
             1,2011-01-01,1,0,1,0,0,6,0,1,0.24,3,13,16\n\
             2,not-a-date,1,0,1,1,0,6,0,1,0.22,8,32,40\n\
             3,2011-01-01,1,0,1,2,0,6,0,5,0.22,5,27,32\n\
             4,2011-01-01,1,0,1,3,0,6,0,1,0.24,3,10,99\n\
             5,2011-01-01,1,0,1,4,0,6,0,1,0.24,0,1,1\n"
        );

        let loaded =
            DataLoader::parse_records(data.as_bytes(), Path::new("hour.csv"), None).unwrap();
        assert_eq!(loaded.summary, LoadSummary { loaded: 2, skipped: 3 });
        assert_eq!(loaded.records[1].hour, 4);
    }

    #[test]
    fn test_missing_columns_is_an_error() {
        let data = "dteday,yr,mnth,hr\n2011-01-01,0,1,0\n";
        let err =
            DataLoader::parse_records(data.as_bytes(), Path::new("bad.csv"), None).unwrap_err();
        match err {
            BikestatError::Parse { error, .. } => {
                assert!(error.contains("weekday"));
                assert!(error.contains("cnt"));
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_alias_columns() {
        let data = "date,year,month,hour,weekday,working_day,weather,casual,registered,total\n\
                    2012-07-04 00:00:00,1,7,17,3,0,1,300,400,700\n";
        let loaded =
            DataLoader::parse_records(data.as_bytes(), Path::new("alias.csv"), None).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].date, NaiveDate::from_ymd_opt(2012, 7, 4).unwrap());
    }

    #[tokio::test]
    async fn test_explicit_missing_path_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = DataLoader::new(Some(temp_dir.path().join("nope.csv"))).await;
        assert!(matches!(result, Err(BikestatError::Config(_))));
    }

    #[test]
    fn test_parse_record_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2011, 3, 14).unwrap();
        assert_eq!(parse_record_date("2011-03-14").unwrap(), expected);
        assert_eq!(parse_record_date("2011-03-14 00:00:00").unwrap(), expected);
        assert_eq!(parse_record_date("2011-03-14T00:00:00").unwrap(), expected);
        assert!(parse_record_date("14/03/2011").is_err());
    }
}
