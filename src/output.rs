//! Output formatting module for bikestat
//!
//! This module provides formatters for displaying aggregate tables in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use bikestat::output::get_formatter;
//! use bikestat::aggregation_types::{HourlyMean, PeakTrough};
//!
//! let hourly = vec![
//!     HourlyMean { hour: 8, mean_count: 359.0 },
//!     HourlyMean { hour: 17, mean_count: 461.5 },
//! ];
//! let peak = PeakTrough { peak_hour: 17, peak_value: 461.5, trough_hour: 8, trough_value: 359.0 };
//!
//! // Table formatter without colour
//! let formatter = get_formatter(false, false);
//! assert!(formatter.format_hourly(&hourly, &peak).contains("17:00"));
//!
//! // JSON formatter
//! let formatter = get_formatter(true, false);
//! assert!(formatter.format_hourly(&hourly, &peak).contains("\"hourly_means\""));
//! ```

use crate::aggregation_types::{
    AggregateResult, CorrelationMatrix, Histogram, HourlyMean, HourlyUserSplit, PeakTrough,
    WeekdayMean,
};
use crate::filters::{FilterCriteria, WorkingDayFilter};
use crate::types::{UserTotals, hour_label, month_name, weekday_name, year_label};
use colored::Colorize;
use prettytable::{Cell, Row, Table, format, row};
use serde_json::{Value, json};

/// Width of the inline bar column in tables
const BAR_WIDTH: usize = 30;

/// Trait for output formatters
///
/// Each method renders one aggregate table. Implementations decide the
/// presentation; none of them compute anything.
pub trait OutputFormatter {
    /// Format the full summary of a filtered record set
    fn format_summary(&self, result: &AggregateResult) -> String;

    /// Format mean count per hour, highlighting the peak hour
    fn format_hourly(&self, data: &[HourlyMean], peak: &PeakTrough) -> String;

    /// Format mean count per weekday
    fn format_weekday(&self, data: &[WeekdayMean]) -> String;

    /// Format mean casual and registered counts per hour
    fn format_user_split(&self, data: &[HourlyUserSplit]) -> String;

    /// Format the peak and trough hour
    fn format_peak(&self, peak: &PeakTrough) -> String;

    /// Format casual and registered totals
    fn format_totals(&self, totals: &UserTotals, record_count: usize) -> String;

    /// Format the count distribution
    fn format_histogram(&self, histogram: &Histogram) -> String;

    /// Format the correlation matrix
    fn format_correlation(&self, matrix: &CorrelationMatrix) -> String;

    /// Notice shown instead of any table when no record matched
    fn format_no_data(&self, criteria: &FilterCriteria) -> String;
}

/// Describe active filter clauses in one line
pub fn describe_criteria(criteria: &FilterCriteria) -> String {
    if criteria.is_unrestricted() {
        return "no filters".to_string();
    }

    let mut parts = Vec::new();
    if let Some(year) = criteria.year {
        parts.push(format!("year {}", year_label(year)));
    }
    if !criteria.months.is_empty() {
        let months: Vec<&str> = criteria
            .months
            .iter()
            .filter_map(|m| month_name(*m))
            .collect();
        parts.push(format!("months {}", months.join(", ")));
    }
    match criteria.working_day {
        WorkingDayFilter::Any => {}
        WorkingDayFilter::Working => parts.push("working days".to_string()),
        WorkingDayFilter::Holiday => parts.push("holidays and weekends".to_string()),
    }
    if !criteria.weather_categories.is_empty() {
        let weather: Vec<&str> = criteria
            .weather_categories
            .iter()
            .map(|w| w.label())
            .collect();
        parts.push(format!("weather {}", weather.join(", ")));
    }
    if let Some(range) = &criteria.date_range {
        parts.push(format!("{} to {}", range.start, range.end));
    }

    parts.join("; ")
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables with an inline bar column for the chart-like
/// tables. Counts are printed with thousands separators.
pub struct TableFormatter {
    /// Whether to highlight the peak with terminal colours
    pub color: bool,
}

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    fn format_mean(value: f64) -> String {
        format!("{value:.1}")
    }

    /// Horizontal bar proportional to `value / max`
    fn bar(value: f64, max: f64) -> String {
        if max <= 0.0 || value <= 0.0 {
            return String::new();
        }
        let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
        "█".repeat(len.clamp(1, BAR_WIDTH))
    }

    fn highlight(&self, text: String) -> String {
        if self.color {
            text.as_str().bold().blue().to_string()
        } else {
            text
        }
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table
    }
}

impl OutputFormatter for TableFormatter {
    fn format_summary(&self, result: &AggregateResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Records: {}\n\n",
            Self::format_number(result.record_count as u64)
        ));
        output.push_str("Mean rentals per hour\n");
        output.push_str(&self.format_hourly(&result.hourly_means, &result.peak_trough));
        output.push_str("\nMean rentals per weekday\n");
        output.push_str(&self.format_weekday(&result.weekday_means));
        output.push_str("\nCasual vs registered per hour\n");
        output.push_str(&self.format_user_split(&result.hourly_user_split));
        output.push('\n');
        output.push_str(&self.format_peak(&result.peak_trough));
        output.push('\n');
        output.push_str(&self.format_totals(&result.user_totals, result.record_count));

        output
    }

    fn format_hourly(&self, data: &[HourlyMean], peak: &PeakTrough) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Hour", b -> "Mean Rentals", b -> ""]);

        let max = data.iter().map(|d| d.mean_count).fold(0.0, f64::max);
        for entry in data {
            let label = hour_label(entry.hour);
            let mean = Self::format_mean(entry.mean_count);
            let bar = Self::bar(entry.mean_count, max);

            if entry.hour == peak.peak_hour {
                table.add_row(Row::new(vec![
                    Cell::new(&self.highlight(label)),
                    Cell::new(&self.highlight(mean)).style_spec("r"),
                    Cell::new(&self.highlight(bar)),
                ]));
            } else {
                table.add_row(row![label, r -> mean, bar]);
            }
        }

        table.to_string()
    }

    fn format_weekday(&self, data: &[WeekdayMean]) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Weekday", b -> "Mean Rentals", b -> ""]);

        let max = data.iter().map(|d| d.mean_count).fold(0.0, f64::max);
        for entry in data {
            table.add_row(row![
                weekday_name(entry.weekday).unwrap_or("?"),
                r -> Self::format_mean(entry.mean_count),
                Self::bar(entry.mean_count, max)
            ]);
        }

        table.to_string()
    }

    fn format_user_split(&self, data: &[HourlyUserSplit]) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Hour", b -> "Casual", b -> "Registered", b -> "Casual Share"]);

        for entry in data {
            let total = entry.mean_casual + entry.mean_registered;
            let share = if total > 0.0 {
                format!("{:.1}%", entry.mean_casual / total * 100.0)
            } else {
                "-".to_string()
            };
            table.add_row(row![
                hour_label(entry.hour),
                r -> Self::format_mean(entry.mean_casual),
                r -> Self::format_mean(entry.mean_registered),
                r -> share
            ]);
        }

        table.to_string()
    }

    fn format_peak(&self, peak: &PeakTrough) -> String {
        format!(
            "Peak hour:   {} ({} mean rentals)\nTrough hour: {} ({} mean rentals)\n",
            self.highlight(hour_label(peak.peak_hour)),
            Self::format_mean(peak.peak_value),
            hour_label(peak.trough_hour),
            Self::format_mean(peak.trough_value)
        )
    }

    fn format_totals(&self, totals: &UserTotals, record_count: usize) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Users", b -> "Rentals", b -> "Share"]);

        let share = |part: u64| match totals.total() {
            0 => "-".to_string(),
            total => format!("{:.1}%", part as f64 / total as f64 * 100.0),
        };

        table.add_row(row![
            "Casual",
            r -> Self::format_number(totals.casual),
            r -> share(totals.casual)
        ]);
        table.add_row(row![
            "Registered",
            r -> Self::format_number(totals.registered),
            r -> share(totals.registered)
        ]);
        table.add_row(Row::new(vec![Cell::new(""); 3]));
        table.add_row(row![
            b -> "TOTAL",
            b -> Self::format_number(totals.total()),
            b -> format!("{} records", Self::format_number(record_count as u64))
        ]);

        table.to_string()
    }

    fn format_histogram(&self, histogram: &Histogram) -> String {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Rentals per Hour", b -> "Frequency", b -> ""]);

        let max = histogram.max_count() as f64;
        for bin in &histogram.bins {
            table.add_row(row![
                format!("{:.0} - {:.0}", bin.lower, bin.upper),
                r -> Self::format_number(bin.count),
                Self::bar(bin.count as f64, max)
            ]);
        }

        table.to_string()
    }

    fn format_correlation(&self, matrix: &CorrelationMatrix) -> String {
        let mut table = Self::new_table();

        let mut titles = vec![Cell::new("")];
        titles.extend(matrix.columns.iter().map(|c| Cell::new(c).style_spec("b")));
        table.set_titles(Row::new(titles));

        for (name, values) in matrix.columns.iter().zip(&matrix.values) {
            let mut cells = vec![Cell::new(name).style_spec("b")];
            cells.extend(values.iter().map(|value| {
                let text = value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
                Cell::new(&text).style_spec("r")
            }));
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }

    fn format_no_data(&self, criteria: &FilterCriteria) -> String {
        let message = format!(
            "No records match the selected filters ({})",
            describe_criteria(criteria)
        );
        if self.color {
            message.as_str().yellow().to_string()
        } else {
            message
        }
    }
}

/// JSON formatter for machine-readable output
///
/// Emits the aggregate structures as pretty-printed JSON. Means are kept
/// at full precision.
pub struct JsonFormatter;

impl JsonFormatter {
    fn to_pretty(value: &Value) -> String {
        format!("{value:#}")
    }

    fn peak_json(peak: &PeakTrough) -> Value {
        json!({
            "peak_hour": peak.peak_hour,
            "peak_value": peak.peak_value,
            "trough_hour": peak.trough_hour,
            "trough_value": peak.trough_value,
        })
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, result: &AggregateResult) -> String {
        let output = json!({
            "record_count": result.record_count,
            "hourly_means": result.hourly_means,
            "weekday_means": result.weekday_means,
            "hourly_user_split": result.hourly_user_split,
            "peak": Self::peak_json(&result.peak_trough),
            "user_totals": {
                "casual": result.user_totals.casual,
                "registered": result.user_totals.registered,
                "total": result.user_totals.total(),
            },
        });

        Self::to_pretty(&output)
    }

    fn format_hourly(&self, data: &[HourlyMean], peak: &PeakTrough) -> String {
        let output = json!({
            "hourly_means": data,
            "peak_hour": peak.peak_hour,
        });

        Self::to_pretty(&output)
    }

    fn format_weekday(&self, data: &[WeekdayMean]) -> String {
        let output = json!({
            "weekday_means": data.iter().map(|d| json!({
                "weekday": d.weekday,
                "name": weekday_name(d.weekday),
                "mean_count": d.mean_count,
            })).collect::<Vec<_>>(),
        });

        Self::to_pretty(&output)
    }

    fn format_user_split(&self, data: &[HourlyUserSplit]) -> String {
        Self::to_pretty(&json!({ "hourly_user_split": data }))
    }

    fn format_peak(&self, peak: &PeakTrough) -> String {
        Self::to_pretty(&Self::peak_json(peak))
    }

    fn format_totals(&self, totals: &UserTotals, record_count: usize) -> String {
        let output = json!({
            "record_count": record_count,
            "casual": totals.casual,
            "registered": totals.registered,
            "total": totals.total(),
        });

        Self::to_pretty(&output)
    }

    fn format_histogram(&self, histogram: &Histogram) -> String {
        let output = json!({
            "bins": histogram.bins,
            "total": histogram.total(),
        });

        Self::to_pretty(&output)
    }

    fn format_correlation(&self, matrix: &CorrelationMatrix) -> String {
        Self::to_pretty(&json!({
            "columns": matrix.columns,
            "values": matrix.values,
        }))
    }

    fn format_no_data(&self, criteria: &FilterCriteria) -> String {
        let output = json!({
            "record_count": 0,
            "filters": criteria,
            "message": "No records match the selected filters",
        });

        Self::to_pretty(&output)
    }
}

/// Create a formatter for the requested output mode
pub fn get_formatter(json: bool, color: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new(color))
    }
}
