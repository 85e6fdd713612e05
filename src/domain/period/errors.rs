//! Error types for comparison period resolution

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building or resolving reporting periods
///
/// An unrecognized comparison strategy is deliberately absent: it degrades
/// to [`super::ComparisonStrategy::Unknown`] instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Date {date} is outside the supported years {min}..={max}")]
    OutOfRange { date: NaiveDate, min: i32, max: i32 },

    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Invalid year-month key {0}: month must be between 1 and 12")]
    InvalidYearMonthKey(i32),
}
