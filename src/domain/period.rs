//! Reporting periods and comparison period resolution
//!
//! This module owns the date arithmetic behind every period-over-period
//! figure on the dashboard: validated date ranges, month buckets, `YYYYMM`
//! keys and the comparison strategies offered to users.

pub mod date_range;
pub mod errors;
pub mod month;
pub mod resolver;
pub mod strategy;

pub use date_range::{parse_iso_date, DateRange, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
pub use errors::PeriodError;
pub use month::{to_year_month_key, MonthBucket, YearMonthKey};
pub use resolver::{monthly_comparison_offset, resolve_comparison_dates, resolve_comparison_range};
pub use strategy::ComparisonStrategy;
