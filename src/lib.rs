//! Care Metrics - period-over-period healthcare cost analytics
//!
//! Resolves comparison periods for a selected date range and computes
//! PMPM, utilization per thousand per year and cost-per-encounter KPIs from
//! claims and member-month fact tables.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{Application, DashboardReport, DashboardService};
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{resolve_comparison_dates, ComparisonStrategy};
    use chrono::NaiveDate;

    #[test]
    fn test_public_api_resolves_periods() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let result: Result<_> = resolve_comparison_dates(start, end, ComparisonStrategy::PreviousQuarter)
            .map_err(Error::from);

        let range = result.unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }
}
