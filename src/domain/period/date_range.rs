//! Inclusive reporting date ranges

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

use super::errors::PeriodError;
use super::month::{MonthBucket, YearMonthKey};

/// Earliest year a reporting range may touch
pub const MIN_SUPPORTED_YEAR: i32 = 1;
/// Latest year a reporting range may touch
pub const MAX_SUPPORTED_YEAR: i32 = 9999;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start, end]` date range with `start <= end`
///
/// Both bounds are restricted to years 1 through 9999, which keeps every
/// comparison shift (at most two years back) inside chrono's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        check_supported(start)?;
        check_supported(end)?;
        if end < start {
            return Err(PeriodError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` bounds as sent by the date picker
    pub fn parse_iso(start: &str, end: &str) -> Result<Self, PeriodError> {
        Self::try_new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    /// A range covering whole months from `first` through `last`
    pub fn from_months(first: MonthBucket, last: MonthBucket) -> Result<Self, PeriodError> {
        Self::try_new(first.first_day(), last.last_day())
    }

    /// Comparison ranges are ordered by construction and may reach one year
    /// below the supported minimum.
    pub(super) fn from_ordered(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "comparison range must be ordered");
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive count of calendar months touched by the range
    pub fn period_months(&self) -> u32 {
        let years = self.end.year() - self.start.year();
        let months = years * 12 + self.end.month() as i32 - self.start.month() as i32 + 1;
        months.unsigned_abs()
    }

    /// Months touched by the range, in order
    pub fn months(&self) -> Vec<MonthBucket> {
        MonthBucket::range_inclusive(
            MonthBucket::containing(self.start),
            MonthBucket::containing(self.end),
        )
    }

    /// `YYYYMM` keys bounding the range, as used by the metrics store
    pub fn key_bounds(&self) -> (YearMonthKey, YearMonthKey) {
        (
            YearMonthKey::from_date(self.start),
            YearMonthKey::from_date(self.end),
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the range, counting both bounds
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

pub fn parse_iso_date(input: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).map_err(|_| {
        PeriodError::InvalidDate {
            input: input.to_string(),
        }
    })
}

fn check_supported(date: NaiveDate) -> Result<(), PeriodError> {
    if (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&date.year()) {
        Ok(())
    } else {
        Err(PeriodError::OutOfRange {
            date,
            min: MIN_SUPPORTED_YEAR,
            max: MAX_SUPPORTED_YEAR,
        })
    }
}
