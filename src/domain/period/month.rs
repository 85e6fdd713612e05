//! Calendar month buckets and `YYYYMM` keys
//!
//! A [`MonthBucket`] is the atomic unit of trend calculations. A
//! [`YearMonthKey`] is the integer encoding used to filter fact rows.

use chrono::{Datelike, Days, Months, NaiveDate};
use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::PeriodError;

/// Multiplier separating year and month in a [`YearMonthKey`]
pub const YEAR_MONTH_FACTOR: i32 = 100;

const MONTHS_PER_YEAR: u32 = 12;
const MONTHS_PER_QUARTER: u32 = 3;

/// Integer month key: `year * 100 + month`
///
/// Decomposition uses Euclidean division so the encoding stays lossless for
/// every date chrono can represent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, Into,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct YearMonthKey(i32);

impl YearMonthKey {
    /// Key of the month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.year() * YEAR_MONTH_FACTOR + date.month() as i32)
    }

    /// Validate a raw integer key read from a fact table
    pub fn try_new(raw: i32) -> Result<Self, PeriodError> {
        let month = raw.rem_euclid(YEAR_MONTH_FACTOR);
        if (1..=MONTHS_PER_YEAR as i32).contains(&month) {
            Ok(Self(raw))
        } else {
            Err(PeriodError::InvalidYearMonthKey(raw))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.div_euclid(YEAR_MONTH_FACTOR)
    }

    /// Month number, always in `1..=12`
    pub fn month(&self) -> u32 {
        self.0.rem_euclid(YEAR_MONTH_FACTOR) as u32
    }

    /// The bucket this key identifies, if the year is representable
    pub fn to_month_bucket(&self) -> Option<MonthBucket> {
        MonthBucket::from_year_month(self.year(), self.month())
    }
}

impl TryFrom<i32> for YearMonthKey {
    type Error = PeriodError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::try_new(raw)
    }
}

/// `YYYYMM` key of the month containing `date`
pub fn to_year_month_key(date: NaiveDate) -> YearMonthKey {
    YearMonthKey::from_date(date)
}

/// A calendar month, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthBucket(NaiveDate);

impl MonthBucket {
    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self(first_of_month(date))
    }

    pub fn from_year_month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        // Only chrono's final month has no successor, and it ends on MAX.
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn key(&self) -> YearMonthKey {
        YearMonthKey::from_date(self.0)
    }

    /// Calendar quarter, 1 through 4
    pub fn quarter(&self) -> u32 {
        self.0.month0() / MONTHS_PER_QUARTER + 1
    }

    /// Shift by a signed number of months; `None` past chrono's calendar
    pub fn shift(&self, months: i32) -> Option<Self> {
        let magnitude = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(magnitude)
        } else {
            self.0.checked_sub_months(magnitude)
        };
        shifted.map(Self)
    }

    /// First month of the calendar quarter containing this month
    pub fn quarter_start(&self) -> Self {
        Self(self.0 - Months::new(self.0.month0() % MONTHS_PER_QUARTER))
    }

    /// January of this month's year
    pub fn year_start(&self) -> Self {
        Self(self.0 - Months::new(self.0.month0()))
    }

    /// Every month from `start` through `end`, inclusive; empty if `end < start`
    pub fn range_inclusive(start: Self, end: Self) -> Vec<Self> {
        let mut months = Vec::new();
        let mut current = start;
        while current <= end {
            months.push(current);
            match current.shift(1) {
                Some(next) => current = next,
                None => break,
            }
        }
        months
    }
}

impl From<MonthBucket> for NaiveDate {
    fn from(bucket: MonthBucket) -> Self {
        bucket.0
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}
