//! Aggregate fact-table totals and the KPI ratios derived from them

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

use crate::domain::period::YearMonthKey;

use super::constants::ratios::PER_THOUSAND_PER_YEAR;

/// Divide, yielding `0.0` for a zero denominator or any non-finite result
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Paid amount, encounter count and member-month count for one query window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemberMonthTotals {
    pub paid: f64,
    pub encounters: u64,
    pub member_months: u64,
}

impl MemberMonthTotals {
    pub fn new(paid: f64, encounters: u64, member_months: u64) -> Self {
        Self {
            paid,
            encounters,
            member_months,
        }
    }

    /// Paid per member per month
    pub fn pmpm(&self) -> f64 {
        safe_ratio(self.paid, self.member_months as f64)
    }

    /// Encounters per thousand members per year
    pub fn pkpy(&self) -> f64 {
        safe_ratio(self.encounters as f64, self.member_months as f64) * PER_THOUSAND_PER_YEAR
    }

    pub fn cost_per_encounter(&self) -> f64 {
        safe_ratio(self.paid, self.encounters as f64)
    }

    pub fn has_members(&self) -> bool {
        self.member_months > 0
    }
}

impl Add for MemberMonthTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            paid: self.paid + other.paid,
            encounters: self.encounters + other.encounters,
            member_months: self.member_months + other.member_months,
        }
    }
}

impl Sum for MemberMonthTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// One month of trend data from the metrics store
///
/// `members` is the count of distinct members enrolled that month, which is
/// the month's member-month denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    pub month: YearMonthKey,
    pub members: u64,
    pub encounters: u64,
    pub paid: f64,
}

impl MonthlyMetrics {
    pub fn totals(&self) -> MemberMonthTotals {
        MemberMonthTotals::new(self.paid, self.encounters, self.members)
    }
}

/// PMPM contribution of one dimension value (encounter group, type or CCSR category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub category: String,
    pub total_paid: f64,
    pub pmpm: f64,
}

impl BreakdownRow {
    pub fn new(category: impl Into<String>, total_paid: f64, member_months: u64) -> Self {
        Self {
            category: category.into(),
            total_paid,
            pmpm: safe_ratio(total_paid, member_months as f64),
        }
    }
}
