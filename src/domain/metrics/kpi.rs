//! KPI kinds and period-over-period comparisons

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::domain::period::{ComparisonStrategy, DateRange};

use super::totals::MemberMonthTotals;
use super::values::PercentageChange;

/// The three headline dashboard KPIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum KpiKind {
    #[display("PMPM Cost")]
    Pmpm,
    #[display("Utilization PKPY")]
    Pkpy,
    #[display("Cost per Encounter")]
    CostPerEncounter,
}

impl KpiKind {
    pub const ALL: [KpiKind; 3] = [Self::Pmpm, Self::Pkpy, Self::CostPerEncounter];

    /// Evaluate this KPI over aggregate totals
    pub fn value(&self, totals: &MemberMonthTotals) -> f64 {
        match self {
            Self::Pmpm => totals.pmpm(),
            Self::Pkpy => totals.pkpy(),
            Self::CostPerEncounter => totals.cost_per_encounter(),
        }
    }

    /// Monetary KPIs are displayed with a currency sign
    pub fn is_monetary(&self) -> bool {
        !matches!(self, Self::Pkpy)
    }
}

/// A KPI evaluated over a primary range and its comparison range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiComparison {
    pub kind: KpiKind,
    pub strategy: ComparisonStrategy,
    pub primary_range: DateRange,
    pub comparison_range: DateRange,
    pub current: f64,
    pub comparison: f64,
    pub change: PercentageChange,
}

impl KpiComparison {
    pub fn from_totals(
        kind: KpiKind,
        strategy: ComparisonStrategy,
        primary_range: DateRange,
        comparison_range: DateRange,
        primary: &MemberMonthTotals,
        comparison: &MemberMonthTotals,
    ) -> Self {
        let current = kind.value(primary);
        let comparison = kind.value(comparison);
        Self {
            kind,
            strategy,
            primary_range,
            comparison_range,
            current,
            comparison,
            change: PercentageChange::between(current, comparison),
        }
    }

    /// Whether the comparison is a real prior period rather than the fallback
    pub fn has_real_comparison(&self) -> bool {
        self.strategy.is_known()
    }

    /// Rounded display value, e.g. `$1,235` or `3,000`
    pub fn display_value(&self, value: f64) -> String {
        let rounded = group_thousands(value.round() as i64);
        if self.kind.is_monetary() {
            format!("${rounded}")
        } else {
            rounded
        }
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
