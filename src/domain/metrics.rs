//! Cost and utilization KPIs
//!
//! Paid-per-member-per-month, utilization per thousand per year and
//! cost-per-encounter, along with the period-over-period comparisons and
//! monthly trend series built from them, plus the demographics and risk
//! profile of the enrolled population. Every ratio treats a zero
//! denominator as zero.

pub mod constants;
pub mod kpi;
pub mod population;
pub mod totals;
pub mod trend;
pub mod values;

pub use kpi::{KpiComparison, KpiKind};
pub use population::{DemographicSummary, PopulationTotals, RiskDistribution};
pub use totals::{safe_ratio, BreakdownRow, MemberMonthTotals, MonthlyMetrics};
pub use trend::{TrendPoint, TrendSeries};
pub use values::{ChangeDirection, PercentageChange};
