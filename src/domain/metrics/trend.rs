//! Monthly trend series with a blended comparison line
//!
//! Each comparison point is the KPI of the summed totals over the month's
//! offset window, not an average of monthly KPIs.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::period::{monthly_comparison_offset, ComparisonStrategy, MonthBucket};

use super::kpi::KpiKind;
use super::totals::{MemberMonthTotals, MonthlyMetrics};

/// A single point on a trend chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: MonthBucket,
    pub value: f64,
}

/// Current and comparison series for one KPI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub kind: KpiKind,
    pub strategy: ComparisonStrategy,
    pub current: Vec<TrendPoint>,
    pub comparison: Vec<TrendPoint>,
}

impl TrendSeries {
    /// Build both series from store rows.
    ///
    /// The current series only includes primary months that have rows.
    /// PMPM and PKPY comparison points are emitted for every primary month
    /// (zero when the window is empty); cost-per-encounter points are
    /// skipped when the window has no rows.
    pub fn build(
        rows: &[MonthlyMetrics],
        primary_months: &[MonthBucket],
        strategy: ComparisonStrategy,
        kind: KpiKind,
    ) -> Self {
        let by_month: BTreeMap<MonthBucket, MemberMonthTotals> = rows
            .iter()
            .filter_map(|row| row.month.to_month_bucket().map(|month| (month, row.totals())))
            .collect();

        let current = primary_months
            .iter()
            .filter_map(|month| {
                by_month.get(month).map(|totals| TrendPoint {
                    month: *month,
                    value: kind.value(totals),
                })
            })
            .collect();

        let comparison = primary_months
            .iter()
            .filter_map(|month| {
                let window: Vec<MemberMonthTotals> =
                    monthly_comparison_offset(*month, strategy, Some(primary_months))
                        .iter()
                        .filter_map(|offset| by_month.get(offset).copied())
                        .collect();
                if window.is_empty() && kind == KpiKind::CostPerEncounter {
                    return None;
                }
                let blended: MemberMonthTotals = window.into_iter().sum();
                Some(TrendPoint {
                    month: *month,
                    value: kind.value(&blended),
                })
            })
            .collect();

        Self {
            kind,
            strategy,
            current,
            comparison,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.comparison.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::YearMonthKey;

    fn bucket(y: i32, m: u32) -> MonthBucket {
        MonthBucket::from_year_month(y, m).unwrap()
    }

    fn row(key: i32, members: u64, encounters: u64, paid: f64) -> MonthlyMetrics {
        MonthlyMetrics {
            month: YearMonthKey::try_new(key).unwrap(),
            members,
            encounters,
            paid,
        }
    }

    fn sample_rows() -> Vec<MonthlyMetrics> {
        vec![
            row(202401, 10, 2, 1_000.0),
            row(202402, 10, 4, 3_000.0),
            row(202403, 20, 6, 4_000.0),
            row(202404, 20, 5, 5_000.0),
            row(202405, 25, 10, 7_500.0),
        ]
    }

    #[test]
    fn test_previous_month_comparison() {
        let primary = vec![bucket(2024, 4), bucket(2024, 5)];
        let series = TrendSeries::build(
            &sample_rows(),
            &primary,
            ComparisonStrategy::PreviousMonth,
            KpiKind::Pmpm,
        );

        assert_eq!(
            series.current,
            vec![
                TrendPoint { month: bucket(2024, 4), value: 250.0 },
                TrendPoint { month: bucket(2024, 5), value: 300.0 },
            ]
        );
        assert_eq!(
            series.comparison,
            vec![
                TrendPoint { month: bucket(2024, 4), value: 200.0 },
                TrendPoint { month: bucket(2024, 5), value: 250.0 },
            ]
        );
    }

    #[test]
    fn test_quarter_window_is_blended() {
        let primary = vec![bucket(2024, 4)];
        let series = TrendSeries::build(
            &sample_rows(),
            &primary,
            ComparisonStrategy::PreviousQuarter,
            KpiKind::Pmpm,
        );
        // (1000 + 3000 + 4000) / (10 + 10 + 20)
        assert_eq!(series.comparison[0].value, 200.0);

        let pkpy = TrendSeries::build(
            &sample_rows(),
            &primary,
            ComparisonStrategy::PreviousQuarter,
            KpiKind::Pkpy,
        );
        // 12 encounters / 40 members * 12000
        assert_eq!(pkpy.comparison[0].value, 3_600.0);
    }

    #[test]
    fn test_empty_window_behaviour_by_kind() {
        let primary = vec![bucket(2024, 1)];
        let pmpm = TrendSeries::build(
            &sample_rows(),
            &primary,
            ComparisonStrategy::SamePeriodLastYear,
            KpiKind::Pmpm,
        );
        assert_eq!(
            pmpm.comparison,
            vec![TrendPoint { month: bucket(2024, 1), value: 0.0 }]
        );

        let cost = TrendSeries::build(
            &sample_rows(),
            &primary,
            ComparisonStrategy::SamePeriodLastYear,
            KpiKind::CostPerEncounter,
        );
        assert!(cost.comparison.is_empty());
        assert_eq!(cost.current.len(), 1);
    }

    #[test]
    fn test_current_skips_months_without_rows() {
        let primary = vec![bucket(2024, 5), bucket(2024, 6)];
        let series = TrendSeries::build(
            &sample_rows(),
            &primary,
            ComparisonStrategy::Unknown,
            KpiKind::Pmpm,
        );
        assert_eq!(series.current.len(), 1);
        assert!(series.comparison.iter().all(|point| point.value == 0.0));
    }

    #[test]
    fn test_previous_period_offsets_by_primary_length() {
        let primary = vec![bucket(2024, 4), bucket(2024, 5)];
        let series = TrendSeries::build(
            &sample_rows(),
            &primary,
            ComparisonStrategy::PreviousPeriod,
            KpiKind::CostPerEncounter,
        );
        // April compares to February, May to March.
        assert_eq!(series.comparison[0].value, 750.0);
        assert!((series.comparison[1].value - 4_000.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_enrolled_month_without_claims_stays_in_window() {
        let rows = vec![
            row(202401, 2, 1, 1_000.0),
            row(202402, 2, 0, 0.0),
            row(202403, 2, 1, 1_000.0),
        ];
        let series = TrendSeries::build(
            &rows,
            &[bucket(2024, 4)],
            ComparisonStrategy::PreviousQuarter,
            KpiKind::Pmpm,
        );
        // 2000 paid over all six member-months, not the four with claims
        assert_eq!(series.comparison[0].value, 2_000.0 / 6.0);

        let cost = TrendSeries::build(
            &rows,
            &[bucket(2024, 4)],
            ComparisonStrategy::PreviousQuarter,
            KpiKind::CostPerEncounter,
        );
        assert_eq!(cost.comparison[0].value, 1_000.0);
    }

    #[test]
    fn test_no_rows_is_empty() {
        let series = TrendSeries::build(
            &[],
            &[bucket(2024, 1)],
            ComparisonStrategy::PreviousMonth,
            KpiKind::CostPerEncounter,
        );
        assert!(series.is_empty());
    }
}
