//! Enrolled-population profile: demographics and the risk score distribution

use serde::{Deserialize, Serialize};

use super::constants::ratios::PERCENT;
use super::totals::safe_ratio;

/// Raw member-month aggregates behind the demographics panel
///
/// Each count is over distinct `(member, month)` pairs. Age and sex come from
/// the member dimension; members missing from it count toward
/// `member_months` only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PopulationTotals {
    pub member_months: u64,
    pub months: u64,
    pub female_member_months: u64,
    pub age_total: f64,
    pub aged_member_months: u64,
    pub risk_total: f64,
    pub scored_member_months: u64,
}

impl PopulationTotals {
    pub fn average_members_per_month(&self) -> f64 {
        safe_ratio(self.member_months as f64, self.months as f64)
    }

    pub fn average_age(&self) -> f64 {
        safe_ratio(self.age_total, self.aged_member_months as f64)
    }

    /// Share of member-months held by female members, in percentage points
    pub fn percent_female(&self) -> f64 {
        safe_ratio(self.female_member_months as f64, self.member_months as f64) * PERCENT
    }

    pub fn average_risk_score(&self) -> f64 {
        safe_ratio(self.risk_total, self.scored_member_months as f64)
    }

    pub fn summary(&self) -> DemographicSummary {
        DemographicSummary {
            total_member_months: self.member_months,
            average_members_per_month: self.average_members_per_month(),
            average_age: self.average_age(),
            percent_female: self.percent_female(),
            average_risk_score: self.average_risk_score(),
        }
    }
}

/// Display values for the demographics panel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DemographicSummary {
    pub total_member_months: u64,
    pub average_members_per_month: f64,
    pub average_age: f64,
    pub percent_female: f64,
    pub average_risk_score: f64,
}

/// Five-number summary and mean of normalized risk scores, for a box plot
///
/// Quartiles interpolate linearly between the nearest ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub first_quartile: f64,
    pub median: f64,
    pub third_quartile: f64,
    pub max: f64,
}

impl RiskDistribution {
    /// `None` when no finite score remains
    pub fn from_scores(scores: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = scores.into_iter().filter(|s| s.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let (&min, &max) = (sorted.first()?, sorted.last()?);
        Some(Self {
            count: sorted.len(),
            mean: safe_ratio(sorted.iter().sum(), sorted.len() as f64),
            min,
            first_quartile: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            third_quartile: quantile(&sorted, 0.75),
            max,
        })
    }
}

/// Linear interpolation over a sorted, non-empty slice
fn quantile(sorted: &[f64], fraction: f64) -> f64 {
    let position = fraction * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    let interpolated = sorted[lower] + (sorted[upper] - sorted[lower]) * weight;
    interpolated.min(sorted[upper])
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_summary_ratios() {
        let totals = PopulationTotals {
            member_months: 8,
            months: 2,
            female_member_months: 2,
            age_total: 300.0,
            aged_member_months: 6,
            risk_total: 4.5,
            scored_member_months: 3,
        };

        let summary = totals.summary();
        assert_eq!(summary.total_member_months, 8);
        assert_eq!(summary.average_members_per_month, 4.0);
        assert_eq!(summary.average_age, 50.0);
        assert_eq!(summary.percent_female, 25.0);
        assert_eq!(summary.average_risk_score, 1.5);
    }

    #[test]
    fn test_empty_population_is_all_zero() {
        assert_eq!(
            PopulationTotals::default().summary(),
            DemographicSummary::default()
        );
    }

    #[test]
    fn test_unmatched_members_do_not_skew_averages() {
        let totals = PopulationTotals {
            member_months: 10,
            months: 1,
            female_member_months: 0,
            age_total: 0.0,
            aged_member_months: 0,
            risk_total: 0.0,
            scored_member_months: 0,
        };
        assert_eq!(totals.average_age(), 0.0);
        assert_eq!(totals.average_risk_score(), 0.0);
        assert_eq!(totals.average_members_per_month(), 10.0);
    }

    #[test]
    fn test_risk_distribution_quartiles() {
        let distribution =
            RiskDistribution::from_scores([1.5, 0.5, 1.5, 0.5, 0.5, 1.5]).unwrap();

        assert_eq!(distribution.count, 6);
        assert_eq!(distribution.min, 0.5);
        assert_eq!(distribution.first_quartile, 0.5);
        assert_eq!(distribution.median, 1.0);
        assert_eq!(distribution.third_quartile, 1.5);
        assert_eq!(distribution.max, 1.5);
        assert_eq!(distribution.mean, 1.0);
    }

    #[test]
    fn test_risk_distribution_interpolates() {
        let distribution = RiskDistribution::from_scores([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(distribution.median, 3.0);
        assert_eq!(distribution.first_quartile, 2.0);

        let pair = RiskDistribution::from_scores([1.0, 2.0]).unwrap();
        assert_eq!(pair.median, 1.5);
        assert_eq!(pair.first_quartile, 1.25);
    }

    #[test]
    fn test_risk_distribution_skips_non_finite() {
        assert_eq!(RiskDistribution::from_scores(Vec::new()), None);
        assert_eq!(RiskDistribution::from_scores([f64::NAN]), None);

        let single = RiskDistribution::from_scores([f64::INFINITY, 0.8]).unwrap();
        assert_eq!(single.count, 1);
        assert_eq!(single.min, 0.8);
        assert_eq!(single.median, 0.8);
        assert_eq!(single.max, 0.8);
    }

    #[quickcheck]
    fn prop_quartiles_are_ordered(scores: Vec<f64>) -> bool {
        let bounded = scores.into_iter().map(|score| score % 1_000.0);
        match RiskDistribution::from_scores(bounded) {
            None => true,
            Some(d) => {
                d.min <= d.first_quartile
                    && d.first_quartile <= d.median
                    && d.median <= d.third_quartile
                    && d.third_quartile <= d.max
            }
        }
    }
}
