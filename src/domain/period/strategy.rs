//! Named comparison strategies offered by the dashboard

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Rule selecting the prior period a primary range is measured against
///
/// Labels match the dashboard's comparison dropdown. Parsing is total:
/// any label outside that vocabulary becomes [`ComparisonStrategy::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComparisonStrategy {
    #[display("Same Period Last Year")]
    SamePeriodLastYear,
    #[display("Previous Year")]
    PreviousYear,
    #[display("Previous Period")]
    PreviousPeriod,
    #[display("Previous Month")]
    PreviousMonth,
    #[display("Previous Quarter")]
    PreviousQuarter,
    #[display("Previous 18 Months")]
    Previous18Months,
    /// Fallback for unrecognized labels; compares a period against itself
    #[display("Unknown")]
    Unknown,
}

impl ComparisonStrategy {
    /// Every real strategy, in dropdown order
    pub const ALL: [ComparisonStrategy; 6] = [
        Self::Previous18Months,
        Self::PreviousMonth,
        Self::PreviousPeriod,
        Self::PreviousQuarter,
        Self::PreviousYear,
        Self::SamePeriodLastYear,
    ];

    /// Dashboard default selection
    pub const DEFAULT: ComparisonStrategy = Self::SamePeriodLastYear;

    /// Exact, case- and whitespace-sensitive match against the dropdown labels
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label() == label)
            .unwrap_or(Self::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SamePeriodLastYear => "Same Period Last Year",
            Self::PreviousYear => "Previous Year",
            Self::PreviousPeriod => "Previous Period",
            Self::PreviousMonth => "Previous Month",
            Self::PreviousQuarter => "Previous Quarter",
            Self::Previous18Months => "Previous 18 Months",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether this strategy yields a real comparison rather than the fallback
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl Default for ComparisonStrategy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<&str> for ComparisonStrategy {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<String> for ComparisonStrategy {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<ComparisonStrategy> for String {
    fn from(strategy: ComparisonStrategy) -> Self {
        strategy.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Same Period Last Year", ComparisonStrategy::SamePeriodLastYear)]
    #[case("Previous Year", ComparisonStrategy::PreviousYear)]
    #[case("Previous Period", ComparisonStrategy::PreviousPeriod)]
    #[case("Previous Month", ComparisonStrategy::PreviousMonth)]
    #[case("Previous Quarter", ComparisonStrategy::PreviousQuarter)]
    #[case("Previous 18 Months", ComparisonStrategy::Previous18Months)]
    fn test_known_labels(#[case] label: &str, #[case] expected: ComparisonStrategy) {
        assert_eq!(ComparisonStrategy::from_label(label), expected);
    }

    #[rstest]
    #[case("")]
    #[case("previous month")]
    #[case(" Previous Month ")]
    #[case("Previous Month\n")]
    #[case("Last Fortnight")]
    #[case("Unknown")]
    fn test_unrecognized_labels_fall_back(#[case] label: &str) {
        let strategy = ComparisonStrategy::from_label(label);
        assert_eq!(strategy, ComparisonStrategy::Unknown);
        assert!(!strategy.is_known());
    }

    #[test]
    fn test_labels_round_trip() {
        for strategy in ComparisonStrategy::ALL {
            assert_eq!(ComparisonStrategy::from_label(strategy.label()), strategy);
            assert_eq!(strategy.to_string(), strategy.label());
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&ComparisonStrategy::Previous18Months).unwrap();
        assert_eq!(json, "\"Previous 18 Months\"");

        let parsed: ComparisonStrategy = serde_json::from_str("\"Previous Quarter\"").unwrap();
        assert_eq!(parsed, ComparisonStrategy::PreviousQuarter);

        let fallback: ComparisonStrategy = serde_json::from_str("\"Year to Date\"").unwrap();
        assert_eq!(fallback, ComparisonStrategy::Unknown);
    }

    #[test]
    fn test_default_is_same_period_last_year() {
        assert_eq!(
            ComparisonStrategy::default(),
            ComparisonStrategy::SamePeriodLastYear
        );
    }
}
