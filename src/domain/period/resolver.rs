//! Comparison period resolution
//!
//! Pure functions mapping a primary period and a [`ComparisonStrategy`] to
//! the period it is compared against. Nothing here reads the clock, so the
//! same inputs always produce the same output.
//!
//! Two notions of "previous period" coexist and are kept separate on
//! purpose:
//!
//! - [`resolve_comparison_range`] with `PreviousPeriod` returns a window
//!   of the same month length that ends the day before the primary start.
//! - [`monthly_comparison_offset`] with `PreviousPeriod` returns a single
//!   month, shifted back by the number of primary months.
//!
//! Month and year shifts clamp the day to the end of the target month, so
//! Feb 29 shifted back one year lands on Feb 28.

use chrono::{Days, Months, NaiveDate};

use super::date_range::DateRange;
use super::errors::PeriodError;
use super::month::{first_of_month, MonthBucket};
use super::strategy::ComparisonStrategy;

const MONTHS_PER_YEAR: u32 = 12;
const MONTHS_PER_QUARTER: u32 = 3;
const TRAILING_WINDOW_MONTHS: u32 = 18;

/// Derive the comparison range for `primary` under `strategy`.
///
/// `Unknown` returns the primary range unchanged; callers should treat that
/// as "no real comparison".
pub fn resolve_comparison_range(primary: &DateRange, strategy: ComparisonStrategy) -> DateRange {
    let (start, end) = (primary.start(), primary.end());
    let (comp_start, comp_end) = match strategy {
        ComparisonStrategy::SamePeriodLastYear => (
            start - Months::new(MONTHS_PER_YEAR),
            end - Months::new(MONTHS_PER_YEAR),
        ),
        ComparisonStrategy::PreviousYear => {
            let year_start = MonthBucket::containing(start).year_start().first_day();
            (
                year_start - Months::new(MONTHS_PER_YEAR),
                year_start - Days::new(1),
            )
        }
        ComparisonStrategy::PreviousPeriod => {
            let comp_end = day_before(start);
            let span = primary.period_months() - 1;
            (first_of_month(comp_end - Months::new(span)), comp_end)
        }
        ComparisonStrategy::PreviousMonth => {
            let month_start = first_of_month(start);
            (month_start - Months::new(1), month_start - Days::new(1))
        }
        ComparisonStrategy::PreviousQuarter => {
            let quarter_start = MonthBucket::containing(start).quarter_start().first_day();
            (
                quarter_start - Months::new(MONTHS_PER_QUARTER),
                quarter_start - Days::new(1),
            )
        }
        ComparisonStrategy::Previous18Months => {
            let comp_end = day_before(start);
            (
                first_of_month(comp_end - Months::new(TRAILING_WINDOW_MONTHS)),
                comp_end,
            )
        }
        ComparisonStrategy::Unknown => (start, end),
    };
    DateRange::from_ordered(comp_start, comp_end)
}

/// Validate raw bounds, then resolve.
pub fn resolve_comparison_dates(
    start: NaiveDate,
    end: NaiveDate,
    strategy: ComparisonStrategy,
) -> Result<DateRange, PeriodError> {
    let primary = DateRange::try_new(start, end)?;
    Ok(resolve_comparison_range(&primary, strategy))
}

/// Months whose rows are blended into the comparison point for `month`.
///
/// The result is ordered and contiguous. It is empty for `Unknown`, for
/// `PreviousPeriod` when no primary months are supplied, and when the window
/// would start before the earliest month chrono can represent.
pub fn monthly_comparison_offset(
    month: MonthBucket,
    strategy: ComparisonStrategy,
    primary_months: Option<&[MonthBucket]>,
) -> Vec<MonthBucket> {
    let bounds = match strategy {
        ComparisonStrategy::PreviousMonth => month.shift(-1).map(|previous| (previous, previous)),
        ComparisonStrategy::PreviousYear => {
            let january = month.year_start();
            january.shift(-(MONTHS_PER_YEAR as i32)).zip(january.shift(-1))
        }
        ComparisonStrategy::SamePeriodLastYear => month
            .shift(-(MONTHS_PER_YEAR as i32))
            .map(|last_year| (last_year, last_year)),
        ComparisonStrategy::PreviousPeriod => {
            let length = match primary_months {
                Some(months) if !months.is_empty() => months.len(),
                _ => return Vec::new(),
            };
            let Ok(length) = i32::try_from(length) else {
                return Vec::new();
            };
            month.shift(-length).map(|offset| (offset, offset))
        }
        ComparisonStrategy::PreviousQuarter => {
            let quarter_start = month.quarter_start();
            quarter_start.shift(-(MONTHS_PER_QUARTER as i32)).zip(quarter_start.shift(-1))
        }
        ComparisonStrategy::Previous18Months => month
            .shift(-(TRAILING_WINDOW_MONTHS as i32))
            .zip(month.shift(-1)),
        ComparisonStrategy::Unknown => None,
    };
    bounds.map_or_else(Vec::new, |(first, last)| MonthBucket::range_inclusive(first, last))
}

fn day_before(date: NaiveDate) -> NaiveDate {
    date - Days::new(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bucket(y: i32, m: u32) -> MonthBucket {
        MonthBucket::from_year_month(y, m).unwrap()
    }

    fn resolve(
        start: (i32, u32, u32),
        end: (i32, u32, u32),
        strategy: ComparisonStrategy,
    ) -> (NaiveDate, NaiveDate) {
        let range = resolve_comparison_dates(
            date(start.0, start.1, start.2),
            date(end.0, end.1, end.2),
            strategy,
        )
        .unwrap();
        (range.start(), range.end())
    }

    #[rstest]
    #[case::same_period_last_year(
        (2024, 3, 1), (2024, 3, 31),
        ComparisonStrategy::SamePeriodLastYear,
        (2023, 3, 1), (2023, 3, 31)
    )]
    #[case::previous_month_leap_february(
        (2024, 3, 15), (2024, 3, 20),
        ComparisonStrategy::PreviousMonth,
        (2024, 2, 1), (2024, 2, 29)
    )]
    #[case::previous_month_across_year(
        (2024, 1, 10), (2024, 1, 31),
        ComparisonStrategy::PreviousMonth,
        (2023, 12, 1), (2023, 12, 31)
    )]
    #[case::previous_quarter_from_q1(
        (2024, 1, 15), (2024, 3, 15),
        ComparisonStrategy::PreviousQuarter,
        (2023, 10, 1), (2023, 12, 31)
    )]
    #[case::previous_quarter_from_q2(
        (2024, 4, 1), (2024, 4, 30),
        ComparisonStrategy::PreviousQuarter,
        (2024, 1, 1), (2024, 3, 31)
    )]
    #[case::previous_quarter_from_q4(
        (2024, 11, 5), (2024, 12, 31),
        ComparisonStrategy::PreviousQuarter,
        (2024, 7, 1), (2024, 9, 30)
    )]
    #[case::previous_year_ignores_end(
        (2024, 6, 15), (2025, 2, 1),
        ComparisonStrategy::PreviousYear,
        (2023, 1, 1), (2023, 12, 31)
    )]
    #[case::previous_period_whole_quarter(
        (2024, 4, 1), (2024, 6, 30),
        ComparisonStrategy::PreviousPeriod,
        (2024, 1, 1), (2024, 3, 31)
    )]
    #[case::previous_period_across_year(
        (2024, 1, 1), (2024, 2, 29),
        ComparisonStrategy::PreviousPeriod,
        (2023, 11, 1), (2023, 12, 31)
    )]
    #[case::previous_period_mid_month_start(
        (2024, 3, 15), (2024, 5, 10),
        ComparisonStrategy::PreviousPeriod,
        (2024, 1, 1), (2024, 3, 14)
    )]
    #[case::previous_18_months(
        (2024, 7, 1), (2024, 12, 31),
        ComparisonStrategy::Previous18Months,
        (2022, 12, 1), (2024, 6, 30)
    )]
    #[case::unknown_is_identity(
        (2024, 7, 4), (2024, 8, 9),
        ComparisonStrategy::Unknown,
        (2024, 7, 4), (2024, 8, 9)
    )]
    fn test_resolve_comparison_range(
        #[case] start: (i32, u32, u32),
        #[case] end: (i32, u32, u32),
        #[case] strategy: ComparisonStrategy,
        #[case] expected_start: (i32, u32, u32),
        #[case] expected_end: (i32, u32, u32),
    ) {
        assert_eq!(
            resolve(start, end, strategy),
            (
                date(expected_start.0, expected_start.1, expected_start.2),
                date(expected_end.0, expected_end.1, expected_end.2),
            )
        );
    }

    #[test]
    fn test_leap_day_clamps_to_february_28() {
        assert_eq!(
            resolve(
                (2024, 2, 29),
                (2024, 2, 29),
                ComparisonStrategy::SamePeriodLastYear
            ),
            (date(2023, 2, 28), date(2023, 2, 28))
        );
        assert_eq!(
            resolve(
                (2024, 2, 1),
                (2024, 2, 29),
                ComparisonStrategy::SamePeriodLastYear
            ),
            (date(2023, 2, 1), date(2023, 2, 28))
        );
    }

    #[test]
    fn test_previous_period_month_end_clamping() {
        // May 31 minus three months clamps to Feb 28 before flooring.
        assert_eq!(
            resolve(
                (2023, 6, 1),
                (2023, 9, 30),
                ComparisonStrategy::PreviousPeriod
            ),
            (date(2023, 2, 1), date(2023, 5, 31))
        );
    }

    #[test]
    fn test_rejects_reversed_dates() {
        let result = resolve_comparison_dates(
            date(2024, 5, 1),
            date(2024, 4, 1),
            ComparisonStrategy::PreviousMonth,
        );
        assert!(matches!(result, Err(PeriodError::InvalidRange { .. })));
    }

    #[test]
    fn test_offset_previous_month() {
        assert_eq!(
            monthly_comparison_offset(bucket(2024, 1), ComparisonStrategy::PreviousMonth, None),
            vec![bucket(2023, 12)]
        );
    }

    #[test]
    fn test_offset_previous_year_is_full_calendar_year() {
        let months =
            monthly_comparison_offset(bucket(2024, 5), ComparisonStrategy::PreviousYear, None);
        assert_eq!(months.len(), 12);
        assert_eq!(months.first(), Some(&bucket(2023, 1)));
        assert_eq!(months.last(), Some(&bucket(2023, 12)));
    }

    #[test]
    fn test_offset_same_period_last_year() {
        assert_eq!(
            monthly_comparison_offset(
                bucket(2024, 2),
                ComparisonStrategy::SamePeriodLastYear,
                None
            ),
            vec![bucket(2023, 2)]
        );
    }

    #[test]
    fn test_offset_previous_period_uses_primary_length() {
        let primary = vec![bucket(2024, 4), bucket(2024, 5), bucket(2024, 6)];
        assert_eq!(
            monthly_comparison_offset(
                bucket(2024, 5),
                ComparisonStrategy::PreviousPeriod,
                Some(primary.as_slice())
            ),
            vec![bucket(2024, 2)]
        );
    }

    #[test]
    fn test_offset_previous_period_without_primary_is_empty() {
        assert!(monthly_comparison_offset(
            bucket(2024, 5),
            ComparisonStrategy::PreviousPeriod,
            None
        )
        .is_empty());
        assert!(monthly_comparison_offset(
            bucket(2024, 5),
            ComparisonStrategy::PreviousPeriod,
            Some(&[][..])
        )
        .is_empty());
    }

    #[rstest]
    #[case(bucket(2024, 1), bucket(2023, 10))]
    #[case(bucket(2024, 3), bucket(2023, 10))]
    #[case(bucket(2024, 4), bucket(2024, 1))]
    #[case(bucket(2024, 12), bucket(2024, 7))]
    fn test_offset_previous_quarter(#[case] month: MonthBucket, #[case] first: MonthBucket) {
        let months = monthly_comparison_offset(month, ComparisonStrategy::PreviousQuarter, None);
        assert_eq!(months, vec![first, first.shift(1).unwrap(), first.shift(2).unwrap()]);
    }

    #[test]
    fn test_offset_previous_18_months() {
        let months =
            monthly_comparison_offset(bucket(2024, 7), ComparisonStrategy::Previous18Months, None);
        assert_eq!(months.len(), 18);
        assert_eq!(months.first(), Some(&bucket(2023, 1)));
        assert_eq!(months.last(), Some(&bucket(2024, 6)));
    }

    #[test]
    fn test_offset_unknown_is_empty() {
        assert!(
            monthly_comparison_offset(bucket(2024, 7), ComparisonStrategy::Unknown, None)
                .is_empty()
        );
    }

    #[test]
    fn test_range_and_offset_previous_period_diverge() {
        let primary = DateRange::try_new(date(2024, 4, 1), date(2024, 6, 30)).unwrap();
        let range = resolve_comparison_range(&primary, ComparisonStrategy::PreviousPeriod);
        assert_eq!(range.period_months(), 3);

        let months = primary.months();
        let offset = monthly_comparison_offset(
            months[0],
            ComparisonStrategy::PreviousPeriod,
            Some(months.as_slice()),
        );
        assert_eq!(offset.len(), 1);
    }

    #[test]
    fn test_offset_before_earliest_month_is_empty() {
        let earliest = MonthBucket::containing(NaiveDate::MIN);
        for strategy in [
            ComparisonStrategy::PreviousMonth,
            ComparisonStrategy::PreviousYear,
            ComparisonStrategy::SamePeriodLastYear,
            ComparisonStrategy::PreviousQuarter,
            ComparisonStrategy::Previous18Months,
        ] {
            assert!(monthly_comparison_offset(earliest, strategy, None).is_empty());
        }
        assert!(monthly_comparison_offset(
            earliest,
            ComparisonStrategy::PreviousPeriod,
            Some(&[earliest][..])
        )
        .is_empty());

        let latest = MonthBucket::containing(NaiveDate::MAX);
        assert_eq!(
            monthly_comparison_offset(latest, ComparisonStrategy::PreviousMonth, None),
            vec![latest.shift(-1).unwrap()]
        );
    }
}
