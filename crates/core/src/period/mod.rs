//! Period window normalization.
//!
//! Monthly statement records are stored anchored to the first day of their
//! month. A query for any in-month day must therefore match the whole
//! containing month; this module rewrites the window accordingly before the
//! planner composes its filters.

use chrono::{Datelike, Days, NaiveDate};

use crate::registry::PeriodSemantics;

/// Returns the first day of the month containing `date`.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Returns the last day of the month containing `date`.
///
/// Computed as the first of the next month minus one day; December wraps
/// into January of the next year.
#[must_use]
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.checked_sub_days(Days::new(1)))
        .unwrap_or(date)
}

/// Normalizes a query window for the given period semantics.
///
/// - Day-exact kinds keep the window unchanged.
/// - Month-anchored kinds expand a single-day window to the full containing
///   month; otherwise the start is pulled back to the first of its month
///   and the end is kept.
/// - Snapshot kinds have no window; returns `None`.
///
/// The normalized window is never inverted.
#[must_use]
pub fn normalize_window(
    semantics: PeriodSemantics,
    debut: NaiveDate,
    fin: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    match semantics {
        PeriodSemantics::DayExact => Some((debut, fin)),
        PeriodSemantics::MonthAnchored => {
            if debut == fin {
                Some((first_of_month(debut), last_of_month(debut)))
            } else {
                Some((first_of_month(debut), fin))
            }
        }
        PeriodSemantics::Snapshot => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(d(2024, 3, 15), d(2024, 3, 31))]
    #[case(d(2024, 2, 10), d(2024, 2, 29))] // leap year
    #[case(d(2023, 2, 1), d(2023, 2, 28))]
    #[case(d(2024, 12, 25), d(2024, 12, 31))] // December wraps into next year
    #[case(d(2024, 4, 30), d(2024, 4, 30))]
    fn test_last_of_month(#[case] input: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(last_of_month(input), expected);
    }

    #[test]
    fn test_day_exact_window_unchanged() {
        let window = normalize_window(PeriodSemantics::DayExact, d(2024, 6, 1), d(2024, 6, 30));
        assert_eq!(window, Some((d(2024, 6, 1), d(2024, 6, 30))));
    }

    #[test]
    fn test_single_day_expands_to_containing_month() {
        // A statement stored at 2024-03-01 must be matched by a query for
        // any day of March.
        let window = normalize_window(PeriodSemantics::MonthAnchored, d(2024, 3, 15), d(2024, 3, 15));
        assert_eq!(window, Some((d(2024, 3, 1), d(2024, 3, 31))));
    }

    #[test]
    fn test_multi_day_window_pulls_start_to_first_of_month() {
        let window = normalize_window(PeriodSemantics::MonthAnchored, d(2024, 3, 15), d(2024, 5, 10));
        assert_eq!(window, Some((d(2024, 3, 1), d(2024, 5, 10))));
    }

    #[test]
    fn test_snapshot_has_no_window() {
        assert_eq!(
            normalize_window(PeriodSemantics::Snapshot, d(2024, 1, 1), d(2024, 1, 1)),
            None
        );
    }

    proptest! {
        // The normalizer never emits an inverted window.
        #[test]
        fn prop_window_never_inverted(
            start_days in 0u64..14_000,
            span_days in 0u64..366,
            month_anchored in any::<bool>(),
        ) {
            let debut = d(1990, 1, 1) + chrono::Days::new(start_days);
            let fin = debut + chrono::Days::new(span_days);
            let semantics = if month_anchored {
                PeriodSemantics::MonthAnchored
            } else {
                PeriodSemantics::DayExact
            };

            if let Some((lo, hi)) = normalize_window(semantics, debut, fin) {
                prop_assert!(lo <= hi);
            }
        }

        // Expansion always covers the original window.
        #[test]
        fn prop_expanded_window_covers_input(
            start_days in 0u64..14_000,
            span_days in 0u64..366,
        ) {
            let debut = d(1990, 1, 1) + chrono::Days::new(start_days);
            let fin = debut + chrono::Days::new(span_days);

            let (lo, hi) = normalize_window(PeriodSemantics::MonthAnchored, debut, fin).unwrap();
            prop_assert!(lo <= debut);
            prop_assert!(hi >= fin);
        }
    }
}
