//! Side-by-side week series for two students.

use tracing::debug;

use crate::contracts::{WeekMetrics, WeeklyRecord};
use crate::series::types::{ComparisonRow, StudentWeek};

/// How far a week axis runs when records have gaps or different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopPolicy {
    /// Each record contributes only its weeks contiguous from week 1; the
    /// axis runs to the longer of the two runs.
    Contiguous,
    /// The axis runs while either record has the week. This is the
    /// comparison chart's policy.
    #[default]
    UnionAcrossPair,
}

impl StopPolicy {
    /// Number of rows the axis covers for this pair.
    pub fn span(self, first: &WeeklyRecord, second: &WeeklyRecord) -> u32 {
        match self {
            StopPolicy::Contiguous => first.contiguous_weeks().max(second.contiguous_weeks()),
            StopPolicy::UnionAcrossPair => {
                let mut week = 0;
                while first.has_week(week + 1) || second.has_week(week + 1) {
                    week += 1;
                }
                week
            }
        }
    }

    fn visible(self, record: &WeeklyRecord, week: u32) -> Option<&WeekMetrics> {
        match self {
            StopPolicy::Contiguous if week > record.contiguous_weeks() => None,
            _ => record.week(week),
        }
    }
}

/// Aligns two records week by week using [`StopPolicy::UnionAcrossPair`].
pub fn align_pair(first: &WeeklyRecord, second: &WeeklyRecord) -> Vec<ComparisonRow> {
    align_pair_with(first, second, StopPolicy::default())
}

/// Aligns two records week by week. A student without data in a week gets
/// zero views and rank 0 for that row.
pub fn align_pair_with(
    first: &WeeklyRecord,
    second: &WeeklyRecord,
    policy: StopPolicy,
) -> Vec<ComparisonRow> {
    let side = |record: &WeeklyRecord, week: u32| {
        let metrics = policy.visible(record, week).copied().unwrap_or_default();
        StudentWeek {
            student_id: record.student_id.clone(),
            views: metrics.views,
            rank: metrics.rank,
        }
    };

    (1..=policy.span(first, second))
        .map(|week| ComparisonRow {
            week,
            first: side(first, week),
            second: side(second, week),
        })
        .collect()
}

/// Comparison rows for the current selection; only a selection of exactly
/// two records produces rows.
pub fn compare_selection(records: &[WeeklyRecord]) -> Vec<ComparisonRow> {
    match records {
        [first, second] => align_pair(first, second),
        _ => {
            debug!(selected = records.len(), "Comparison needs exactly two students");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, weeks: &[u32]) -> WeeklyRecord {
        WeeklyRecord::from_weeks(
            id,
            weeks.iter().map(|&w| {
                (
                    w,
                    WeekMetrics {
                        views: u64::from(w) * 10,
                        rank: w + 50,
                        pct_change: 0.0,
                    },
                )
            }),
        )
    }

    #[test]
    fn test_longer_series_sets_row_count() {
        let a = record("a", &[1, 2, 3, 4, 5]);
        let b = record("b", &[1, 2, 3]);
        let rows = align_pair(&a, &b);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3].second.views, 0);
        assert_eq!(rows[3].second.rank, 0);
        assert_eq!(rows[4].second.views, 0);
        assert_eq!(rows[4].first.views, 50);
        assert_eq!(rows[4].second.student_id, "b");
    }

    #[test]
    fn test_rows_are_ordered_without_gaps() {
        let rows = align_pair(&record("a", &[1, 2]), &record("b", &[1, 2, 3, 4]));
        assert_eq!(
            rows.iter().map(|r| r.week).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_union_bridges_one_sided_gaps() {
        // a skips week 3 but b has it, so a's week 4 is still reached.
        let a = record("a", &[1, 2, 4]);
        let b = record("b", &[1, 2, 3]);
        let rows = align_pair(&a, &b);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].first.views, 0);
        assert_eq!(rows[3].first.views, 40);
    }

    #[test]
    fn test_contiguous_policy_ignores_weeks_past_a_gap() {
        let a = record("a", &[1, 2, 4]);
        let b = record("b", &[1, 2, 3]);
        let rows = align_pair_with(&a, &b, StopPolicy::Contiguous);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].first.views, 0);
        assert_eq!(rows[2].second.views, 30);
    }

    #[test]
    fn test_both_missing_week_one_yields_no_rows() {
        let rows = align_pair(&record("a", &[2]), &record("b", &[3]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_selection_requires_two_records() {
        assert!(compare_selection(&[record("a", &[1])]).is_empty());
        assert!(
            compare_selection(&[record("a", &[1]), record("b", &[1]), record("c", &[1])])
                .is_empty()
        );
        assert_eq!(
            compare_selection(&[record("a", &[1]), record("b", &[1])]).len(),
            1
        );
    }
}
