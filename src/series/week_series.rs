//! Single-student week series.

use serde::Serialize;

use crate::contracts::WeeklyRecord;
use crate::series::types::WeekPoint;
use crate::series::utility::{mean, stddev};

/// Returns the record's weeks from week 1 up to, but not including, the first
/// missing week. Weeks past a gap are never returned, and a record without
/// week 1 yields an empty series.
pub fn extract_week_series(record: &WeeklyRecord) -> Vec<WeekPoint> {
    (1..=record.contiguous_weeks())
        .filter_map(|week| {
            record.week(week).map(|m| WeekPoint {
                week,
                views: m.views,
                rank: m.rank,
                pct_change: m.pct_change,
            })
        })
        .collect()
}

/// Headline numbers for a week series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub weeks: usize,
    pub total_views: u64,
    pub mean_views: f64,
    pub stddev_views: f64,
    /// Week with the most views; the earliest wins a tie.
    pub peak_week: Option<u32>,
    /// Lowest non-zero rank reached.
    pub best_rank: Option<u32>,
}

impl SeriesSummary {
    pub fn from_points(points: &[WeekPoint]) -> Self {
        let views: Vec<f64> = points.iter().map(|p| p.views as f64).collect();
        let avg = mean(&views);

        let peak_week = points
            .iter()
            .fold(None::<&WeekPoint>, |best, p| match best {
                Some(b) if b.views >= p.views => Some(b),
                _ => Some(p),
            })
            .map(|p| p.week);

        SeriesSummary {
            weeks: points.len(),
            total_views: points.iter().map(|p| p.views).sum(),
            mean_views: avg,
            stddev_views: stddev(&views, avg),
            peak_week,
            best_rank: points.iter().map(|p| p.rank).filter(|r| *r > 0).min(),
        }
    }
}
