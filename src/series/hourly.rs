//! Hour-of-day reductions.
//!
//! Two views of the same hourly data coexist and are kept apart on purpose:
//! eight 3-hour [`PeriodBucket`]s for the hourly chart, and the backend's
//! four [`DayPart`]s for the narrative breakdown.

use tracing::warn;

use crate::contracts::{DayPart, DayPartShare, HourlyEntry};
use crate::series::types::PeriodBucket;
use crate::series::utility::pct;

pub const BUCKET_HOURS: u8 = 3;
pub const BUCKET_COUNT: usize = 8;

/// 12-hour clock label: `0 → "12 AM"`, `13 → "1 PM"`.
pub fn format_hour(hour: u8) -> String {
    match hour % 24 {
        0 => "12 AM".to_string(),
        h @ 1..=11 => format!("{h} AM"),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}

/// Sums hourly views into eight contiguous 3-hour buckets, ordered from
/// midnight. Hours missing from the input contribute nothing, and for hours
/// in 0..=23 the bucket total equals the input total.
pub fn bucketize_hours(hours: &[HourlyEntry]) -> [PeriodBucket; BUCKET_COUNT] {
    let mut buckets: [PeriodBucket; BUCKET_COUNT] = std::array::from_fn(|i| {
        let index = i as u8;
        let start_hour = index * BUCKET_HOURS;
        PeriodBucket {
            index,
            label: format_hour(start_hour),
            start_hour,
            views: 0,
        }
    });

    for entry in hours {
        match buckets.get_mut(usize::from(entry.hour / BUCKET_HOURS)) {
            Some(bucket) => bucket.views += entry.views,
            None => warn!(hour = entry.hour, "Hour outside 0..=23 skipped"),
        }
    }

    buckets
}

/// Rebuilds the backend's four-way day-part split from hourly entries, in
/// [`DayPart::ALL`] order. Parts with no views are omitted, matching the
/// backend's summary.
pub fn day_part_shares(hours: &[HourlyEntry]) -> Vec<DayPartShare> {
    let total: u64 = hours.iter().map(|h| h.views).sum();

    DayPart::ALL
        .iter()
        .filter_map(|&part| {
            let in_part: Vec<&HourlyEntry> = hours
                .iter()
                .filter(|h| DayPart::from_hour(h.hour) == part)
                .collect();
            if in_part.is_empty() {
                return None;
            }

            let views = in_part.iter().map(|h| h.views).sum();
            Some(DayPartShare {
                period: part,
                views,
                percentage: pct(views, total),
                unique_users: 0,
            })
        })
        .collect()
}
