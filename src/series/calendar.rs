//! Calendar-aligned weekly timeline.
//!
//! The backend only reports weeks that had activity. The timeline chart needs
//! every week between the selected start and end dates, so the sparse
//! aggregate is overlaid onto a zero-filled template.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::contracts::{SuppliedRange, WeeklyAggregate, WeeklyAggregateEntry};
use crate::series::types::CalendarWeekSlot;

/// Number of week slots for an inclusive date range:
/// `ceil(days / 7) + 1`. `None` when `end` is before `start`.
pub fn total_weeks(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    let days = (end - start).num_days();
    if days < 0 {
        return None;
    }
    u32::try_from((days + 6) / 7 + 1).ok()
}

/// Renders an inclusive range as `"Jan 1 - Jan 7"`.
pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%b %-d"), end.format("%b %-d"))
}

/// First and last day of slot `week_num` (1-based).
pub fn week_bounds(start: NaiveDate, week_num: u32) -> (NaiveDate, NaiveDate) {
    let first = start + Duration::days((i64::from(week_num) - 1) * 7);
    (first, first + Duration::days(6))
}

fn supplied_label(range: &SuppliedRange) -> Option<String> {
    match range {
        SuppliedRange::Label(label) if label.trim().is_empty() => None,
        SuppliedRange::Label(label) => Some(label.clone()),
        SuppliedRange::Span(first, last) => Some(format_range(*first, *last)),
    }
}

/// Produces one slot per calendar week from `start` to `end`, filling weeks
/// the aggregate does not mention with zeros.
pub fn align_calendar_weeks(
    start: NaiveDate,
    end: NaiveDate,
    weekly: &WeeklyAggregate,
) -> Vec<CalendarWeekSlot> {
    let Some(total) = total_weeks(start, end) else {
        warn!(%start, %end, "End date precedes start date, no calendar weeks");
        return Vec::new();
    };

    let mut reported: HashMap<u32, WeeklyAggregateEntry<'_>> = HashMap::new();
    for entry in weekly.entries() {
        if entry.week == 0 || entry.week > total {
            debug!(week = entry.week, total, "Aggregate week outside selected range");
            continue;
        }
        reported.insert(entry.week, entry);
    }

    (1..=total)
        .map(|week_num| {
            let (first, last) = week_bounds(start, week_num);
            let computed = || format_range(first, last);

            match reported.get(&week_num) {
                Some(entry) => CalendarWeekSlot {
                    week_num,
                    date_range: entry
                        .date_range
                        .and_then(supplied_label)
                        .unwrap_or_else(computed),
                    views: entry.views,
                    users: entry.users,
                    pct_change: entry.pct_change,
                },
                None => CalendarWeekSlot {
                    week_num,
                    date_range: computed(),
                    views: 0,
                    users: 0.0,
                    pct_change: 0.0,
                },
            }
        })
        .collect()
}
