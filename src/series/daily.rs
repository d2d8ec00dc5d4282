//! Most and least active days of the selected range.

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::contracts::DailyAggregate;
use crate::series::types::DailyHighlight;

fn short_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%-m/%-d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

fn highlights(daily: &DailyAggregate) -> Vec<DailyHighlight> {
    daily
        .dates
        .iter()
        .enumerate()
        .map(|(i, date)| DailyHighlight {
            date: date.clone(),
            label: short_label(date),
            views: daily.views.get(i).copied().unwrap_or_default(),
        })
        .collect()
}

/// The `n` days with the most views. Ties keep date order.
pub fn top_days(daily: &DailyAggregate, n: usize) -> Vec<DailyHighlight> {
    let mut days = highlights(daily);
    days.sort_by_key(|d| Reverse(d.views));
    days.truncate(n);
    days
}

/// The `n` days with the fewest views. Ties keep date order.
pub fn bottom_days(daily: &DailyAggregate, n: usize) -> Vec<DailyHighlight> {
    let mut days = highlights(daily);
    days.sort_by_key(|d| d.views);
    days.truncate(n);
    days
}
