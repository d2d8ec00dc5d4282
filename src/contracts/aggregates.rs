//! Course-level aggregate contracts: hourly, weekly, monthly and daily
//! series as sent by the course summary endpoint.
//!
//! The weekly, monthly and daily aggregates are parallel arrays indexed
//! positionally. Length mismatches are logged and the short arrays are padded
//! with defaults when read.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{Lenient, coerce_field, coerce_records, coerce_seq, section};
use crate::error::SeriesError;

/// The backend's coarse four-way split of the day.
///
/// Distinct from the client-side 3-hour
/// [`PeriodBucket`](crate::series::types::PeriodBucket): day parts answer
/// "when in the day", buckets drive the fine-grained hourly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    /// Presentation order used by the backend.
    pub const ALL: [DayPart; 4] = [
        DayPart::Morning,
        DayPart::Afternoon,
        DayPart::Evening,
        DayPart::Night,
    ];

    /// | Hours   | Part      |
    /// |---------|-----------|
    /// | 5–11    | Morning   |
    /// | 12–16   | Afternoon |
    /// | 17–21   | Evening   |
    /// | 22–4    | Night     |
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            5..=11 => DayPart::Morning,
            12..=16 => DayPart::Afternoon,
            17..=21 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayPart::Morning => "Morning",
            DayPart::Afternoon => "Afternoon",
            DayPart::Evening => "Evening",
            DayPart::Night => "Night",
        }
    }
}

impl fmt::Display for DayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Views and share for one backend day part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPartShare {
    pub period: DayPart,
    pub views: u64,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub unique_users: u64,
}

#[derive(Deserialize)]
struct RawHourlyEntry {
    hour: i64,
    #[serde(default)]
    views: Value,
    #[serde(default)]
    formatted_hour: Option<String>,
    #[serde(default)]
    percentage: Option<f64>,
    #[serde(default)]
    avg_daily_views: Option<f64>,
}

/// Page views for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHourlyEntry")]
pub struct HourlyEntry {
    pub hour: u8,
    pub views: u64,
    pub formatted_hour: Option<String>,
    pub percentage: Option<f64>,
    pub avg_daily_views: Option<f64>,
}

impl HourlyEntry {
    pub fn new(hour: u8, views: u64) -> Self {
        HourlyEntry {
            hour,
            views,
            formatted_hour: None,
            percentage: None,
            avg_daily_views: None,
        }
    }
}

impl TryFrom<RawHourlyEntry> for HourlyEntry {
    type Error = SeriesError;

    fn try_from(raw: RawHourlyEntry) -> Result<Self, Self::Error> {
        let hour = u8::try_from(raw.hour)
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| SeriesError::Malformed(format!("hour {} outside 0..=23", raw.hour)))?;

        Ok(HourlyEntry {
            hour,
            views: coerce_field("views", Some(&raw.views)),
            formatted_hour: raw.formatted_hour,
            percentage: raw.percentage,
            avg_daily_views: raw.avg_daily_views,
        })
    }
}

#[derive(Deserialize)]
struct RawHourlyAggregate {
    #[serde(default, alias = "hourly_data")]
    hours: Value,
    #[serde(default, alias = "period_summary")]
    periods: Value,
}

/// Hourly breakdown plus the backend's own day-part summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawHourlyAggregate")]
pub struct HourlyAggregate {
    pub hours: Vec<HourlyEntry>,
    pub periods: Vec<DayPartShare>,
}

impl From<RawHourlyAggregate> for HourlyAggregate {
    fn from(raw: RawHourlyAggregate) -> Self {
        HourlyAggregate {
            hours: coerce_records("hours", raw.hours),
            periods: coerce_records("periods", raw.periods),
        }
    }
}

/// A date range label supplied by the backend for a week.
#[derive(Debug, Clone, PartialEq)]
pub enum SuppliedRange {
    /// Already formatted for display.
    Label(String),
    /// Inclusive `[start, end]` ISO dates.
    Span(NaiveDate, NaiveDate),
}

impl Lenient for SuppliedRange {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(SuppliedRange::Label(s.clone())),
            Value::Array(items) if items.len() == 2 => {
                let parse = |v: &Value| {
                    v.as_str()
                        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                };
                Some(SuppliedRange::Span(parse(&items[0])?, parse(&items[1])?))
            }
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawWeeklyAggregate {
    #[serde(default)]
    weeks: Value,
    #[serde(default)]
    views: Value,
    #[serde(default)]
    avg_users: Value,
    #[serde(default)]
    view_change: Value,
    #[serde(default)]
    date_ranges: Value,
}

/// Sparse named-week aggregate: parallel arrays indexed positionally.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawWeeklyAggregate")]
pub struct WeeklyAggregate {
    pub weeks: Vec<u32>,
    pub views: Vec<u64>,
    pub avg_users: Vec<f64>,
    pub view_change: Vec<f64>,
    pub date_ranges: Vec<Option<SuppliedRange>>,
}

/// One positional entry of a [`WeeklyAggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAggregateEntry<'a> {
    pub week: u32,
    pub views: u64,
    pub users: f64,
    pub pct_change: f64,
    pub date_range: Option<&'a SuppliedRange>,
}

impl WeeklyAggregate {
    /// Zips the parallel arrays; `weeks` drives the length.
    pub fn entries(&self) -> impl Iterator<Item = WeeklyAggregateEntry<'_>> {
        self.weeks.iter().enumerate().map(|(i, &week)| WeeklyAggregateEntry {
            week,
            views: self.views.get(i).copied().unwrap_or_default(),
            users: self.avg_users.get(i).copied().unwrap_or_default(),
            pct_change: self.view_change.get(i).copied().unwrap_or_default(),
            date_range: self.date_ranges.get(i).and_then(Option::as_ref),
        })
    }
}

impl From<RawWeeklyAggregate> for WeeklyAggregate {
    fn from(raw: RawWeeklyAggregate) -> Self {
        let aggregate = WeeklyAggregate {
            weeks: coerce_seq("weeks", &raw.weeks),
            views: coerce_seq("views", &raw.views),
            avg_users: coerce_seq("avg_users", &raw.avg_users),
            view_change: coerce_seq("view_change", &raw.view_change),
            date_ranges: coerce_seq("date_ranges", &raw.date_ranges),
        };

        let expected = aggregate.weeks.len();
        for (field, len) in [
            ("views", aggregate.views.len()),
            ("avg_users", aggregate.avg_users.len()),
            ("view_change", aggregate.view_change.len()),
        ] {
            if len != expected {
                warn!(field, len, expected, "Weekly aggregate arrays differ in length");
            }
        }

        aggregate
    }
}

#[derive(Deserialize)]
struct RawMonthlyAggregate {
    #[serde(default)]
    months: Value,
    #[serde(default, alias = "views_by_month")]
    views: Value,
    #[serde(default, alias = "users_by_month")]
    users: Value,
}

/// Month-level totals, assumed contiguous and complete.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawMonthlyAggregate")]
pub struct MonthlyAggregate {
    pub months: Vec<String>,
    pub views: Vec<u64>,
    pub users: Vec<u64>,
}

impl From<RawMonthlyAggregate> for MonthlyAggregate {
    fn from(raw: RawMonthlyAggregate) -> Self {
        MonthlyAggregate {
            months: coerce_seq("months", &raw.months),
            views: coerce_seq("views", &raw.views),
            users: coerce_seq("users", &raw.users),
        }
    }
}

#[derive(Deserialize)]
struct RawDailyAggregate {
    #[serde(default)]
    dates: Value,
    #[serde(default)]
    views: Value,
}

/// Per-day totals over the selected date range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawDailyAggregate")]
pub struct DailyAggregate {
    pub dates: Vec<String>,
    pub views: Vec<u64>,
}

impl From<RawDailyAggregate> for DailyAggregate {
    fn from(raw: RawDailyAggregate) -> Self {
        DailyAggregate {
            dates: coerce_seq("dates", &raw.dates),
            views: coerce_seq("views", &raw.views),
        }
    }
}

/// The chart payload of a course summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartData {
    #[serde(default, deserialize_with = "section")]
    pub daily: DailyAggregate,
    #[serde(default, deserialize_with = "section")]
    pub weekly: WeeklyAggregate,
    #[serde(default, deserialize_with = "section")]
    pub monthly: MonthlyAggregate,
    #[serde(default, deserialize_with = "section")]
    pub hourly: HourlyAggregate,
}

/// Response of `/api/course-summary`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CourseSummaryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub summary: String,
    #[serde(default, deserialize_with = "section")]
    pub data: ChartData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_day_part_boundaries() {
        assert_eq!(DayPart::from_hour(4), DayPart::Night);
        assert_eq!(DayPart::from_hour(5), DayPart::Morning);
        assert_eq!(DayPart::from_hour(11), DayPart::Morning);
        assert_eq!(DayPart::from_hour(12), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(16), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(17), DayPart::Evening);
        assert_eq!(DayPart::from_hour(21), DayPart::Evening);
        assert_eq!(DayPart::from_hour(22), DayPart::Night);
        assert_eq!(DayPart::from_hour(0), DayPart::Night);
    }

    #[test]
    fn test_hourly_drops_out_of_range_hours() {
        let hourly: HourlyAggregate = serde_json::from_value(json!({
            "hours": [
                {"hour": 9, "views": 40, "formatted_hour": "9 AM", "percentage": 20.0},
                {"hour": 24, "views": 5},
                {"hour": -1, "views": 5},
                {"views": 5}
            ],
            "periods": [
                {"period": "Morning", "views": 40, "percentage": 100.0},
                {"period": "Brunch", "views": 1, "percentage": 0.0}
            ]
        }))
        .unwrap();

        assert_eq!(hourly.hours.len(), 1);
        assert_eq!(hourly.hours[0].hour, 9);
        assert_eq!(hourly.hours[0].formatted_hour.as_deref(), Some("9 AM"));
        assert_eq!(hourly.periods.len(), 1);
        assert_eq!(hourly.periods[0].period, DayPart::Morning);
    }

    #[test]
    fn test_hourly_accepts_backend_key_names() {
        let hourly: HourlyAggregate = serde_json::from_value(json!({
            "hourly_data": [{"hour": 1, "views": 2}],
            "period_summary": []
        }))
        .unwrap();
        assert_eq!(hourly.hours, vec![HourlyEntry::new(1, 2)]);
    }

    #[test]
    fn test_weekly_date_ranges_accept_labels_and_spans() {
        let weekly: WeeklyAggregate = serde_json::from_value(json!({
            "weeks": [1, 2, 3],
            "views": [10, 20, 30],
            "avg_users": [1.5, 2.0, 2.5],
            "view_change": [0.0, 100.0, 50.0],
            "date_ranges": ["Custom", ["2024-01-08", "2024-01-14"], 5]
        }))
        .unwrap();

        assert_eq!(
            weekly.date_ranges,
            vec![
                Some(SuppliedRange::Label("Custom".to_string())),
                Some(SuppliedRange::Span(
                    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
                )),
                None,
            ]
        );
    }

    #[test]
    fn test_weekly_entries_pad_short_arrays() {
        let weekly: WeeklyAggregate = serde_json::from_value(json!({
            "weeks": [1, 2],
            "views": [10],
            "avg_users": "oops"
        }))
        .unwrap();

        let entries: Vec<_> = weekly.entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].views, 10);
        assert_eq!(entries[1].views, 0);
        assert_eq!(entries[1].users, 0.0);
        assert_eq!(entries[1].date_range, None);
    }

    #[test]
    fn test_monthly_accepts_backend_aliases() {
        let monthly: MonthlyAggregate = serde_json::from_value(json!({
            "months": ["January", "February"],
            "views_by_month": [100, 80],
            "users_by_month": [12, 10]
        }))
        .unwrap();
        assert_eq!(monthly.views, vec![100, 80]);
        assert_eq!(monthly.users, vec![12, 10]);
    }

    #[test]
    fn test_course_summary_defaults_missing_sections() {
        let response: CourseSummaryResponse =
            serde_json::from_value(json!({"success": true, "summary": "ok"})).unwrap();
        assert!(response.success);
        assert_eq!(response.data, ChartData::default());
    }

    #[test]
    fn test_course_summary_null_data_is_default() {
        let response: CourseSummaryResponse =
            serde_json::from_value(json!({"success": true, "data": null})).unwrap();
        assert_eq!(response.data, ChartData::default());
    }

    #[test]
    fn test_wrongly_shaped_sections_default_without_failing() {
        let response: CourseSummaryResponse = serde_json::from_value(json!({
            "success": true,
            "data": {
                "weekly": null,
                "hourly": [],
                "monthly": "n/a",
                "daily": {"dates": ["2024-01-02"], "views": [3]}
            }
        }))
        .unwrap();

        assert_eq!(response.data.weekly, WeeklyAggregate::default());
        assert_eq!(response.data.hourly, HourlyAggregate::default());
        assert_eq!(response.data.monthly, MonthlyAggregate::default());
        assert_eq!(response.data.daily.views, vec![3]);
    }

    #[test]
    fn test_malformed_hourly_views_read_as_zero() {
        let hourly: HourlyAggregate = serde_json::from_value(json!({
            "hours": [{"hour": 3, "views": "many"}, {"hour": 4}, {"hour": 5, "views": 6}]
        }))
        .unwrap();

        assert_eq!(hourly.hours.len(), 3);
        assert_eq!(hourly.hours[0].views, 0);
        assert_eq!(hourly.hours[1].views, 0);
        assert_eq!(hourly.hours[2].views, 6);
    }
}
