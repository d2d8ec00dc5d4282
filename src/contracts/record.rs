//! The per-student `WeeklyRecord` contract.
//!
//! The backend sends one flat JSON object per student: fixed scalar fields
//! plus a sparse run of `week_{n}_views`, `week_{n}_rank` and
//! `week_{n}_pct_change` keys. Decoding turns the sparse keys into an ordered
//! map keyed by week number and computes the contiguous run length once.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Lenient, coerce_field, coerce_records};

/// Metrics for one student in one course week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeekMetrics {
    pub views: u64,
    /// Percentile rank within the course; 0 when the backend sent none.
    pub rank: u32,
    pub pct_change: f64,
}

/// Share of page views per backend day part, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeOfDayShares {
    pub morning: f64,
    pub afternoon: f64,
    pub evening: f64,
    pub night: f64,
}

/// Backend-computed inactivity streaks (gaps of 4+ days). Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GapSummary {
    pub total_gaps_4days: u64,
    pub longest_gap_days: u64,
    pub total_gap_days: u64,
    pub first_gap_start: Option<String>,
    pub last_gap_end: Option<String>,
}

/// One student's engagement metrics for a course.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyRecord {
    pub student_id: String,
    pub total_pageviews: u64,
    pub active_days: u64,
    pub total_days: u64,
    pub avg_daily_views: f64,
    pub max_daily_views: u64,
    pub min_daily_views: u64,
    pub time_of_day: TimeOfDayShares,
    pub gaps: GapSummary,
    weeks: BTreeMap<u32, WeekMetrics>,
    contiguous_weeks: u32,
}

impl WeeklyRecord {
    /// Builds a record from already-typed weeks. Scalar fields start at their
    /// defaults.
    pub fn from_weeks(
        student_id: impl Into<String>,
        weeks: impl IntoIterator<Item = (u32, WeekMetrics)>,
    ) -> Self {
        let weeks: BTreeMap<u32, WeekMetrics> =
            weeks.into_iter().filter(|(week, _)| *week >= 1).collect();
        let contiguous_weeks = contiguous_run(&weeks);

        WeeklyRecord {
            student_id: student_id.into(),
            weeks,
            contiguous_weeks,
            ..Default::default()
        }
    }

    /// Decodes a flat backend object. Never fails: malformed fields fall back
    /// to their defaults and are logged.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let get = |key: &str| map.get(key);

        let student_id: String = coerce_field("student_id", get("student_id"));
        if student_id.is_empty() {
            debug!("Weekly record has no student_id");
        }

        let mut record = WeeklyRecord::from_weeks(student_id, decode_weeks(map));

        record.total_pageviews = coerce_field("total_pageviews", get("total_pageviews"));
        record.active_days = coerce_field("active_days", get("active_days"));
        record.total_days = coerce_field("total_days", get("total_days"));
        record.avg_daily_views = coerce_field("avg_daily_views", get("avg_daily_views"));
        record.max_daily_views = coerce_field("max_daily_views", get("max_daily_views"));
        record.min_daily_views = coerce_field("min_daily_views", get("min_daily_views"));

        record.time_of_day = TimeOfDayShares {
            morning: coerce_field("morning_pct", get("morning_pct")),
            afternoon: coerce_field("afternoon_pct", get("afternoon_pct")),
            evening: coerce_field("evening_pct", get("evening_pct")),
            night: coerce_field("night_pct", get("night_pct")),
        };

        record.gaps = GapSummary {
            total_gaps_4days: coerce_field("total_gaps_4days", get("total_gaps_4days")),
            longest_gap_days: coerce_field("longest_gap_days", get("longest_gap_days")),
            total_gap_days: coerce_field("total_gap_days", get("total_gap_days")),
            first_gap_start: coerce_field("first_gap_start", get("first_gap_start")),
            last_gap_end: coerce_field("last_gap_end", get("last_gap_end")),
        };

        record
    }

    /// Number of weeks defined contiguously from week 1.
    pub fn contiguous_weeks(&self) -> u32 {
        self.contiguous_weeks
    }

    /// Highest week index with data, contiguous or not.
    pub fn last_week(&self) -> Option<u32> {
        self.weeks.keys().next_back().copied()
    }

    pub fn week(&self, week: u32) -> Option<&WeekMetrics> {
        self.weeks.get(&week)
    }

    pub fn has_week(&self, week: u32) -> bool {
        self.weeks.contains_key(&week)
    }

    /// All defined weeks in ascending order, including any past a gap.
    pub fn weeks(&self) -> impl Iterator<Item = (u32, &WeekMetrics)> {
        self.weeks.iter().map(|(week, metrics)| (*week, metrics))
    }
}

impl<'de> Deserialize<'de> for WeeklyRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(WeeklyRecord::from_map(&map))
    }
}

/// Response of `/api/detailed-weekly-activity`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetailedActivityResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "records")]
    pub data: Vec<WeeklyRecord>,
}

fn records<'de, D>(deserializer: D) -> Result<Vec<WeeklyRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_records("data", value))
}

fn decode_weeks(map: &Map<String, Value>) -> Vec<(u32, WeekMetrics)> {
    let mut weeks = Vec::new();

    for (key, value) in map {
        let Some(week) = key
            .strip_prefix("week_")
            .and_then(|rest| rest.strip_suffix("_views"))
        else {
            continue;
        };

        let week: u32 = match week.parse() {
            Ok(n) if n >= 1 => n,
            _ => {
                warn!(key = %key, "Ignoring week key with an invalid index");
                continue;
            }
        };

        // A present key keeps the week; only a missing key ends the run.
        let views = match value {
            Value::Null => 0,
            other => u64::from_value(other).unwrap_or_else(|| {
                warn!(key = %key, found = super::kind(other), "Week views are not numeric, using 0");
                0
            }),
        };

        let rank_key = format!("week_{week}_rank");
        let pct_key = format!("week_{week}_pct_change");

        weeks.push((
            week,
            WeekMetrics {
                views,
                rank: coerce_field(&rank_key, map.get(&rank_key)),
                pct_change: coerce_field(&pct_key, map.get(&pct_key)),
            },
        ));
    }

    weeks
}

fn contiguous_run(weeks: &BTreeMap<u32, WeekMetrics>) -> u32 {
    let mut run = 0;
    while weeks.contains_key(&(run + 1)) {
        run += 1;
    }
    run
}
