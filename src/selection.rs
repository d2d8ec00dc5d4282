//! Explicit selection state and the dashboard composer.
//!
//! A [`Selection`] names the course, students and date range being viewed.
//! [`Dashboard::build`] runs every transformation for that selection over a
//! snapshot of backend documents and returns a fresh [`DashboardView`].
//! Nothing is cached: a new selection means a new build.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::contracts::{ChartData, DayPartShare, GapSummary, TimeOfDayShares, WeeklyRecord};
use crate::series::daily::{bottom_days, top_days};
use crate::series::types::{
    CalendarWeekSlot, ComparisonRow, DailyHighlight, MonthlyPoint, PeriodBucket, WeekPoint,
};
use crate::series::{
    SeriesSummary, align_calendar_weeks, align_pair, bucketize_hours, day_part_shares,
    extract_week_series, monthly_series,
};

/// Days shown in each of the most/least active lists.
pub const HIGHLIGHT_DAYS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub course_id: String,
    /// Selected students in selection order. Empty means every record.
    pub student_ids: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Selection {
    pub fn course(course_id: impl Into<String>) -> Self {
        Selection {
            course_id: course_id.into(),
            ..Default::default()
        }
    }

    pub fn with_students<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.student_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Records for the selected students, in selection order.
    pub fn pick<'a>(&self, records: &'a [WeeklyRecord]) -> Vec<&'a WeeklyRecord> {
        if self.student_ids.is_empty() {
            return records.iter().collect();
        }
        self.student_ids
            .iter()
            .filter_map(|id| {
                let found = records.iter().find(|r| &r.student_id == id);
                if found.is_none() {
                    debug!(student_id = %id, "Selected student has no record");
                }
                found
            })
            .collect()
    }
}

/// Backend documents fetched for the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardInput {
    pub records: Vec<WeeklyRecord>,
    pub chart: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentView {
    pub student_id: String,
    pub weeks: Vec<WeekPoint>,
    pub summary: SeriesSummary,
    pub time_of_day: TimeOfDayShares,
    pub gaps: GapSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub course_id: String,
    pub students: Vec<StudentView>,
    /// Populated only when exactly two students are selected.
    pub comparison: Vec<ComparisonRow>,
    /// Empty unless the selection has a date range.
    pub calendar_weeks: Vec<CalendarWeekSlot>,
    pub monthly: Vec<MonthlyPoint>,
    pub hourly_buckets: Vec<PeriodBucket>,
    pub day_parts: Vec<DayPartShare>,
    pub top_days: Vec<DailyHighlight>,
    pub bottom_days: Vec<DailyHighlight>,
}

pub struct Dashboard;

impl Dashboard {
    pub fn build(selection: &Selection, input: &DashboardInput) -> DashboardView {
        let picked = selection.pick(&input.records);

        let students = picked
            .iter()
            .map(|record| {
                let weeks = extract_week_series(record);
                StudentView {
                    student_id: record.student_id.clone(),
                    summary: SeriesSummary::from_points(&weeks),
                    weeks,
                    time_of_day: record.time_of_day,
                    gaps: record.gaps.clone(),
                }
            })
            .collect();

        let comparison = match picked.as_slice() {
            [first, second] => align_pair(first, second),
            _ => {
                debug!(selected = picked.len(), "Comparison needs exactly two students");
                Vec::new()
            }
        };

        let calendar_weeks = match (selection.start_date, selection.end_date) {
            (Some(start), Some(end)) => align_calendar_weeks(start, end, &input.chart.weekly),
            _ => Vec::new(),
        };

        let hourly = &input.chart.hourly;
        let day_parts = if hourly.periods.is_empty() {
            day_part_shares(&hourly.hours)
        } else {
            hourly.periods.clone()
        };

        DashboardView {
            course_id: selection.course_id.clone(),
            students,
            comparison,
            calendar_weeks,
            monthly: monthly_series(&input.chart.monthly),
            hourly_buckets: bucketize_hours(&hourly.hours).to_vec(),
            day_parts,
            top_days: top_days(&input.chart.daily, HIGHLIGHT_DAYS),
            bottom_days: bottom_days(&input.chart.daily, HIGHLIGHT_DAYS),
        }
    }
}
