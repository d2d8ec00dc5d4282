//! Chart-ready output values produced by the series transformations.

use serde::Serialize;

/// One week of a single student's series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekPoint {
    pub week: u32,
    pub views: u64,
    pub rank: u32,
    pub pct_change: f64,
}

/// One side of a [`ComparisonRow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentWeek {
    pub student_id: String,
    pub views: u64,
    pub rank: u32,
}

/// Paired metrics for two students in the same week, zero-filled where a
/// student has no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub week: u32,
    pub first: StudentWeek,
    pub second: StudentWeek,
}

/// A calendar-aligned week on the course timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarWeekSlot {
    pub week_num: u32,
    pub date_range: String,
    pub views: u64,
    pub users: f64,
    pub pct_change: f64,
}

/// Page views summed over three contiguous hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBucket {
    pub index: u8,
    pub label: String,
    pub start_hour: u8,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub views: u64,
    pub users: u64,
}

/// A single day picked out of the daily series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyHighlight {
    pub date: String,
    /// Short `month/day` form for display.
    pub label: String,
    pub views: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentParticipation {
    pub id: String,
    pub title: String,
    pub on_time: u64,
    pub floating: u64,
    pub late: u64,
}

impl AssignmentParticipation {
    pub fn total(&self) -> u64 {
        self.on_time + self.floating + self.late
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleParticipation {
    pub module_id: String,
    pub module_name: String,
    pub assignments: Vec<AssignmentParticipation>,
}
