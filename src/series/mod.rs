//! Time-series normalization for the engagement dashboard.
//!
//! Every function here is a pure transformation from a backend contract
//! snapshot to chart-ready values: week series for one or two students,
//! calendar-aligned course weeks, hourly buckets, and rank labels.

pub mod calendar;
pub mod comparison;
pub mod daily;
pub mod hourly;
pub mod monthly;
pub mod ordinal;
pub mod participation;
pub mod types;
pub mod utility;
pub mod week_series;

pub use calendar::align_calendar_weeks;
pub use comparison::{StopPolicy, align_pair, align_pair_with, compare_selection};
pub use hourly::{bucketize_hours, day_part_shares, format_hour};
pub use monthly::monthly_series;
pub use ordinal::{ordinal, ordinal_suffix};
pub use participation::group_participations;
pub use week_series::{SeriesSummary, extract_week_series};
