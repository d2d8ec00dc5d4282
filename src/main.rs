//! CLI entry point for the engagement series tool.
//!
//! Loads backend documents from files or the dashboard backend and emits the
//! chart-ready series: single-student weeks, two-student comparisons, the
//! calendar timeline, hourly buckets and participation tables.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use engagement_series::config::Config;
use engagement_series::contracts::{
    CourseListing, CourseSummaryResponse, DayPartShare, DetailedActivityResponse,
    ParticipationResponse, StudentListing, WeeklyRecord,
};
use engagement_series::fetch::{BasicClient, Source, load_json};
use engagement_series::output::{print_json, print_pretty, write_json};
use engagement_series::selection::{Dashboard, DashboardInput, Selection};
use engagement_series::series::{
    SeriesSummary, align_calendar_weeks, bucketize_hours, compare_selection, day_part_shares,
    extract_week_series, group_participations, monthly_series, ordinal,
};
use engagement_series::series::types::{CalendarWeekSlot, MonthlyPoint, PeriodBucket};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "engagement_series")]
#[command(about = "Chart-ready engagement series from dashboard backend data", long_about = None)]
struct Cli {
    /// Write the JSON result to this file instead of logging it
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List courses
    Courses {
        #[arg(value_name = "FILE_OR_URL", default_value = "/api/courses")]
        source: String,
    },
    /// List students of a course
    Students {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Week-by-week series for one student
    Weekly {
        /// Detailed weekly activity response or a bare student record
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Student to pick when the response holds several records
        #[arg(short, long)]
        student: Option<String>,
    },
    /// Side-by-side week series for two students
    Compare {
        /// Detailed weekly activity response holding exactly two records
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Calendar weeks, months and hourly buckets for a course summary
    Timeline {
        /// Course summary response
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
    /// Assignment participation grouped by module
    Participations {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Everything the dashboard shows for one selection
    Dashboard {
        /// Detailed weekly activity response
        #[arg(long, value_name = "FILE_OR_URL")]
        records: String,

        /// Course summary response
        #[arg(long, value_name = "FILE_OR_URL")]
        summary: Option<String>,

        #[arg(long, default_value = "")]
        course: String,

        /// Comma-separated student ids, in selection order
        #[arg(long, value_delimiter = ',')]
        students: Vec<String>,

        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,

        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
    /// Format a rank as an ordinal label
    Rank {
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = Path::new(&config.log_file_path);
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("engagement_series.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let client = BasicClient::new(config.http_timeout)?;
    let resolve = |source: &str| Source::resolve(source, &config.backend_url);

    match cli.command {
        Commands::Courses { source } => {
            let listing: CourseListing = load_json(&client, &resolve(&source)).await?;
            info!(total = listing.courses.len(), "Courses loaded");
            emit(&listing.courses, cli.output.as_deref())?;
        }
        Commands::Students { source } => {
            let listing: StudentListing = load_json(&client, &resolve(&source)).await?;
            info!(total = listing.students.len(), "Students loaded");
            emit(&listing.students, cli.output.as_deref())?;
        }
        Commands::Weekly { source, student } => {
            let records = load_records(&client, &resolve(&source)).await?;
            let record = match &student {
                Some(id) => records.iter().find(|r| &r.student_id == id),
                None => records.first(),
            }
            .context("no matching student record in document")?;

            let weeks = extract_week_series(record);
            let summary = SeriesSummary::from_points(&weeks);
            info!(
                student_id = %record.student_id,
                weeks = summary.weeks,
                total_views = summary.total_views,
                peak_week = ?summary.peak_week,
                "Week series extracted"
            );
            if record.last_week() > Some(record.contiguous_weeks()) {
                warn!(
                    student_id = %record.student_id,
                    contiguous = record.contiguous_weeks(),
                    last = ?record.last_week(),
                    "Record has weeks past a gap; they are not part of the series"
                );
            }
            if let Some(best) = summary.best_rank {
                info!(best_rank = %ordinal(i64::from(best))?, "Best weekly rank");
            }

            emit(&weeks, cli.output.as_deref())?;
        }
        Commands::Compare { source } => {
            let records = load_records(&client, &resolve(&source)).await?;
            if records.len() != 2 {
                warn!(records = records.len(), "Comparison needs exactly two student records");
            }
            let rows = compare_selection(&records);
            info!(rows = rows.len(), "Comparison aligned");
            emit(&rows, cli.output.as_deref())?;
        }
        Commands::Timeline { source, start, end } => {
            let response: CourseSummaryResponse = load_json(&client, &resolve(&source)).await?;
            let chart = &response.data;

            let timeline = Timeline {
                weeks: align_calendar_weeks(start, end, &chart.weekly),
                months: monthly_series(&chart.monthly),
                hourly: bucketize_hours(&chart.hourly.hours).to_vec(),
                day_parts: if chart.hourly.periods.is_empty() {
                    day_part_shares(&chart.hourly.hours)
                } else {
                    chart.hourly.periods.clone()
                },
            };
            info!(
                weeks = timeline.weeks.len(),
                months = timeline.months.len(),
                "Timeline aligned"
            );
            emit(&timeline, cli.output.as_deref())?;
        }
        Commands::Participations { source } => {
            let response: ParticipationResponse = load_json(&client, &resolve(&source)).await?;
            let modules = group_participations(&response.summary);
            info!(modules = modules.len(), "Participations grouped");
            emit(&modules, cli.output.as_deref())?;
        }
        Commands::Dashboard {
            records,
            summary,
            course,
            students,
            start,
            end,
        } => {
            let mut selection = Selection::course(course).with_students(students);
            if let (Some(start), Some(end)) = (start, end) {
                selection = selection.with_range(start, end);
            }

            let chart = match summary {
                Some(source) => {
                    let response: CourseSummaryResponse =
                        load_json(&client, &resolve(&source)).await?;
                    response.data
                }
                None => Default::default(),
            };
            let input = DashboardInput {
                records: load_records(&client, &resolve(&records)).await?,
                chart,
            };

            let view = Dashboard::build(&selection, &input);
            print_pretty(&view);
            info!(
                students = view.students.len(),
                comparison_rows = view.comparison.len(),
                calendar_weeks = view.calendar_weeks.len(),
                "Dashboard built"
            );
            emit(&view, cli.output.as_deref())?;
        }
        Commands::Rank { value } => {
            info!(label = %ordinal(value)?, "Rank");
        }
    }

    Ok(())
}

/// Course-level series for the timeline view.
#[derive(Serialize)]
struct Timeline {
    weeks: Vec<CalendarWeekSlot>,
    months: Vec<MonthlyPoint>,
    hourly: Vec<PeriodBucket>,
    day_parts: Vec<DayPartShare>,
}

/// Loads student records from either a detailed-activity response or a bare
/// record object.
#[tracing::instrument(skip(client))]
async fn load_records(client: &BasicClient, source: &Source) -> Result<Vec<WeeklyRecord>> {
    let value: Value = load_json(client, source).await?;

    let records = if value.get("data").is_some() {
        let response: DetailedActivityResponse = serde_json::from_value(value)?;
        if !response.success {
            warn!("Backend reported an unsuccessful response");
        }
        response.data
    } else {
        vec![serde_json::from_value(value)?]
    };

    info!(records = records.len(), "Student records loaded");
    Ok(records)
}

/// Writes the result to `output` when given, otherwise logs it as JSON.
fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_json(path, value)?;
            info!(path = %path.display(), "Result written");
            Ok(())
        }
        None => print_json(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engagement_series::contracts::Course;
    use std::env;
    use std::fs;

    #[test]
    fn test_emit_writes_course_listing() {
        let listing: CourseListing = serde_json::from_str(
            r#"{"courses": [{"course_id": 12, "name": "Algebra"}, {"course_id": "13"}]}"#,
        )
        .unwrap();
        let path = env::temp_dir().join("engagement_series_test_courses.json");

        emit(&listing.courses, Some(path.as_path())).unwrap();

        let written: Vec<Course> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, listing.courses);
        assert_eq!(written[0].course_id, "12");

        fs::remove_file(&path).unwrap();
    }
}
