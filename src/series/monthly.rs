use tracing::warn;

use crate::contracts::MonthlyAggregate;
use crate::series::types::MonthlyPoint;

/// Zips the monthly parallel arrays into points. Months are already
/// contiguous, so no alignment happens; short `views`/`users` arrays read as 0.
pub fn monthly_series(monthly: &MonthlyAggregate) -> Vec<MonthlyPoint> {
    let months = monthly.months.len();
    if monthly.views.len() != months || monthly.users.len() != months {
        warn!(
            months,
            views = monthly.views.len(),
            users = monthly.users.len(),
            "Monthly aggregate arrays differ in length"
        );
    }

    monthly
        .months
        .iter()
        .enumerate()
        .map(|(i, month)| MonthlyPoint {
            month: month.clone(),
            views: monthly.views.get(i).copied().unwrap_or_default(),
            users: monthly.users.get(i).copied().unwrap_or_default(),
        })
        .collect()
}
