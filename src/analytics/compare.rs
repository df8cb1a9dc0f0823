//! Period-over-period comparison
//!
//! Pairs two revenue summaries and computes absolute and percent
//! change. Percent change against an empty previous period is
//! +infinity when the current period has revenue, zero when both are
//! empty; division never fails.

use chrono::NaiveDate;

use super::bucket::format_date;
use super::{ComparisonResult, PeriodDelta, PeriodRevenue, RevenueSummary};

/// Percent change from `previous` to `current`
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous > 0.0 {
        ((current - previous) / previous) * 100.0
    } else if current > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Derive the previous window when the caller did not supply one:
/// an immediately preceding window of identical length
pub fn default_previous_window(
    current_start: NaiveDate,
    current_end: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let duration_days = (current_end - current_start).num_days() + 1;
    let previous_end = current_start - chrono::Duration::days(1);
    let previous_start = previous_end - chrono::Duration::days(duration_days - 1);
    (previous_start, previous_end)
}

/// Fill in whichever previous bounds the caller omitted
pub fn resolve_previous_window(
    current_start: NaiveDate,
    current_end: NaiveDate,
    previous_start: Option<NaiveDate>,
    previous_end: Option<NaiveDate>,
) -> (NaiveDate, NaiveDate) {
    match (previous_start, previous_end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            let duration_days = (current_end - current_start).num_days() + 1;
            let end = previous_end.unwrap_or(current_start - chrono::Duration::days(1));
            let start =
                previous_start.unwrap_or(end - chrono::Duration::days(duration_days - 1));
            (start, end)
        }
    }
}

/// Attach window bounds to a revenue summary
pub fn period_revenue(
    start: NaiveDate,
    end: NaiveDate,
    summary: RevenueSummary,
) -> PeriodRevenue {
    PeriodRevenue {
        start_date: format_date(start),
        end_date: format_date(end),
        total_revenue: summary.total_revenue,
        revenue_by_period: summary.revenue_by_period,
    }
}

/// Compose the two period summaries and their comparison block
pub fn build_comparison(current: PeriodRevenue, previous: PeriodRevenue) -> ComparisonResult {
    let comparison = PeriodDelta {
        absolute_change: current.total_revenue - previous.total_revenue,
        percent_change: percent_change(previous.total_revenue, current.total_revenue),
    };

    ComparisonResult {
        current_period: current,
        previous_period: previous,
        comparison,
    }
}
