//! Dashboard statistics for one cast member.
//!
//! A pure fold over already-fetched rows. `pending_requests` is left at
//! zero here; the caller fills it from the attendance request count.

use crate::libs::reservation::{MonthReservationSummary, Reservation};
use crate::libs::time_window::TimeWindow;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_count: u32,
    pub completed_today: u32,
    pub upcoming_count: u32,
    pub today_revenue: i64,
    pub month_revenue: i64,
    pub welfare_this_month: i64,
    pub pending_count: u32,
    pub pending_requests: u32,
}

impl DashboardStats {
    pub fn with_pending_requests(mut self, pending_requests: u32) -> Self {
        self.pending_requests = pending_requests;
        self
    }
}

#[derive(Default)]
struct MonthTotals {
    revenue: i64,
    welfare: i64,
    pending: u32,
}

/// Single pass over the month; rows outside `month` are skipped so the
/// totals always match the window boundaries.
fn fold_month(month: &[MonthReservationSummary], window: &TimeWindow) -> MonthTotals {
    month
        .iter()
        .filter(|r| window.contains(r.start_time))
        .fold(MonthTotals::default(), |mut acc, r| {
            acc.revenue += r.staff_revenue.unwrap_or(0);
            acc.welfare += r.welfare_expense.unwrap_or(0);
            if !r.is_settled() {
                acc.pending += 1;
            }
            acc
        })
}

pub fn aggregate_dashboard(
    today: &[Reservation],
    upcoming: &[Reservation],
    month: &[MonthReservationSummary],
    month_window: &TimeWindow,
) -> DashboardStats {
    let totals = fold_month(month, month_window);

    DashboardStats {
        today_count: today.len() as u32,
        completed_today: today.iter().filter(|r| r.check_out_at.is_some()).count() as u32,
        upcoming_count: upcoming.len() as u32,
        today_revenue: today.iter().map(|r| r.staff_revenue.unwrap_or(0)).sum(),
        month_revenue: totals.revenue,
        welfare_this_month: totals.welfare,
        pending_count: totals.pending,
        pending_requests: 0,
    }
}
