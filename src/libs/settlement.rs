//! Monthly settlement for one cast member.
//!
//! Folds the month's reservations into revenue and expense totals and a
//! short audit list of the most recent line items. The month boundary comes
//! from [`month_window`](crate::libs::time_window::month_window), the same
//! function the dashboard uses, so both views agree on the period.

use crate::libs::projection::mask_customer_name;
use crate::libs::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::libs::time_window::TimeWindow;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementLineItem {
    pub id: ReservationId,
    pub start_time: DateTime<Utc>,
    pub customer_name: String,
    pub course_name: Option<String>,
    pub status: ReservationStatus,
    pub completed: bool,
    pub price: i64,
    pub staff_revenue: i64,
    pub store_revenue: i64,
    pub welfare_expense: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub period: TimeWindow,
    pub reservation_count: u32,
    pub total_price: i64,
    pub staff_revenue: i64,
    pub store_revenue: i64,
    pub welfare_expense: i64,
    pub completed_count: u32,
    pub pending_count: u32,
    pub items: Vec<SettlementLineItem>,
}

impl SettlementSummary {
    pub fn empty(period: TimeWindow) -> Self {
        Self {
            period,
            reservation_count: 0,
            total_price: 0,
            staff_revenue: 0,
            store_revenue: 0,
            welfare_expense: 0,
            completed_count: 0,
            pending_count: 0,
            items: Vec::new(),
        }
    }
}

fn line_item(reservation: &Reservation) -> SettlementLineItem {
    SettlementLineItem {
        id: reservation.id,
        start_time: reservation.start_time,
        customer_name: mask_customer_name(reservation.customer.as_ref().and_then(|c| c.name.as_deref())),
        course_name: reservation.course.as_ref().map(|c| c.name.clone()),
        status: reservation.status,
        completed: reservation.is_settled(),
        price: reservation.price,
        staff_revenue: reservation.staff_revenue.unwrap_or(0),
        store_revenue: reservation.store_revenue.unwrap_or(0),
        welfare_expense: reservation.welfare_expense.unwrap_or(0),
    }
}

/// `completed_count + pending_count == reservation_count` for every input.
pub fn aggregate_settlement(reservations: &[Reservation], period: &TimeWindow, line_item_limit: usize) -> SettlementSummary {
    let mut in_period: Vec<&Reservation> = reservations.iter().filter(|r| period.contains(r.start_time)).collect();

    let mut summary = in_period.iter().fold(SettlementSummary::empty(*period), |mut acc, r| {
        acc.reservation_count += 1;
        acc.total_price += r.price;
        acc.staff_revenue += r.staff_revenue.unwrap_or(0);
        acc.store_revenue += r.store_revenue.unwrap_or(0);
        acc.welfare_expense += r.welfare_expense.unwrap_or(0);
        if r.is_settled() {
            acc.completed_count += 1;
        } else {
            acc.pending_count += 1;
        }
        acc
    });

    // Most recent first; ties keep a stable order by id.
    in_period.sort_by(|a, b| b.start_time.cmp(&a.start_time).then_with(|| b.id.cmp(&a.id)));
    summary.items = in_period.into_iter().take(line_item_limit).map(line_item).collect();
    summary
}
