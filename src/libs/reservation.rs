//! Reservation records as read from the store.
//!
//! The core never mutates a reservation. Joined data (customer, course,
//! area, add-on options) arrives as explicit optional fields rather than
//! loosely shaped nested objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ReservationId = i64;
pub type CastId = i64;
pub type StoreId = i64;

/// Booking lifecycle. Transitions only move forward; the caller enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::InProgress => "in_progress",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "in_progress" => Ok(ReservationStatus::InProgress),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub id: i64,
    pub name: String,
    /// Minutes.
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRef {
    pub id: i64,
    pub name: String,
}

/// Catalogue entry an add-on option points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRef {
    pub name: String,
    pub price: i64,
}

/// An add-on selected on a reservation.
///
/// `option` is the joined catalogue row; `name`/`price` are the copies taken
/// at booking time and are used when the join is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOption {
    pub option_id: Option<i64>,
    pub option: Option<OptionRef>,
    pub name: Option<String>,
    pub price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub store_id: StoreId,
    pub cast_id: CastId,
    pub customer: Option<CustomerRef>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub price: i64,
    pub staff_revenue: Option<i64>,
    pub store_revenue: Option<i64>,
    pub welfare_expense: Option<i64>,
    pub designation_fee: Option<i64>,
    pub transportation_fee: Option<i64>,
    pub additional_fee: Option<i64>,
    pub discount: Option<i64>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub course: Option<CourseRef>,
    pub options: Vec<SelectedOption>,
    pub location_memo: Option<String>,
    pub area: Option<AreaRef>,
}

impl Reservation {
    /// Checked out and marked completed. Anything else is still open.
    pub fn is_settled(&self) -> bool {
        is_settled(self.check_out_at, self.status)
    }
}

pub(crate) fn is_settled(check_out_at: Option<DateTime<Utc>>, status: ReservationStatus) -> bool {
    check_out_at.is_some() && status == ReservationStatus::Completed
}

/// Reduced month row used by the dashboard fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthReservationSummary {
    pub start_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub staff_revenue: Option<i64>,
    pub welfare_expense: Option<i64>,
    pub check_out_at: Option<DateTime<Utc>>,
}

impl MonthReservationSummary {
    pub fn is_settled(&self) -> bool {
        is_settled(self.check_out_at, self.status)
    }
}

impl From<&Reservation> for MonthReservationSummary {
    fn from(reservation: &Reservation) -> Self {
        Self {
            start_time: reservation.start_time,
            status: reservation.status,
            staff_revenue: reservation.staff_revenue,
            welfare_expense: reservation.welfare_expense,
            check_out_at: reservation.check_out_at,
        }
    }
}

/// Input for the booking write path.
#[derive(Debug, Clone, Default)]
pub struct NewReservation {
    pub store_id: StoreId,
    pub cast_id: CastId,
    pub customer_id: Option<i64>,
    pub course_id: Option<i64>,
    pub area_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: Option<ReservationStatus>,
    pub price: i64,
    pub staff_revenue: Option<i64>,
    pub store_revenue: Option<i64>,
    pub welfare_expense: Option<i64>,
    pub designation_fee: Option<i64>,
    pub transportation_fee: Option<i64>,
    pub additional_fee: Option<i64>,
    pub discount: Option<i64>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub location_memo: Option<String>,
    /// `(catalogue id, name copy, price copy)`
    pub options: Vec<(Option<i64>, String, i64)>,
}
