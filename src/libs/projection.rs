//! Client-facing view of a reservation.
//!
//! [`project`] turns a raw [`Reservation`] plus the current instant into a
//! [`ProjectedReservation`]: duration, masked customer name, flattened
//! add-ons and the two action gates. The gates depend on "now" and are
//! recomputed on every call; nothing is cached.
//!
//! The full customer name never leaves this module. Only its first character
//! followed by [`MASK_SUFFIX`] is emitted.

use crate::libs::config::AttendanceConfig;
use crate::libs::reservation::{Reservation, ReservationId, ReservationStatus, SelectedOption};
use crate::libs::time_window::add_minutes;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shown when the customer has no display name.
pub const CUSTOMER_PLACEHOLDER: &str = "お客様";

/// Appended to the first character of a customer name.
pub const MASK_SUFFIX: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedOption {
    pub id: Option<i64>,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedReservation {
    pub id: ReservationId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: ReservationStatus,
    pub customer_name: String,
    pub course_name: Option<String>,
    pub course_duration: Option<i32>,
    pub options: Vec<ProjectedOption>,
    pub price: i64,
    pub staff_revenue: Option<i64>,
    pub location: Option<String>,
    pub area_name: Option<String>,
    pub designation_fee: Option<i64>,
    pub transportation_fee: Option<i64>,
    pub additional_fee: Option<i64>,
    pub discount: Option<i64>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub can_check_in: bool,
    pub can_check_out: bool,
}

/// `round((end - start) / 60s)`, never negative.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis as f64 / 60_000.0).round() as i64
}

pub fn mask_customer_name(name: Option<&str>) -> String {
    match name.map(str::trim).and_then(|n| n.chars().next()) {
        Some(first) => format!("{}{}", first, MASK_SUFFIX),
        None => CUSTOMER_PLACEHOLDER.to_string(),
    }
}

/// No check-in yet and `start - lead < now < end + grace`.
pub fn can_check_in(reservation: &Reservation, now: DateTime<Utc>, rules: &AttendanceConfig) -> bool {
    reservation.check_in_at.is_none()
        && now > add_minutes(reservation.start_time, -rules.check_in_lead_minutes)
        && now < add_minutes(reservation.end_time, rules.check_in_grace_minutes)
}

/// Checked in, not yet checked out, and the reservation has started.
pub fn can_check_out(reservation: &Reservation, now: DateTime<Utc>) -> bool {
    reservation.check_in_at.is_some() && reservation.check_out_at.is_none() && now > reservation.start_time
}

fn project_option(selected: &SelectedOption) -> ProjectedOption {
    let name = selected
        .option
        .as_ref()
        .map(|o| o.name.clone())
        .or_else(|| selected.name.clone())
        .unwrap_or_default();
    let price = selected.option.as_ref().map(|o| o.price).or(selected.price).unwrap_or(0);
    ProjectedOption {
        id: selected.option_id,
        name,
        price,
    }
}

pub fn project(reservation: &Reservation, now: DateTime<Utc>, rules: &AttendanceConfig) -> ProjectedReservation {
    ProjectedReservation {
        id: reservation.id,
        start_time: reservation.start_time,
        end_time: reservation.end_time,
        duration_minutes: duration_minutes(reservation.start_time, reservation.end_time),
        status: reservation.status,
        customer_name: mask_customer_name(reservation.customer.as_ref().and_then(|c| c.name.as_deref())),
        course_name: reservation.course.as_ref().map(|c| c.name.clone()),
        course_duration: reservation.course.as_ref().and_then(|c| c.duration),
        options: reservation.options.iter().map(project_option).collect(),
        price: reservation.price,
        staff_revenue: reservation.staff_revenue,
        location: reservation.location_memo.clone(),
        area_name: reservation.area.as_ref().map(|a| a.name.clone()),
        designation_fee: reservation.designation_fee,
        transportation_fee: reservation.transportation_fee,
        additional_fee: reservation.additional_fee,
        discount: reservation.discount,
        check_in_at: reservation.check_in_at,
        check_out_at: reservation.check_out_at,
        can_check_in: can_check_in(reservation, now, rules),
        can_check_out: can_check_out(reservation, now),
    }
}

pub fn project_all(reservations: &[Reservation], now: DateTime<Utc>, rules: &AttendanceConfig) -> Vec<ProjectedReservation> {
    reservations.iter().map(|r| project(r, now, rules)).collect()
}
