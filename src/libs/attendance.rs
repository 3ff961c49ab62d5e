//! Live attendance state of a cast member.
//!
//! The state is derived on every request from today's reservations, the
//! ascending list of upcoming ones, and "now". It is never stored and has
//! no transitions of its own: check-in and check-out happen elsewhere and
//! show up here on the next derivation.
//!
//! ```text
//!   ongoing reservation in [start - lead, end + grace]?  ── yes ──▶ Ongoing
//!                     │ no
//!   first upcoming reservation not cancelled?            ── yes ──▶ Upcoming
//!                     │ no
//!                     ▼
//!                   Idle
//! ```

use crate::libs::config::AttendanceConfig;
use crate::libs::messages::Message;
use crate::libs::projection::{project, ProjectedReservation};
use crate::libs::reservation::{CastId, Reservation, ReservationStatus};
use crate::libs::time_window::{add_minutes, is_within};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendancePhase {
    Ongoing,
    Upcoming,
    Idle,
}

impl AttendancePhase {
    pub fn message(&self) -> Message {
        match self {
            AttendancePhase::Ongoing => Message::AttendanceOngoing,
            AttendancePhase::Upcoming => Message::AttendanceUpcoming,
            AttendancePhase::Idle => Message::AttendanceIdle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceState {
    pub phase: AttendancePhase,
    pub current_reservation: Option<ProjectedReservation>,
    pub can_check_in: bool,
    pub can_check_out: bool,
    pub last_check_in_at: Option<DateTime<Utc>>,
    pub last_check_out_at: Option<DateTime<Utc>>,
}

fn is_ongoing(reservation: &Reservation, now: DateTime<Utc>, rules: &AttendanceConfig) -> bool {
    is_within(
        now,
        add_minutes(reservation.start_time, -rules.ongoing_lead_minutes),
        add_minutes(reservation.end_time, rules.ongoing_grace_minutes),
    )
}

/// Picks the ongoing reservation among `today`, first match wins.
///
/// More than one match means overlapping bookings for one cast member; that
/// is reported as a warning and the earliest one in input order is used.
fn find_ongoing<'a>(
    cast_id: CastId,
    today: &'a [Reservation],
    now: DateTime<Utc>,
    rules: &AttendanceConfig,
) -> Option<&'a Reservation> {
    let mut ongoing = today.iter().filter(|r| is_ongoing(r, now, rules));
    let first = ongoing.next()?;
    let extra = ongoing.count();
    if extra > 0 {
        tracing::warn!(
            cast_id,
            reservation_id = first.id,
            "{}",
            Message::MultipleOngoingReservations(cast_id, extra + 1)
        );
    }
    Some(first)
}

pub fn derive_attendance(
    cast_id: CastId,
    today: &[Reservation],
    upcoming: &[Reservation],
    now: DateTime<Utc>,
    rules: &AttendanceConfig,
) -> AttendanceState {
    let (phase, target) = match find_ongoing(cast_id, today, now, rules) {
        Some(reservation) => (AttendancePhase::Ongoing, Some(reservation)),
        None => match upcoming.iter().find(|r| r.status != ReservationStatus::Cancelled) {
            Some(reservation) => (AttendancePhase::Upcoming, Some(reservation)),
            None => (AttendancePhase::Idle, None),
        },
    };

    let current_reservation = target.map(|r| project(r, now, rules));
    let (can_check_in, can_check_out) = current_reservation
        .as_ref()
        .map_or((false, false), |p| (p.can_check_in, p.can_check_out));

    AttendanceState {
        phase,
        current_reservation,
        can_check_in,
        can_check_out,
        last_check_in_at: today.iter().filter_map(|r| r.check_in_at).max(),
        last_check_out_at: today.iter().filter_map(|r| r.check_out_at).max(),
    }
}
