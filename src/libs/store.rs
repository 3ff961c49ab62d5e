//! Read/write seam between the core and a relational store.
//!
//! Every aggregator and the [`CastPortal`](crate::libs::portal::CastPortal)
//! receive a store handle instead of reaching for a process-wide client, so
//! tests can pass a fake and one process can serve several databases.

use crate::libs::error::Result;
use crate::libs::query::ReservationQuery;
use crate::libs::reservation::{CastId, MonthReservationSummary, NewReservation, Reservation, ReservationId, StoreId};
use crate::libs::schedule::{NewShift, Shift};
use crate::libs::time_window::TimeWindow;
use chrono::NaiveDate;

pub trait CastStore: Send + Sync {
    /// Store the cast member belongs to; `NotFound` if either is missing.
    fn resolve_store_id(&self, cast_id: CastId) -> Result<StoreId>;

    /// Validates `query`, then returns matching rows. No rows is not an error.
    fn find_reservations(&self, query: &ReservationQuery) -> Result<Vec<Reservation>>;

    /// Reduced rows for reservations starting inside `window`.
    fn find_month_summaries(&self, cast_id: CastId, store_id: StoreId, window: &TimeWindow)
        -> Result<Vec<MonthReservationSummary>>;

    /// Attendance requests still `pending` or `in_review`.
    fn count_open_attendance_requests(&self, cast_id: CastId, store_id: StoreId) -> Result<u32>;

    /// Inserts a shift; a taken slot is `Conflict`.
    fn insert_shift(&self, shift: &NewShift) -> Result<Shift>;

    fn find_shifts(&self, cast_id: CastId, from: NaiveDate, to: NaiveDate) -> Result<Vec<Shift>>;

    /// Inserts a reservation; an overlapping booking is `Conflict`.
    fn insert_reservation(&self, reservation: &NewReservation) -> Result<ReservationId>;
}
