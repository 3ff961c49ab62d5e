use crate::db::attendance_requests::AttendanceRequests;
use crate::db::casts::Casts;
use crate::db::db::Db;
use crate::db::reservations::Reservations;
use crate::db::shifts::Shifts;
use crate::libs::error::Result;
use crate::libs::query::ReservationQuery;
use crate::libs::reservation::{CastId, MonthReservationSummary, NewReservation, Reservation, ReservationId, StoreId};
use crate::libs::schedule::{NewShift, Shift};
use crate::libs::store::CastStore;
use crate::libs::time_window::TimeWindow;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// [`CastStore`] backed by one SQLite connection.
///
/// Calls are serialized on the connection mutex; overlap checks live in the
/// schema, so concurrent writers through separate connections are still
/// rejected by SQLite itself.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db: Db) -> Self {
        SqliteStore {
            conn: Arc::new(Mutex::new(db.conn)),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(SqliteStore::new(Db::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(SqliteStore::new(Db::in_memory()?))
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    pub fn casts(&self) -> Casts {
        Casts::new(self.connection())
    }

    pub fn reservations(&self) -> Reservations {
        Reservations::new(self.connection())
    }

    pub fn shifts(&self) -> Shifts {
        Shifts::new(self.connection())
    }

    pub fn attendance_requests(&self) -> AttendanceRequests {
        AttendanceRequests::new(self.connection())
    }
}

impl CastStore for SqliteStore {
    fn resolve_store_id(&self, cast_id: CastId) -> Result<StoreId> {
        self.casts().resolve_store_id(cast_id)
    }

    fn find_reservations(&self, query: &ReservationQuery) -> Result<Vec<Reservation>> {
        self.reservations().find(query)
    }

    fn find_month_summaries(&self, cast_id: CastId, store_id: StoreId, window: &TimeWindow) -> Result<Vec<MonthReservationSummary>> {
        self.reservations().find_month_summaries(cast_id, store_id, window)
    }

    fn count_open_attendance_requests(&self, cast_id: CastId, store_id: StoreId) -> Result<u32> {
        self.attendance_requests().count_open(cast_id, store_id)
    }

    fn insert_shift(&self, shift: &NewShift) -> Result<Shift> {
        self.shifts().insert(shift)
    }

    fn find_shifts(&self, cast_id: CastId, from: NaiveDate, to: NaiveDate) -> Result<Vec<Shift>> {
        self.shifts().fetch_range(cast_id, from, to)
    }

    fn insert_reservation(&self, reservation: &NewReservation) -> Result<ReservationId> {
        self.reservations().insert(reservation)
    }
}
