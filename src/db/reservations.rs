//! Reservation reads and the booking write path.
//!
//! Reads translate a [`ReservationQuery`] into one SELECT with LEFT JOINs for
//! the customer, course and area, then load selected add-on options per
//! reservation. Exactly one start-time bound is applied per query.

use crate::db::casts::ensure_cast;
use crate::db::db::{optional_timestamp_at, timestamp_at, to_sql_timestamp};
use crate::libs::error::{CastError, Result};
use crate::libs::messages::Message;
use crate::libs::query::{ReservationQuery, SortOrder, StartBound};
use crate::libs::reservation::{
    AreaRef, CastId, CourseRef, CustomerRef, MonthReservationSummary, NewReservation, OptionRef, Reservation, ReservationId,
    ReservationStatus, SelectedOption, StoreId,
};
use crate::libs::schedule::guard_conflict;
use crate::libs::time_window::TimeWindow;
use parking_lot::Mutex;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::Arc;

const SELECT_RESERVATIONS: &str = "SELECT r.id, r.store_id, r.cast_id, cu.id, cu.name, r.start_time, r.end_time, r.status,
    r.price, r.staff_revenue, r.store_revenue, r.welfare_expense, r.designation_fee, r.transportation_fee,
    r.additional_fee, r.discount, r.check_in_at, r.check_out_at, co.id, co.name, co.duration, r.location_memo,
    a.id, a.name
FROM reservations r
LEFT JOIN customers cu ON cu.id = r.customer_id
LEFT JOIN courses co ON co.id = r.course_id
LEFT JOIN areas a ON a.id = r.area_id
WHERE r.cast_id = ?1 AND r.store_id = ?2";

const SELECT_OPTIONS: &str = "SELECT ro.option_id, o.id, o.name, o.price, ro.option_name, ro.option_price
FROM reservation_options ro
LEFT JOIN options o ON o.id = ro.option_id
WHERE ro.reservation_id = ?1
ORDER BY ro.id";

const SELECT_MONTH_SUMMARIES: &str = "SELECT start_time, status, staff_revenue, welfare_expense, check_out_at
FROM reservations
WHERE cast_id = ?1 AND store_id = ?2 AND start_time >= ?3 AND start_time <= ?4
ORDER BY start_time";

const INSERT_RESERVATION: &str = "INSERT INTO reservations (
    store_id, cast_id, customer_id, course_id, area_id, start_time, end_time, status, price,
    staff_revenue, store_revenue, welfare_expense, designation_fee, transportation_fee, additional_fee,
    discount, check_in_at, check_out_at, location_memo
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)";

const INSERT_OPTION: &str = "INSERT INTO reservation_options (reservation_id, option_id, option_name, option_price) VALUES (?1, ?2, ?3, ?4)";

pub struct Reservations {
    pub conn: Arc<Mutex<Connection>>,
}

impl Reservations {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Reservations { conn }
    }

    pub fn find(&self, query: &ReservationQuery) -> Result<Vec<Reservation>> {
        query.validate()?;

        let mut sql = String::from(SELECT_RESERVATIONS);
        let mut values = vec![Value::Integer(query.cast_id), Value::Integer(query.store_id)];

        match query.bound {
            StartBound::Any => {}
            StartBound::Range(window) => {
                sql.push_str(" AND r.start_time >= ?3 AND r.start_time <= ?4");
                values.push(Value::Text(to_sql_timestamp(&window.start)));
                values.push(Value::Text(to_sql_timestamp(&window.end)));
            }
            StartBound::From(instant) => {
                sql.push_str(" AND r.start_time >= ?3");
                values.push(Value::Text(to_sql_timestamp(&instant)));
            }
            StartBound::Before(instant) => {
                sql.push_str(" AND r.start_time < ?3");
                values.push(Value::Text(to_sql_timestamp(&instant)));
            }
        }

        if query.active_only {
            sql.push_str(" AND r.status <> 'cancelled'");
        }

        sql.push_str(match query.order {
            SortOrder::Asc => " ORDER BY r.start_time ASC, r.id ASC",
            SortOrder::Desc => " ORDER BY r.start_time DESC, r.id DESC",
        });

        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT ?{}", values.len() + 1));
            values.push(Value::Integer(i64::from(limit)));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let mut reservations = stmt
            .query_map(params_from_iter(values.iter()), reservation_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut options_stmt = conn.prepare(SELECT_OPTIONS)?;
        for reservation in reservations.iter_mut() {
            reservation.options = options_stmt
                .query_map(params![reservation.id], option_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
        }

        tracing::trace!(cast_id = query.cast_id, store_id = query.store_id, rows = reservations.len(), "reservations loaded");
        Ok(reservations)
    }

    pub fn find_month_summaries(&self, cast_id: CastId, store_id: StoreId, window: &TimeWindow) -> Result<Vec<MonthReservationSummary>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_MONTH_SUMMARIES)?;
        let rows = stmt
            .query_map(
                params![cast_id, store_id, to_sql_timestamp(&window.start), to_sql_timestamp(&window.end)],
                |row| {
                    Ok(MonthReservationSummary {
                        start_time: timestamp_at(row, 0)?,
                        status: status_at(row, 1)?,
                        staff_revenue: row.get(2)?,
                        welfare_expense: row.get(3)?,
                        check_out_at: optional_timestamp_at(row, 4)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Inserts a reservation and its options in one transaction.
    ///
    /// An overlapping live booking for the same cast is `Conflict`.
    pub fn insert(&self, reservation: &NewReservation) -> Result<ReservationId> {
        if reservation.end_time <= reservation.start_time {
            return Err(CastError::Validation(Message::InvalidReservationWindow(
                reservation.start_time.to_rfc3339(),
                reservation.end_time.to_rfc3339(),
            )));
        }

        let mut conn = self.conn.lock();
        ensure_cast(&conn, reservation.cast_id)?;
        let tx = conn.transaction()?;

        guard_conflict(
            tx.execute(
                INSERT_RESERVATION,
                params![
                    reservation.store_id,
                    reservation.cast_id,
                    reservation.customer_id,
                    reservation.course_id,
                    reservation.area_id,
                    to_sql_timestamp(&reservation.start_time),
                    to_sql_timestamp(&reservation.end_time),
                    reservation.status.unwrap_or(ReservationStatus::Pending).as_str(),
                    reservation.price,
                    reservation.staff_revenue,
                    reservation.store_revenue,
                    reservation.welfare_expense,
                    reservation.designation_fee,
                    reservation.transportation_fee,
                    reservation.additional_fee,
                    reservation.discount,
                    reservation.check_in_at.as_ref().map(to_sql_timestamp),
                    reservation.check_out_at.as_ref().map(to_sql_timestamp),
                    reservation.location_memo,
                ],
            ),
            || Message::ReservationSlotTaken,
        )?;
        let id = tx.last_insert_rowid();

        for (option_id, name, price) in &reservation.options {
            tx.execute(INSERT_OPTION, params![id, option_id, name, price])?;
        }

        tx.commit()?;
        Ok(id)
    }
}

fn status_at(row: &Row, index: usize) -> rusqlite::Result<ReservationStatus> {
    let value: String = row.get(index)?;
    value
        .parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, e.into()))
}

fn reservation_from_row(row: &Row) -> rusqlite::Result<Reservation> {
    let customer = row
        .get::<_, Option<i64>>(3)?
        .map(|id| -> rusqlite::Result<CustomerRef> { Ok(CustomerRef { id, name: row.get(4)? }) })
        .transpose()?;
    let course = row
        .get::<_, Option<i64>>(18)?
        .map(|id| -> rusqlite::Result<CourseRef> {
            Ok(CourseRef {
                id,
                name: row.get(19)?,
                duration: row.get(20)?,
            })
        })
        .transpose()?;
    let area = row
        .get::<_, Option<i64>>(22)?
        .map(|id| -> rusqlite::Result<AreaRef> { Ok(AreaRef { id, name: row.get(23)? }) })
        .transpose()?;

    Ok(Reservation {
        id: row.get(0)?,
        store_id: row.get(1)?,
        cast_id: row.get(2)?,
        customer,
        start_time: timestamp_at(row, 5)?,
        end_time: timestamp_at(row, 6)?,
        status: status_at(row, 7)?,
        price: row.get(8)?,
        staff_revenue: row.get(9)?,
        store_revenue: row.get(10)?,
        welfare_expense: row.get(11)?,
        designation_fee: row.get(12)?,
        transportation_fee: row.get(13)?,
        additional_fee: row.get(14)?,
        discount: row.get(15)?,
        check_in_at: optional_timestamp_at(row, 16)?,
        check_out_at: optional_timestamp_at(row, 17)?,
        course,
        options: Vec::new(),
        location_memo: row.get(21)?,
        area,
    })
}

fn option_from_row(row: &Row) -> rusqlite::Result<SelectedOption> {
    let option = match row.get::<_, Option<i64>>(1)? {
        Some(_) => Some(OptionRef {
            name: row.get(2)?,
            price: row.get(3)?,
        }),
        None => None,
    };
    Ok(SelectedOption {
        option_id: row.get(0)?,
        option,
        name: row.get(4)?,
        price: row.get(5)?,
    })
}
