use crate::db::casts::ensure_cast;
use crate::db::db::{timestamp_at, to_sql_timestamp};
use crate::libs::error::{CastError, Result};
use crate::libs::messages::Message;
use crate::libs::reservation::CastId;
use crate::libs::schedule::{guard_conflict, NewShift, Shift};
use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::Arc;

const INSERT_SHIFT: &str = "INSERT INTO cast_shifts (cast_id, date, start_time, end_time, is_available) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_BY_RANGE: &str = "SELECT id, cast_id, date, start_time, end_time, is_available
FROM cast_shifts
WHERE cast_id = ?1 AND date >= ?2 AND date <= ?3
ORDER BY date, start_time";

pub struct Shifts {
    pub conn: Arc<Mutex<Connection>>,
}

impl Shifts {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Shifts { conn }
    }

    /// Inserts a shift. The table's unique key and overlap trigger decide
    /// whether the slot is free; a rejection becomes `Conflict`.
    pub fn insert(&self, shift: &NewShift) -> Result<Shift> {
        shift.validate()?;

        let conn = self.conn.lock();
        ensure_cast(&conn, shift.cast_id)?;

        let date = shift.date.format("%Y-%m-%d").to_string();
        guard_conflict(
            conn.execute(
                INSERT_SHIFT,
                params![
                    shift.cast_id,
                    date,
                    to_sql_timestamp(&shift.start_time),
                    to_sql_timestamp(&shift.end_time),
                    shift.is_available
                ],
            ),
            || Message::ShiftSlotTaken(date.clone()),
        )?;

        Ok(Shift {
            id: conn.last_insert_rowid(),
            cast_id: shift.cast_id,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            is_available: shift.is_available,
        })
    }

    /// Shifts dated within `[from, to]`, ordered by date and start.
    pub fn fetch_range(&self, cast_id: CastId, from: NaiveDate, to: NaiveDate) -> Result<Vec<Shift>> {
        if from > to {
            return Err(CastError::Validation(Message::InvalidDateRange(from.to_string(), to.to_string())));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_BY_RANGE)?;
        let shifts = stmt
            .query_map(
                params![cast_id, from.format("%Y-%m-%d").to_string(), to.format("%Y-%m-%d").to_string()],
                shift_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(shifts)
    }
}

fn shift_from_row(row: &Row) -> rusqlite::Result<Shift> {
    let date: String = row.get(2)?;
    Ok(Shift {
        id: row.get(0)?,
        cast_id: row.get(1)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        start_time: timestamp_at(row, 3)?,
        end_time: timestamp_at(row, 4)?,
        is_available: row.get(5)?,
    })
}
