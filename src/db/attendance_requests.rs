//! Attendance correction requests (late check-in justifications and the like).
//!
//! Requests are created by staff and resolved by an admin elsewhere; the
//! dashboard only needs to know how many are still open.

use crate::db::db::{timestamp_at, to_sql_timestamp};
use crate::libs::error::Result;
use crate::libs::reservation::{CastId, ReservationId, StoreId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const INSERT_REQUEST: &str = "INSERT INTO attendance_requests (reservation_id, cast_id, status, request_type, requested_at, reason)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const UPDATE_STATUS: &str = "UPDATE attendance_requests SET status = ?1 WHERE id = ?2";
const COUNT_OPEN: &str = "SELECT COUNT(*)
FROM attendance_requests ar
JOIN reservations r ON r.id = ar.reservation_id
WHERE ar.cast_id = ?1 AND r.store_id = ?2 AND ar.status IN ('pending', 'in_review')";
const SELECT_FOR_CAST: &str = "SELECT id, reservation_id, cast_id, status, request_type, requested_at, reason
FROM attendance_requests
WHERE cast_id = ?1
ORDER BY requested_at DESC, id DESC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceRequestStatus {
    Pending,
    InReview,
    Approved,
    Rejected,
}

impl AttendanceRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceRequestStatus::Pending => "pending",
            AttendanceRequestStatus::InReview => "in_review",
            AttendanceRequestStatus::Approved => "approved",
            AttendanceRequestStatus::Rejected => "rejected",
        }
    }

    /// Still waiting on an admin.
    pub fn is_open(&self) -> bool {
        matches!(self, AttendanceRequestStatus::Pending | AttendanceRequestStatus::InReview)
    }
}

impl fmt::Display for AttendanceRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AttendanceRequestStatus::Pending),
            "in_review" => Ok(AttendanceRequestStatus::InReview),
            "approved" => Ok(AttendanceRequestStatus::Approved),
            "rejected" => Ok(AttendanceRequestStatus::Rejected),
            other => Err(format!("unknown attendance request status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub id: i64,
    pub reservation_id: ReservationId,
    pub cast_id: CastId,
    pub status: AttendanceRequestStatus,
    pub request_type: String,
    pub requested_at: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAttendanceRequest {
    pub reservation_id: ReservationId,
    pub cast_id: CastId,
    pub status: AttendanceRequestStatus,
    pub request_type: String,
    pub requested_at: DateTime<Utc>,
    pub reason: Option<String>,
}

pub struct AttendanceRequests {
    pub conn: Arc<Mutex<Connection>>,
}

impl AttendanceRequests {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        AttendanceRequests { conn }
    }

    pub fn insert(&self, request: &NewAttendanceRequest) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            INSERT_REQUEST,
            params![
                request.reservation_id,
                request.cast_id,
                request.status.as_str(),
                request.request_type,
                to_sql_timestamp(&request.requested_at),
                request.reason
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_status(&self, id: i64, status: AttendanceRequestStatus) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(UPDATE_STATUS, params![status.as_str(), id])?;
        Ok(())
    }

    /// Requests still `pending` or `in_review` for reservations at `store_id`.
    pub fn count_open(&self, cast_id: CastId, store_id: StoreId) -> Result<u32> {
        let conn = self.conn.lock();
        let count: u32 = conn.query_row(COUNT_OPEN, params![cast_id, store_id], |row| row.get(0))?;
        Ok(count)
    }

    pub fn fetch_for_cast(&self, cast_id: CastId) -> Result<Vec<AttendanceRequest>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_FOR_CAST)?;
        let requests = stmt
            .query_map(params![cast_id], |row| {
                let status: String = row.get(3)?;
                Ok(AttendanceRequest {
                    id: row.get(0)?,
                    reservation_id: row.get(1)?,
                    cast_id: row.get(2)?,
                    status: status
                        .parse()
                        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?,
                    request_type: row.get(4)?,
                    requested_at: timestamp_at(row, 5)?,
                    reason: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(requests)
    }
}
