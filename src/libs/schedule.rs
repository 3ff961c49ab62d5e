//! Shift schedule entries and the conflict guard.
//!
//! Overlap is decided by the backing store, not here: its constraint is the
//! only thing that holds across concurrent requests and service instances.
//! [`guard_conflict`] only translates the store's constraint failure into a
//! [`CastError::Conflict`] so callers can say "this slot is already taken".
//!
//! With the SQLite store, shifts are half-open `[start, end)`: back-to-back
//! shifts that touch at a boundary are accepted.

use crate::libs::error::{is_slot_conflict, CastError, Result};
use crate::libs::messages::Message;
use crate::libs::reservation::CastId;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type ShiftId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub cast_id: CastId,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
    pub cast_id: CastId,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl NewShift {
    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(CastError::Validation(Message::InvalidShiftWindow(
                self.start_time.to_rfc3339(),
                self.end_time.to_rfc3339(),
            )));
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus: `date` is the local date of
    /// `start_time` in `tz`. Overnight shifts keep the date they start on.
    pub fn validate_in(&self, tz: &FixedOffset) -> Result<()> {
        self.validate()?;
        let local_date = self.start_time.with_timezone(tz).date_naive();
        if local_date != self.date {
            return Err(CastError::Validation(Message::ShiftDateMismatch(
                self.date.to_string(),
                local_date.to_string(),
            )));
        }
        Ok(())
    }
}

/// Maps a slot constraint failure from a guarded insert to `Conflict(message)`.
///
/// Any other store error is passed through untouched.
pub fn guard_conflict<T>(result: rusqlite::Result<T>, message: impl FnOnce() -> Message) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if is_slot_conflict(&e) => {
            tracing::debug!(error = %e, "slot rejected by store constraint");
            Err(CastError::Conflict(message()))
        }
        Err(e) => Err(CastError::Database(e)),
    }
}
