//! Error taxonomy for the attendance and schedule core.
//!
//! Three domain failures are distinguished so that callers can map them to
//! transport responses without inspecting text:
//!
//! - [`CastError::NotFound`]: the cast member or its store cannot be resolved
//! - [`CastError::Conflict`]: the backing store rejected an overlapping slot
//! - [`CastError::Validation`]: the request was malformed and never queried
//!
//! Store failures pass through unchanged as [`CastError::Database`]. Nothing
//! in the core retries or recovers; errors propagate to the caller as-is.

use crate::libs::messages::Message;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CastError {
    #[error("{0}")]
    NotFound(Message),

    #[error("{0}")]
    Conflict(Message),

    #[error("{0}")]
    Validation(Message),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error("{}", Message::BackgroundTaskFailed(.0.to_string()))]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CastError>;

impl CastError {
    /// HTTP status a REST handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            CastError::NotFound(_) => 404,
            CastError::Conflict(_) => 409,
            CastError::Validation(_) => 400,
            CastError::Database(_) | CastError::Task(_) => 500,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CastError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CastError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CastError::Validation(_))
    }
}

/// Returns `true` for the constraint failures that signal a taken slot:
/// UNIQUE keys and trigger `RAISE(ABORT, ...)` aborts.
///
/// CHECK and foreign key failures are not slot conflicts.
pub fn is_slot_conflict(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => matches!(
            e.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER
        ),
        _ => false,
    }
}
