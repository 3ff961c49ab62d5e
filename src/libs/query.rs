//! Reservation query contract.
//!
//! A [`ReservationQuery`] selects one cast member's reservations at one
//! store, filtered on start time by exactly one [`StartBound`], sorted, and
//! optionally capped. The storage engine is not prescribed; [`CastStore`]
//! implementations translate the query.
//!
//! [`ReservationListParams`] is the loosely shaped request a REST caller
//! receives (`date`, `dateTo`, `comparator`, `limit`, `sort`) and is turned
//! into a query only after validation.
//!
//! [`CastStore`]: crate::libs::store::CastStore

use crate::libs::error::{CastError, Result};
use crate::libs::messages::Message;
use crate::libs::reservation::{CastId, StoreId};
use crate::libs::time_window::TimeWindow;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Largest accepted `limit`.
pub const MAX_LIMIT: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    /// `start_time >= date`
    #[default]
    Gte,
    /// `start_time < date`
    Lt,
}

/// Which start-time filter is active. Only one can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartBound {
    Any,
    /// `start <= start_time <= end`
    Range(TimeWindow),
    /// `start_time >= instant`
    From(DateTime<Utc>),
    /// `start_time < instant`
    Before(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationQuery {
    pub cast_id: CastId,
    pub store_id: StoreId,
    pub bound: StartBound,
    pub limit: Option<u32>,
    pub order: SortOrder,
    /// Leave out `cancelled` bookings.
    pub active_only: bool,
}

impl ReservationQuery {
    pub fn new(cast_id: CastId, store_id: StoreId) -> Self {
        Self {
            cast_id,
            store_id,
            bound: StartBound::Any,
            limit: None,
            order: SortOrder::Asc,
            active_only: false,
        }
    }

    pub fn within(mut self, window: TimeWindow) -> Self {
        self.bound = StartBound::Range(window);
        self
    }

    pub fn starting_from(mut self, instant: DateTime<Utc>) -> Self {
        self.bound = StartBound::From(instant);
        self
    }

    pub fn before(mut self, instant: DateTime<Utc>) -> Self {
        self.bound = StartBound::Before(instant);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Rejects inverted ranges and out-of-bounds limits.
    pub fn validate(&self) -> Result<()> {
        if let StartBound::Range(window) = self.bound {
            if window.start > window.end {
                return Err(CastError::Validation(Message::InvalidDateRange(
                    window.start.to_rfc3339(),
                    window.end.to_rfc3339(),
                )));
            }
        }
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_LIMIT {
                return Err(CastError::Validation(Message::InvalidLimit(limit, MAX_LIMIT)));
            }
        }
        Ok(())
    }
}

/// Request-level parameters for listing reservations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListParams {
    pub date: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comparator: Comparator,
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ReservationListParams {
    fn bound(&self) -> Result<StartBound> {
        match (self.date, self.date_to, self.comparator) {
            (Some(_), Some(_), Comparator::Lt) => Err(CastError::Validation(Message::RangeWithUpperComparator)),
            (Some(start), Some(end), Comparator::Gte) => Ok(StartBound::Range(TimeWindow::new(start, end))),
            (Some(date), None, Comparator::Gte) => Ok(StartBound::From(date)),
            (Some(date), None, Comparator::Lt) => Ok(StartBound::Before(date)),
            (None, Some(_), _) => Err(CastError::Validation(Message::RangeEndWithoutStart)),
            (None, None, _) => Ok(StartBound::Any),
        }
    }

    /// Checks the parameters without building a query.
    pub fn validate(&self) -> Result<()> {
        self.clone().into_query(0, 0).map(|_| ())
    }

    /// Builds a validated query.
    ///
    /// - `date` and `date_to` → explicit range (`comparator` must be `gte`)
    /// - `date` alone → lower bound (`gte`) or exclusive upper bound (`lt`)
    /// - neither → no start-time filter
    pub fn into_query(self, cast_id: CastId, store_id: StoreId) -> Result<ReservationQuery> {
        let query = ReservationQuery {
            cast_id,
            store_id,
            bound: self.bound()?,
            limit: self.limit,
            order: self.sort,
            active_only: false,
        };
        query.validate()?;
        Ok(query)
    }
}
