//! Request-level assembly for the staff portal and admin dashboard.
//!
//! Each operation resolves the cast member's store, issues its independent
//! reads concurrently on the blocking pool, and folds the results with the
//! pure functions in [`attendance`](crate::libs::attendance),
//! [`dashboard`](crate::libs::dashboard) and
//! [`settlement`](crate::libs::settlement). Reads share no state, so the
//! fan-out needs no ordering and no locking beyond what the store does.
//!
//! There are no retries and no in-process locks around writes: shift
//! conflicts are decided by the store's constraint.
//!
//! ```rust,no_run
//! use castline::db::store::SqliteStore;
//! use castline::libs::{config::Rules, portal::CastPortal};
//! use chrono::Utc;
//! use std::sync::Arc;
//!
//! # async fn run() -> castline::libs::error::Result<()> {
//! let store = Arc::new(SqliteStore::open_in_memory()?);
//! let portal = CastPortal::new(store, Rules::default());
//! let stats = portal.dashboard(1, None, Utc::now()).await?;
//! println!("{} reservations today", stats.today_count);
//! # Ok(())
//! # }
//! ```

use crate::libs::attendance::{derive_attendance, AttendanceState};
use crate::libs::config::Rules;
use crate::libs::dashboard::{aggregate_dashboard, DashboardStats};
use crate::libs::error::{CastError, Result};
use crate::libs::messages::Message;
use crate::libs::projection::{project_all, ProjectedReservation};
use crate::libs::query::{ReservationListParams, ReservationQuery, SortOrder};
use crate::libs::reservation::{CastId, StoreId};
use crate::libs::schedule::{NewShift, Shift};
use crate::libs::settlement::{aggregate_settlement, SettlementSummary};
use crate::libs::store::CastStore;
use crate::libs::time_window::{day_window, month_window};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

pub struct CastPortal<S> {
    store: Arc<S>,
    rules: Rules,
}

impl<S> Clone for CastPortal<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            rules: self.rules.clone(),
        }
    }
}

impl<S: CastStore + 'static> CastPortal<S> {
    pub fn new(store: Arc<S>, rules: Rules) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Runs one store call on the blocking pool.
    async fn read<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store)).await?
    }

    /// Uses `store_id` when given, otherwise the cast member's own store.
    pub async fn resolve_store(&self, cast_id: CastId, store_id: Option<StoreId>) -> Result<StoreId> {
        match store_id {
            Some(id) => Ok(id),
            None => self.read(move |s| s.resolve_store_id(cast_id)).await,
        }
    }

    pub async fn attendance(&self, cast_id: CastId, store_id: Option<StoreId>, now: DateTime<Utc>) -> Result<AttendanceState> {
        let store_id = self.resolve_store(cast_id, store_id).await?;
        let today_query = ReservationQuery::new(cast_id, store_id).within(day_window(now, &self.rules.time_zone));
        let upcoming_query = ReservationQuery::new(cast_id, store_id)
            .starting_from(now)
            .active_only()
            .limit(self.rules.dashboard.upcoming_limit.max(1));

        let (today, upcoming) = tokio::try_join!(
            self.read(move |s| s.find_reservations(&today_query)),
            self.read(move |s| s.find_reservations(&upcoming_query)),
        )?;
        tracing::debug!(cast_id, store_id, today = today.len(), upcoming = upcoming.len(), "attendance inputs loaded");

        Ok(derive_attendance(cast_id, &today, &upcoming, now, &self.rules.attendance))
    }

    pub async fn dashboard(&self, cast_id: CastId, store_id: Option<StoreId>, now: DateTime<Utc>) -> Result<DashboardStats> {
        let store_id = self.resolve_store(cast_id, store_id).await?;
        let month = month_window(now, &self.rules.time_zone);
        let today_query = ReservationQuery::new(cast_id, store_id).within(day_window(now, &self.rules.time_zone));
        let upcoming_query = ReservationQuery::new(cast_id, store_id)
            .starting_from(now)
            .active_only()
            .limit(self.rules.dashboard.upcoming_limit.max(1));

        let (today, upcoming, month_rows, pending_requests) = tokio::try_join!(
            self.read(move |s| s.find_reservations(&today_query)),
            self.read(move |s| s.find_reservations(&upcoming_query)),
            self.read(move |s| s.find_month_summaries(cast_id, store_id, &month)),
            self.read(move |s| s.count_open_attendance_requests(cast_id, store_id)),
        )?;
        tracing::debug!(
            cast_id,
            store_id,
            today = today.len(),
            upcoming = upcoming.len(),
            month = month_rows.len(),
            pending_requests,
            "dashboard inputs loaded"
        );

        Ok(aggregate_dashboard(&today, &upcoming, &month_rows, &month).with_pending_requests(pending_requests))
    }

    /// Settlement for the month containing `at`.
    pub async fn settlement(&self, cast_id: CastId, store_id: Option<StoreId>, at: DateTime<Utc>) -> Result<SettlementSummary> {
        let store_id = self.resolve_store(cast_id, store_id).await?;
        let month = month_window(at, &self.rules.time_zone);
        let query = ReservationQuery::new(cast_id, store_id).within(month).order(SortOrder::Desc);

        let reservations = self.read(move |s| s.find_reservations(&query)).await?;
        Ok(aggregate_settlement(&reservations, &month, self.rules.settlement.line_item_limit))
    }

    pub async fn reservations(
        &self,
        cast_id: CastId,
        store_id: Option<StoreId>,
        params: ReservationListParams,
        now: DateTime<Utc>,
    ) -> Result<Vec<ProjectedReservation>> {
        params.validate()?;
        let store_id = self.resolve_store(cast_id, store_id).await?;
        let query = params.into_query(cast_id, store_id)?;

        let reservations = self.read(move |s| s.find_reservations(&query)).await?;
        Ok(project_all(&reservations, now, &self.rules.attendance))
    }

    pub async fn schedule_shift(&self, shift: NewShift) -> Result<Shift> {
        shift.validate_in(&self.rules.time_zone)?;
        self.read(move |s| s.insert_shift(&shift)).await
    }

    pub async fn shifts(&self, cast_id: CastId, from: NaiveDate, to: NaiveDate) -> Result<Vec<Shift>> {
        if from > to {
            return Err(CastError::Validation(Message::InvalidDateRange(from.to_string(), to.to_string())));
        }
        self.read(move |s| s.find_shifts(cast_id, from, to)).await
    }
}
