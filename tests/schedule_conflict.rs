#[cfg(test)]
mod tests {
    use castline::db::store::SqliteStore;
    use castline::libs::reservation::{NewReservation, ReservationStatus};
    use castline::libs::schedule::NewShift;
    use castline::libs::store::CastStore;
    use chrono::{DateTime, NaiveDate, Utc};
    use std::sync::{Arc, Barrier};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ScheduleContext {
        _temp_dir: TempDir,
        store: SqliteStore,
        cast_id: i64,
        store_id: i64,
    }

    impl TestContext for ScheduleContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = SqliteStore::open(temp_dir.path().join("schedule.db")).unwrap();
            let store_id = store.casts().insert_store("Shibuya").unwrap();
            let cast_id = store.casts().insert_cast(store_id, "Aoi").unwrap();
            ScheduleContext {
                _temp_dir: temp_dir,
                store,
                cast_id,
                store_id,
            }
        }
    }

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    fn shift(cast_id: i64, start: &str, end: &str) -> NewShift {
        NewShift {
            cast_id,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            start_time: at(start),
            end_time: at(end),
            is_available: true,
        }
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_identical_shift_is_conflict(ctx: &mut ScheduleContext) {
        let first = ctx
            .store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T10:00:00+09:00", "2024-05-01T18:00:00+09:00"))
            .unwrap();
        assert!(first.id > 0);

        let err = ctx
            .store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T10:00:00+09:00", "2024-05-01T18:00:00+09:00"))
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("2024-05-01"));
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_partial_overlap_is_conflict(ctx: &mut ScheduleContext) {
        ctx.store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T10:00:00+09:00", "2024-05-01T14:00:00+09:00"))
            .unwrap();

        let overlapping = ctx
            .store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T13:00:00+09:00", "2024-05-01T17:00:00+09:00"))
            .unwrap_err();
        let inside = ctx
            .store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T11:00:00+09:00", "2024-05-01T12:00:00+09:00"))
            .unwrap_err();

        assert!(overlapping.is_conflict());
        assert!(inside.is_conflict());
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_touching_shifts_are_allowed(ctx: &mut ScheduleContext) {
        ctx.store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T10:00:00+09:00", "2024-05-01T14:00:00+09:00"))
            .unwrap();
        ctx.store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T14:00:00+09:00", "2024-05-01T18:00:00+09:00"))
            .unwrap();

        let shifts = ctx
            .store
            .find_shifts(ctx.cast_id, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].end_time, shifts[1].start_time);
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_other_cast_same_slot_is_allowed(ctx: &mut ScheduleContext) {
        let other = ctx.store.casts().insert_cast(ctx.store_id, "Rin").unwrap();

        ctx.store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T10:00:00+09:00", "2024-05-01T18:00:00+09:00"))
            .unwrap();
        ctx.store
            .insert_shift(&shift(other, "2024-05-01T10:00:00+09:00", "2024-05-01T18:00:00+09:00"))
            .unwrap();
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_unknown_cast_is_not_found(ctx: &mut ScheduleContext) {
        let err = ctx
            .store
            .insert_shift(&shift(9999, "2024-05-01T10:00:00+09:00", "2024-05-01T18:00:00+09:00"))
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_inverted_shift_is_validation_error(ctx: &mut ScheduleContext) {
        let err = ctx
            .store
            .insert_shift(&shift(ctx.cast_id, "2024-05-01T18:00:00+09:00", "2024-05-01T10:00:00+09:00"))
            .unwrap_err();

        assert!(err.is_validation());
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_overlapping_reservation_is_conflict(ctx: &mut ScheduleContext) {
        let booking = NewReservation {
            store_id: ctx.store_id,
            cast_id: ctx.cast_id,
            start_time: at("2024-05-01T10:00:00+09:00"),
            end_time: at("2024-05-01T11:00:00+09:00"),
            price: 10000,
            ..Default::default()
        };
        ctx.store.insert_reservation(&booking).unwrap();

        let overlapping = NewReservation {
            start_time: at("2024-05-01T10:30:00+09:00"),
            end_time: at("2024-05-01T11:30:00+09:00"),
            ..booking.clone()
        };
        let err = ctx.store.insert_reservation(&overlapping).unwrap_err();
        assert!(err.is_conflict());

        let back_to_back = NewReservation {
            start_time: at("2024-05-01T11:00:00+09:00"),
            end_time: at("2024-05-01T12:00:00+09:00"),
            ..booking.clone()
        };
        ctx.store.insert_reservation(&back_to_back).unwrap();
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_cancelled_reservation_frees_the_slot(ctx: &mut ScheduleContext) {
        let cancelled = NewReservation {
            store_id: ctx.store_id,
            cast_id: ctx.cast_id,
            start_time: at("2024-05-01T10:00:00+09:00"),
            end_time: at("2024-05-01T11:00:00+09:00"),
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        };
        ctx.store.insert_reservation(&cancelled).unwrap();

        let rebooked = NewReservation {
            status: Some(ReservationStatus::Confirmed),
            ..cancelled.clone()
        };
        ctx.store.insert_reservation(&rebooked).unwrap();
    }

    #[test_context(ScheduleContext)]
    #[test]
    fn test_concurrent_identical_shifts_yield_one_conflict(ctx: &mut ScheduleContext) {
        // One connection per writer, all on the same file.
        let path = ctx._temp_dir.path().join("schedule.db");
        let stores: Vec<SqliteStore> = (0..4).map(|_| SqliteStore::open(&path).unwrap()).collect();
        let barrier = Arc::new(Barrier::new(stores.len()));

        let handles: Vec<_> = stores
            .into_iter()
            .map(|store| {
                let barrier = Arc::clone(&barrier);
                let new_shift = NewShift {
                    date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                    ..shift(ctx.cast_id, "2024-05-02T10:00:00+09:00", "2024-05-02T18:00:00+09:00")
                };
                std::thread::spawn(move || {
                    barrier.wait();
                    store.insert_shift(&new_shift)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| e.is_conflict()));

        let stored = ctx
            .store
            .find_shifts(ctx.cast_id, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
            .unwrap();
        assert_eq!(stored.len(), 1);
    }
}
