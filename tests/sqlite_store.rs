#[cfg(test)]
mod tests {
    use castline::db::attendance_requests::{AttendanceRequestStatus, NewAttendanceRequest};
    use castline::db::store::SqliteStore;
    use castline::libs::query::{ReservationQuery, SortOrder};
    use castline::libs::reservation::{NewReservation, ReservationStatus};
    use castline::libs::store::CastStore;
    use castline::libs::time_window::TimeWindow;
    use chrono::{DateTime, Utc};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StoreContext {
        _temp_dir: TempDir,
        store: SqliteStore,
        cast_id: i64,
        store_id: i64,
    }

    impl TestContext for StoreContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = SqliteStore::open(temp_dir.path().join("store.db")).unwrap();
            let store_id = store.casts().insert_store("Ebisu").unwrap();
            let cast_id = store.casts().insert_cast(store_id, "Mio").unwrap();
            StoreContext {
                _temp_dir: temp_dir,
                store,
                cast_id,
                store_id,
            }
        }
    }

    impl StoreContext {
        fn book(&self, start: &str, end: &str, status: ReservationStatus, price: i64) -> i64 {
            self.store
                .insert_reservation(&NewReservation {
                    store_id: self.store_id,
                    cast_id: self.cast_id,
                    start_time: at(start),
                    end_time: at(end),
                    status: Some(status),
                    price,
                    ..Default::default()
                })
                .unwrap()
        }
    }

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_resolve_store_id(ctx: &mut StoreContext) {
        assert_eq!(ctx.store.resolve_store_id(ctx.cast_id).unwrap(), ctx.store_id);
        assert!(ctx.store.resolve_store_id(4242).unwrap_err().is_not_found());
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_insert_cast_for_missing_store(ctx: &mut StoreContext) {
        let err = ctx.store.casts().insert_cast(777, "Ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_window_bounds_are_inclusive(ctx: &mut StoreContext) {
        let early = ctx.book("2024-05-01T00:00:00Z", "2024-05-01T01:00:00Z", ReservationStatus::Confirmed, 1000);
        let late = ctx.book("2024-05-01T12:00:00Z", "2024-05-01T13:00:00Z", ReservationStatus::Confirmed, 1000);
        ctx.book("2024-05-01T12:00:01Z", "2024-05-01T12:30:00Z", ReservationStatus::Cancelled, 1000);

        let window = TimeWindow::new(at("2024-05-01T00:00:00Z"), at("2024-05-01T12:00:00Z"));
        let found = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).within(window))
            .unwrap();

        let ids: Vec<_> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_starting_from_and_before(ctx: &mut StoreContext) {
        let past = ctx.book("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", ReservationStatus::Completed, 1000);
        let exact = ctx.book("2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z", ReservationStatus::Confirmed, 1000);
        let future = ctx.book("2024-05-02T10:00:00Z", "2024-05-02T11:00:00Z", ReservationStatus::Pending, 1000);
        let now = at("2024-05-01T10:00:00Z");

        let upcoming = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).starting_from(now))
            .unwrap();
        assert_eq!(upcoming.iter().map(|r| r.id).collect::<Vec<_>>(), vec![exact, future]);

        let earlier = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).before(now))
            .unwrap();
        assert_eq!(earlier.iter().map(|r| r.id).collect::<Vec<_>>(), vec![past]);
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_active_only_leaves_out_cancelled(ctx: &mut StoreContext) {
        ctx.book("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", ReservationStatus::Cancelled, 1000);
        let live = ctx.book("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", ReservationStatus::Confirmed, 1000);
        let now = at("2024-05-01T08:00:00Z");

        let all = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).starting_from(now))
            .unwrap();
        assert_eq!(all.len(), 2);

        let active = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).starting_from(now).active_only().limit(1))
            .unwrap();
        assert_eq!(active.iter().map(|r| r.id).collect::<Vec<_>>(), vec![live]);
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_order_and_limit(ctx: &mut StoreContext) {
        let first = ctx.book("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", ReservationStatus::Confirmed, 1000);
        let second = ctx.book("2024-05-02T09:00:00Z", "2024-05-02T10:00:00Z", ReservationStatus::Confirmed, 1000);
        let third = ctx.book("2024-05-03T09:00:00Z", "2024-05-03T10:00:00Z", ReservationStatus::Confirmed, 1000);

        let ascending = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).limit(2))
            .unwrap();
        assert_eq!(ascending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![first, second]);

        let descending = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).order(SortOrder::Desc).limit(2))
            .unwrap();
        assert_eq!(descending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![third, second]);
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_zero_limit_is_rejected(ctx: &mut StoreContext) {
        let err = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id).limit(0))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_other_store_is_filtered_out(ctx: &mut StoreContext) {
        ctx.book("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", ReservationStatus::Confirmed, 1000);
        let other_store = ctx.store.casts().insert_store("Nakano").unwrap();

        let found = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, other_store))
            .unwrap();
        assert!(found.is_empty());
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_joins_and_options(ctx: &mut StoreContext) {
        let casts = ctx.store.casts();
        let customer = casts.insert_customer(ctx.store_id, Some("Tanaka")).unwrap();
        let course = casts.insert_course(ctx.store_id, "90 min", Some(90)).unwrap();
        let area = casts.insert_area(ctx.store_id, "Shinjuku").unwrap();
        let option = casts.insert_option(ctx.store_id, "Aroma", 2000).unwrap();

        let id = ctx
            .store
            .insert_reservation(&NewReservation {
                store_id: ctx.store_id,
                cast_id: ctx.cast_id,
                customer_id: Some(customer),
                course_id: Some(course),
                area_id: Some(area),
                start_time: at("2024-05-01T09:00:00Z"),
                end_time: at("2024-05-01T10:30:00Z"),
                status: Some(ReservationStatus::Confirmed),
                price: 22000,
                staff_revenue: Some(15000),
                location_memo: Some("Room 301".to_string()),
                options: vec![(Some(option), "Aroma".to_string(), 2000), (None, "Extension".to_string(), 3000)],
                ..Default::default()
            })
            .unwrap();

        let found = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id))
            .unwrap();
        assert_eq!(found.len(), 1);

        let reservation = &found[0];
        assert_eq!(reservation.id, id);
        assert_eq!(reservation.customer.as_ref().and_then(|c| c.name.as_deref()), Some("Tanaka"));
        assert_eq!(reservation.course.as_ref().map(|c| c.name.as_str()), Some("90 min"));
        assert_eq!(reservation.course.as_ref().and_then(|c| c.duration), Some(90));
        assert_eq!(reservation.area.as_ref().map(|a| a.name.as_str()), Some("Shinjuku"));
        assert_eq!(reservation.location_memo.as_deref(), Some("Room 301"));
        assert_eq!(reservation.staff_revenue, Some(15000));
        assert_eq!(reservation.store_revenue, None);

        assert_eq!(reservation.options.len(), 2);
        assert_eq!(reservation.options[0].option_id, Some(option));
        assert_eq!(reservation.options[0].option.as_ref().map(|o| o.price), Some(2000));
        assert_eq!(reservation.options[1].option_id, None);
        assert!(reservation.options[1].option.is_none());
        assert_eq!(reservation.options[1].name.as_deref(), Some("Extension"));
        assert_eq!(reservation.options[1].price, Some(3000));
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_missing_customer_stays_empty(ctx: &mut StoreContext) {
        ctx.book("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", ReservationStatus::Pending, 1000);

        let found = ctx
            .store
            .find_reservations(&ReservationQuery::new(ctx.cast_id, ctx.store_id))
            .unwrap();
        assert!(found[0].customer.is_none());
        assert!(found[0].course.is_none());
        assert!(found[0].options.is_empty());
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_month_summaries(ctx: &mut StoreContext) {
        ctx.book("2024-04-30T23:00:00Z", "2024-04-30T23:30:00Z", ReservationStatus::Completed, 1000);
        ctx.book("2024-05-10T09:00:00Z", "2024-05-10T10:00:00Z", ReservationStatus::Completed, 1000);
        ctx.book("2024-05-20T09:00:00Z", "2024-05-20T10:00:00Z", ReservationStatus::Pending, 1000);

        let window = TimeWindow::new(at("2024-05-01T00:00:00Z"), at("2024-05-31T23:59:59.999Z"));
        let summaries = ctx.store.find_month_summaries(ctx.cast_id, ctx.store_id, &window).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].status, ReservationStatus::Completed);
        assert_eq!(summaries[1].status, ReservationStatus::Pending);
    }

    #[test_context(StoreContext)]
    #[test]
    fn test_count_open_attendance_requests(ctx: &mut StoreContext) {
        let reservation = ctx.book("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", ReservationStatus::Confirmed, 1000);
        let requests = ctx.store.attendance_requests();

        let mut ids = Vec::new();
        for status in [
            AttendanceRequestStatus::Pending,
            AttendanceRequestStatus::InReview,
            AttendanceRequestStatus::Approved,
            AttendanceRequestStatus::Rejected,
        ] {
            ids.push(
                requests
                    .insert(&NewAttendanceRequest {
                        reservation_id: reservation,
                        cast_id: ctx.cast_id,
                        status,
                        request_type: "check_in".to_string(),
                        requested_at: at("2024-05-01T08:50:00Z"),
                        reason: None,
                    })
                    .unwrap(),
            );
        }

        assert_eq!(ctx.store.count_open_attendance_requests(ctx.cast_id, ctx.store_id).unwrap(), 2);

        requests.update_status(ids[0], AttendanceRequestStatus::Approved).unwrap();
        assert_eq!(ctx.store.count_open_attendance_requests(ctx.cast_id, ctx.store_id).unwrap(), 1);

        let other_store = ctx.store.casts().insert_store("Nakano").unwrap();
        assert_eq!(ctx.store.count_open_attendance_requests(ctx.cast_id, other_store).unwrap(), 0);

        let history = requests.fetch_for_cast(ctx.cast_id).unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].id, ids[3]);
        assert_eq!(history[3].status, AttendanceRequestStatus::Approved);
    }

    #[test]
    fn test_status_round_trip_through_text() {
        for status in ["pending", "in_review", "approved", "rejected"] {
            let parsed: AttendanceRequestStatus = status.parse().unwrap();
            assert_eq!(parsed.as_str(), status);
        }
        assert!("archived".parse::<AttendanceRequestStatus>().is_err());
    }
}
