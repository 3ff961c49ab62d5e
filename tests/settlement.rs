#[cfg(test)]
mod tests {
    use castline::libs::reservation::{CustomerRef, Reservation, ReservationStatus};
    use castline::libs::settlement::aggregate_settlement;
    use castline::libs::time_window::{month_window, offset_from_minutes, TimeWindow};
    use chrono::{DateTime, Duration, Utc};

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    fn may() -> TimeWindow {
        month_window(at("2024-05-15T12:00:00+09:00"), &offset_from_minutes(540))
    }

    fn reservation(id: i64, start: DateTime<Utc>, status: ReservationStatus, checked_out: bool) -> Reservation {
        Reservation {
            id,
            store_id: 1,
            cast_id: 7,
            customer: Some(CustomerRef {
                id: 100 + id,
                name: Some("Suzuki".to_string()),
            }),
            start_time: start,
            end_time: start + Duration::minutes(60),
            status,
            price: 20000,
            staff_revenue: Some(10000),
            store_revenue: Some(8000),
            welfare_expense: Some(2000),
            designation_fee: None,
            transportation_fee: None,
            additional_fee: None,
            discount: None,
            check_in_at: checked_out.then(|| start),
            check_out_at: checked_out.then(|| start + Duration::minutes(60)),
            course: None,
            options: Vec::new(),
            location_memo: None,
            area: None,
        }
    }

    fn month_of(count: i64) -> Vec<Reservation> {
        let first = at("2024-05-01T10:00:00+09:00");
        (0..count)
            .map(|i| {
                let status = match i % 3 {
                    0 => ReservationStatus::Completed,
                    1 => ReservationStatus::Confirmed,
                    _ => ReservationStatus::Cancelled,
                };
                reservation(i + 1, first + Duration::hours(i * 7), status, i % 2 == 0)
            })
            .collect()
    }

    #[test]
    fn test_totals() {
        let reservations = month_of(4);
        let summary = aggregate_settlement(&reservations, &may(), 25);

        assert_eq!(summary.reservation_count, 4);
        assert_eq!(summary.total_price, 80000);
        assert_eq!(summary.staff_revenue, 40000);
        assert_eq!(summary.store_revenue, 32000);
        assert_eq!(summary.welfare_expense, 8000);
        // only id 1 is completed with a check-out
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.pending_count, 3);
    }

    #[test]
    fn test_completed_and_pending_partition_the_month() {
        for count in [0, 1, 5, 13, 40] {
            let summary = aggregate_settlement(&month_of(count), &may(), 25);
            assert_eq!(summary.completed_count + summary.pending_count, summary.reservation_count);
            assert_eq!(summary.reservation_count as i64, count);
        }
    }

    #[test]
    fn test_completed_needs_check_out_and_status() {
        let start = at("2024-05-03T10:00:00+09:00");
        let reservations = vec![
            reservation(1, start, ReservationStatus::Completed, false),
            reservation(2, start + Duration::hours(2), ReservationStatus::InProgress, true),
        ];

        let summary = aggregate_settlement(&reservations, &may(), 25);

        assert_eq!(summary.completed_count, 0);
        assert_eq!(summary.pending_count, 2);
    }

    #[test]
    fn test_line_items_are_recent_first_and_bounded() {
        let summary = aggregate_settlement(&month_of(40), &may(), 25);

        assert_eq!(summary.items.len(), 25);
        assert_eq!(summary.items[0].id, 40);
        assert!(summary.items.windows(2).all(|w| w[0].start_time >= w[1].start_time));
        assert!(summary.items.iter().all(|item| item.customer_name == "S***"));
    }

    #[test]
    fn test_rows_outside_month_are_ignored() {
        let mut reservations = month_of(2);
        reservations.push(reservation(99, at("2024-06-01T00:00:00+09:00"), ReservationStatus::Completed, true));
        reservations.push(reservation(98, at("2024-04-30T23:59:59+09:00"), ReservationStatus::Completed, true));

        let summary = aggregate_settlement(&reservations, &may(), 25);

        assert_eq!(summary.reservation_count, 2);
        assert!(summary.items.iter().all(|item| item.id < 98));
    }

    #[test]
    fn test_missing_amounts_count_as_zero() {
        let mut r = reservation(1, at("2024-05-02T10:00:00+09:00"), ReservationStatus::Pending, false);
        r.staff_revenue = None;
        r.store_revenue = None;
        r.welfare_expense = None;

        let summary = aggregate_settlement(&[r], &may(), 25);

        assert_eq!(summary.total_price, 20000);
        assert_eq!(summary.staff_revenue, 0);
        assert_eq!(summary.items[0].welfare_expense, 0);
    }

    #[test]
    fn test_period_matches_dashboard_month() {
        let summary = aggregate_settlement(&[], &may(), 25);

        assert_eq!(summary.period, may());
        assert!(summary.items.is_empty());
        assert_eq!(summary.reservation_count, 0);
    }
}
