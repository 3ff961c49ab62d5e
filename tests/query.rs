#[cfg(test)]
mod tests {
    use castline::libs::query::{Comparator, ReservationListParams, ReservationQuery, SortOrder, StartBound, MAX_LIMIT};
    use castline::libs::time_window::TimeWindow;
    use chrono::{DateTime, Utc};

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_no_dates_means_no_bound() {
        let query = ReservationListParams::default().into_query(7, 1).unwrap();

        assert_eq!(query.bound, StartBound::Any);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.limit, None);
        assert_eq!((query.cast_id, query.store_id), (7, 1));
    }

    #[test]
    fn test_date_alone_is_lower_bound() {
        let params = ReservationListParams {
            date: Some(at("2024-05-01T00:00:00Z")),
            ..Default::default()
        };

        assert_eq!(params.into_query(7, 1).unwrap().bound, StartBound::From(at("2024-05-01T00:00:00Z")));
    }

    #[test]
    fn test_lt_is_exclusive_upper_bound() {
        let params = ReservationListParams {
            date: Some(at("2024-05-01T00:00:00Z")),
            comparator: Comparator::Lt,
            sort: SortOrder::Desc,
            limit: Some(5),
            ..Default::default()
        };
        let query = params.into_query(7, 1).unwrap();

        assert_eq!(query.bound, StartBound::Before(at("2024-05-01T00:00:00Z")));
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_date_and_date_to_form_range() {
        let params = ReservationListParams {
            date: Some(at("2024-05-01T00:00:00Z")),
            date_to: Some(at("2024-05-31T00:00:00Z")),
            ..Default::default()
        };

        assert_eq!(
            params.into_query(7, 1).unwrap().bound,
            StartBound::Range(TimeWindow::new(at("2024-05-01T00:00:00Z"), at("2024-05-31T00:00:00Z")))
        );
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let inverted = ReservationListParams {
            date: Some(at("2024-05-31T00:00:00Z")),
            date_to: Some(at("2024-05-01T00:00:00Z")),
            ..Default::default()
        };
        let end_only = ReservationListParams {
            date_to: Some(at("2024-05-01T00:00:00Z")),
            ..Default::default()
        };
        let lt_range = ReservationListParams {
            date: Some(at("2024-05-01T00:00:00Z")),
            date_to: Some(at("2024-05-31T00:00:00Z")),
            comparator: Comparator::Lt,
            ..Default::default()
        };
        let zero_limit = ReservationListParams {
            limit: Some(0),
            ..Default::default()
        };
        let huge_limit = ReservationListParams {
            limit: Some(MAX_LIMIT + 1),
            ..Default::default()
        };

        for params in [inverted, end_only, lt_range, zero_limit, huge_limit] {
            let err = params.validate().unwrap_err();
            assert!(err.is_validation(), "{:?}", params);
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn test_limit_bounds_are_inclusive() {
        for limit in [1, MAX_LIMIT] {
            let params = ReservationListParams {
                limit: Some(limit),
                ..Default::default()
            };
            assert!(params.validate().is_ok());
        }
    }

    #[test]
    fn test_builder_sets_single_bound() {
        let query = ReservationQuery::new(7, 1)
            .within(TimeWindow::new(at("2024-05-01T00:00:00Z"), at("2024-05-02T00:00:00Z")))
            .starting_from(at("2024-05-01T12:00:00Z"))
            .limit(10)
            .order(SortOrder::Desc);

        assert_eq!(query.bound, StartBound::From(at("2024-05-01T12:00:00Z")));
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_params_deserialize_from_request_shape() {
        let params: ReservationListParams = serde_json::from_str(
            r#"{"date":"2024-05-01T00:00:00Z","dateTo":"2024-05-02T00:00:00Z","limit":20,"sort":"desc"}"#,
        )
        .unwrap();

        assert_eq!(params.comparator, Comparator::Gte);
        assert_eq!(params.sort, SortOrder::Desc);
        assert_eq!(params.limit, Some(20));
        assert!(params.date_to.is_some());

        let lt: ReservationListParams = serde_json::from_str(r#"{"date":"2024-05-01T00:00:00Z","comparator":"lt"}"#).unwrap();
        assert_eq!(lt.comparator, Comparator::Lt);
    }
}
