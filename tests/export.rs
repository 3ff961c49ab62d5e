#[cfg(test)]
mod tests {
    use castline::libs::export::{ExportFormat, SettlementExporter};
    use castline::libs::reservation::ReservationStatus;
    use castline::libs::settlement::{SettlementLineItem, SettlementSummary};
    use castline::libs::time_window::{month_window, offset_from_minutes};
    use chrono::{DateTime, FixedOffset, Utc};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
        summary: SettlementSummary,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let start = DateTime::parse_from_rfc3339("2024-05-03T19:00:00+09:00").unwrap().with_timezone(&Utc);
            let summary = SettlementSummary {
                reservation_count: 2,
                total_price: 42000,
                staff_revenue: 25000,
                store_revenue: 14000,
                welfare_expense: 3000,
                completed_count: 1,
                pending_count: 1,
                items: vec![SettlementLineItem {
                    id: 11,
                    start_time: start,
                    customer_name: "Yamada".to_string(),
                    course_name: Some("120 min".to_string()),
                    status: ReservationStatus::Completed,
                    completed: true,
                    price: 28000,
                    staff_revenue: 17000,
                    store_revenue: 9000,
                    welfare_expense: 2000,
                }],
                ..SettlementSummary::empty(month_window(start, &tz()))
            };
            ExportTestContext { temp_dir, summary }
        }
    }

    fn tz() -> FixedOffset {
        offset_from_minutes(540)
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Excel.extension(), "xlsx");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_default_file_name(ctx: &mut ExportTestContext) {
        let exporter = SettlementExporter::new(ExportFormat::Excel, None, tz());
        assert_eq!(exporter.output_path(7, &ctx.summary), PathBuf::from("settlement_7_2024-05.xlsx"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_csv(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("settlement.csv");
        let exporter = SettlementExporter::new(ExportFormat::Csv, Some(output_path.clone()), tz());

        let written = exporter.export(7, &ctx.summary).unwrap();
        assert_eq!(written, output_path);

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.starts_with("LINE ITEMS"));
        assert!(content.contains("Yamada"));
        assert!(content.contains("2024-05-03 19:00"));
        assert!(content.contains("completed"));
        assert!(content.contains("Staff Revenue,25000"));
        assert!(content.contains("Period Start,2024-05-01 00:00"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_json(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("settlement.json");
        let exporter = SettlementExporter::new(ExportFormat::Json, Some(output_path.clone()), tz());

        exporter.export(7, &ctx.summary).unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["reservationCount"], 2);
        assert_eq!(value["staffRevenue"], 25000);
        assert_eq!(value["items"][0]["customerName"], "Yamada");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_excel(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("settlement.xlsx");
        let exporter = SettlementExporter::new(ExportFormat::Excel, Some(output_path.clone()), tz());

        exporter.export(7, &ctx.summary).unwrap();

        let metadata = std::fs::metadata(&output_path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_into_missing_directory_fails(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("missing").join("settlement.csv");
        let exporter = SettlementExporter::new(ExportFormat::Csv, Some(output_path), tz());

        assert!(exporter.export(7, &ctx.summary).is_err());
    }
}
