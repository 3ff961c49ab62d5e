//! Settlement export to CSV, JSON or Excel.
//!
//! The exporter writes one [`SettlementSummary`] per file. CSV and Excel
//! carry the line items followed by a totals block; JSON is the serialized
//! summary itself, identical to what the `--json` flag prints.
//!
//! ```rust,no_run
//! use castline::libs::export::{ExportFormat, SettlementExporter};
//! # use castline::libs::settlement::SettlementSummary;
//! # fn run(summary: &SettlementSummary) -> anyhow::Result<()> {
//! let exporter = SettlementExporter::new(ExportFormat::Csv, None, chrono::FixedOffset::east_opt(9 * 3600).unwrap());
//! let path = exporter.export(7, summary)?;
//! println!("{}", path.display());
//! # Ok(())
//! # }
//! ```

use crate::libs::formatter::format_local_datetime;
use crate::libs::messages::Message;
use crate::libs::reservation::CastId;
use crate::libs::settlement::SettlementSummary;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::FixedOffset;
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

const ITEM_HEADERS: [&str; 9] = [
    "ID",
    "Start",
    "Customer",
    "Course",
    "Status",
    "Price",
    "Staff Revenue",
    "Store Revenue",
    "Welfare",
];

pub struct SettlementExporter {
    format: ExportFormat,
    output_path: Option<PathBuf>,
    time_zone: FixedOffset,
}

impl SettlementExporter {
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>, time_zone: FixedOffset) -> Self {
        Self {
            format,
            output_path,
            time_zone,
        }
    }

    /// Target file: the explicit path, or `settlement_<cast>_<YYYY-MM>.<ext>`.
    pub fn output_path(&self, cast_id: CastId, summary: &SettlementSummary) -> PathBuf {
        self.output_path.clone().unwrap_or_else(|| {
            let month = summary.period.start.with_timezone(&self.time_zone).format("%Y-%m");
            PathBuf::from(format!("settlement_{}_{}.{}", cast_id, month, self.format.extension()))
        })
    }

    /// Writes the file and returns where it went.
    pub fn export(&self, cast_id: CastId, summary: &SettlementSummary) -> Result<PathBuf> {
        let path = self.output_path(cast_id, summary);
        let written = match self.format {
            ExportFormat::Csv => self.write_csv(&path, summary),
            ExportFormat::Json => self.write_json(&path, summary),
            ExportFormat::Excel => self.write_excel(&path, summary),
        };
        written.map_err(|e| msg_error_anyhow!(Message::ExportFailed(e.to_string())))?;
        tracing::debug!(path = %path.display(), format = ?self.format, items = summary.items.len(), "settlement exported");
        Ok(path)
    }

    fn totals(&self, summary: &SettlementSummary) -> Vec<(&'static str, String)> {
        vec![
            ("Period Start", format_local_datetime(&summary.period.start, &self.time_zone)),
            ("Period End", format_local_datetime(&summary.period.end, &self.time_zone)),
            ("Reservations", summary.reservation_count.to_string()),
            ("Completed", summary.completed_count.to_string()),
            ("Pending", summary.pending_count.to_string()),
            ("Total Price", summary.total_price.to_string()),
            ("Staff Revenue", summary.staff_revenue.to_string()),
            ("Store Revenue", summary.store_revenue.to_string()),
            ("Welfare", summary.welfare_expense.to_string()),
        ]
    }

    fn write_csv(&self, path: &PathBuf, summary: &SettlementSummary) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(path)?;

        wtr.write_record(["LINE ITEMS"])?;
        wtr.write_record(ITEM_HEADERS)?;
        for item in &summary.items {
            wtr.write_record(&[
                item.id.to_string(),
                format_local_datetime(&item.start_time, &self.time_zone),
                item.customer_name.clone(),
                item.course_name.clone().unwrap_or_default(),
                item.status.to_string(),
                item.price.to_string(),
                item.staff_revenue.to_string(),
                item.store_revenue.to_string(),
                item.welfare_expense.to_string(),
            ])?;
        }

        wtr.write_record([""])?;
        wtr.write_record(["SUMMARY"])?;
        for (label, value) in self.totals(summary) {
            wtr.write_record([label, value.as_str()])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_json(&self, path: &PathBuf, summary: &SettlementSummary) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        File::create(path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn write_excel(&self, path: &PathBuf, summary: &SettlementSummary) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray);

        worksheet.write_string_with_format(0, 0, "SUMMARY", &header_format)?;
        let mut row = 1;
        for (label, value) in self.totals(summary) {
            worksheet.write_string(row, 0, label)?;
            worksheet.write_string(row, 1, &value)?;
            row += 1;
        }

        row += 1;
        worksheet.write_string_with_format(row, 0, "LINE ITEMS", &header_format)?;
        row += 1;
        for (col, header) in ITEM_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, *header, &header_format)?;
        }
        row += 1;

        for item in &summary.items {
            worksheet.write_number(row, 0, item.id as f64)?;
            worksheet.write_string(row, 1, &format_local_datetime(&item.start_time, &self.time_zone))?;
            worksheet.write_string(row, 2, &item.customer_name)?;
            worksheet.write_string(row, 3, item.course_name.as_deref().unwrap_or(""))?;
            worksheet.write_string(row, 4, item.status.as_str())?;
            worksheet.write_number(row, 5, item.price as f64)?;
            worksheet.write_number(row, 6, item.staff_revenue as f64)?;
            worksheet.write_number(row, 7, item.store_revenue as f64)?;
            worksheet.write_number(row, 8, item.welfare_expense as f64)?;
            row += 1;
        }

        worksheet.autofit();
        workbook.save(path)?;
        Ok(())
    }
}
