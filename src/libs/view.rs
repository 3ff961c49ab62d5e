use super::attendance::AttendanceState;
use super::dashboard::DashboardStats;
use super::formatter::{
    format_flag, format_local_datetime, format_local_time, format_minutes, format_optional_local_time, format_optional_yen, format_yen,
};
use super::projection::ProjectedReservation;
use super::schedule::Shift;
use super::settlement::SettlementSummary;
use chrono::FixedOffset;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn reservations(reservations: &[ProjectedReservation], tz: &FixedOffset) {
        let mut table = Table::new();

        table.add_row(row!["ID", "START", "END", "DURATION", "STATUS", "CUSTOMER", "COURSE", "OPTIONS", "PRICE", "CHECK-IN", "CHECK-OUT"]);
        for r in reservations {
            let options = r.options.iter().map(|o| o.name.as_str()).collect::<Vec<_>>().join(", ");
            table.add_row(row![
                r.id,
                format_local_datetime(&r.start_time, tz),
                format_local_time(&r.end_time, tz),
                format_minutes(r.duration_minutes),
                r.status,
                r.customer_name,
                r.course_name.as_deref().unwrap_or("-"),
                options,
                format_yen(r.price),
                format_optional_local_time(r.check_in_at.as_ref(), tz),
                format_optional_local_time(r.check_out_at.as_ref(), tz)
            ]);
        }
        table.printstd();
    }

    pub fn attendance(state: &AttendanceState, tz: &FixedOffset) {
        let mut table = Table::new();

        table.add_row(row!["STATE", state.phase.message()]);
        if let Some(current) = &state.current_reservation {
            table.add_row(row!["RESERVATION", current.id]);
            table.add_row(row![
                "TIME",
                format!(
                    "{} - {}",
                    format_local_datetime(&current.start_time, tz),
                    format_local_time(&current.end_time, tz)
                )
            ]);
            table.add_row(row!["CUSTOMER", current.customer_name]);
            table.add_row(row!["LOCATION", current.location.as_deref().unwrap_or("-")]);
        }
        table.add_row(row!["CAN CHECK IN", format_flag(state.can_check_in)]);
        table.add_row(row!["CAN CHECK OUT", format_flag(state.can_check_out)]);
        table.add_row(row!["LAST CHECK-IN", format_optional_local_time(state.last_check_in_at.as_ref(), tz)]);
        table.add_row(row!["LAST CHECK-OUT", format_optional_local_time(state.last_check_out_at.as_ref(), tz)]);
        table.printstd();
    }

    pub fn dashboard(stats: &DashboardStats) {
        let mut table = Table::new();

        table.add_row(row!["TODAY", stats.today_count]);
        table.add_row(row!["COMPLETED TODAY", stats.completed_today]);
        table.add_row(row!["UPCOMING", stats.upcoming_count]);
        table.add_row(row!["TODAY REVENUE", format_yen(stats.today_revenue)]);
        table.add_row(row!["MONTH REVENUE", format_yen(stats.month_revenue)]);
        table.add_row(row!["WELFARE THIS MONTH", format_yen(stats.welfare_this_month)]);
        table.add_row(row!["PENDING", stats.pending_count]);
        table.add_row(row!["PENDING REQUESTS", stats.pending_requests]);
        table.printstd();
    }

    pub fn settlement(summary: &SettlementSummary, tz: &FixedOffset) {
        let mut totals = Table::new();
        totals.add_row(row!["RESERVATIONS", summary.reservation_count]);
        totals.add_row(row!["COMPLETED", summary.completed_count]);
        totals.add_row(row!["PENDING", summary.pending_count]);
        totals.add_row(row!["TOTAL PRICE", format_yen(summary.total_price)]);
        totals.add_row(row!["STAFF REVENUE", format_yen(summary.staff_revenue)]);
        totals.add_row(row!["STORE REVENUE", format_yen(summary.store_revenue)]);
        totals.add_row(row!["WELFARE", format_yen(summary.welfare_expense)]);
        totals.printstd();

        if summary.items.is_empty() {
            return;
        }

        let mut items = Table::new();
        items.add_row(row!["ID", "START", "CUSTOMER", "COURSE", "STATUS", "PRICE", "STAFF", "STORE", "WELFARE"]);
        for item in &summary.items {
            items.add_row(row![
                item.id,
                format_local_datetime(&item.start_time, tz),
                item.customer_name,
                item.course_name.as_deref().unwrap_or("-"),
                item.status,
                format_yen(item.price),
                format_yen(item.staff_revenue),
                format_yen(item.store_revenue),
                format_yen(item.welfare_expense)
            ]);
        }
        items.printstd();
    }

    pub fn shifts(shifts: &[Shift], tz: &FixedOffset) {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "START", "END", "AVAILABLE"]);
        for shift in shifts {
            table.add_row(row![
                shift.id,
                shift.date,
                format_local_time(&shift.start_time, tz),
                format_local_time(&shift.end_time, tz),
                format_flag(shift.is_available)
            ]);
        }
        table.printstd();
    }

    /// Fee breakdown for one reservation; absent fees print as `-`.
    pub fn fees(reservation: &ProjectedReservation) {
        let mut table = Table::new();

        table.add_row(row!["PRICE", format_yen(reservation.price)]);
        table.add_row(row!["STAFF REVENUE", format_optional_yen(reservation.staff_revenue)]);
        table.add_row(row!["DESIGNATION", format_optional_yen(reservation.designation_fee)]);
        table.add_row(row!["TRANSPORTATION", format_optional_yen(reservation.transportation_fee)]);
        table.add_row(row!["ADDITIONAL", format_optional_yen(reservation.additional_fee)]);
        table.add_row(row!["DISCOUNT", format_optional_yen(reservation.discount)]);
        table.printstd();
    }
}
