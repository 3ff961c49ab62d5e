//! Display implementation for castline messages.
//!
//! All user-facing text is defined here so that error values, console output
//! and log lines share the same wording.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === CAST / STORE MESSAGES ===
            Message::CastNotFound(id) => format!("Cast {} not found", id),
            Message::CastStoreNotFound(id) => format!("No store is assigned to cast {}", id),
            Message::StoreNotFound(id) => format!("Store {} not found", id),

            // === QUERY VALIDATION MESSAGES ===
            Message::InvalidDateRange(start, end) => format!("Invalid date range: {} is after {}", start, end),
            Message::RangeEndWithoutStart => "A range end was given without a range start".to_string(),
            Message::RangeWithUpperComparator => "The 'lt' comparator cannot be combined with an explicit range".to_string(),
            Message::InvalidLimit(given, max) => format!("Invalid limit {}: must be between 1 and {}", given, max),
            Message::InvalidShiftWindow(start, end) => format!("Shift end {} must be after start {}", end, start),
            Message::ShiftDateMismatch(date, local) => format!("Shift date {} does not match its start date {}", date, local),
            Message::InvalidReservationWindow(start, end) => format!("Reservation end {} must be after start {}", end, start),
            Message::InvalidMonth(value) => format!("Invalid month '{}', expected YYYY-MM", value),
            Message::InvalidTimestamp(value) => format!("Invalid timestamp '{}', expected RFC 3339", value),
            Message::InvalidTime(value) => format!("Invalid time '{}', expected HH:MM", value),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD", value),

            // === SCHEDULE CONFLICT MESSAGES ===
            Message::ShiftSlotTaken(date) => format!("This time slot on {} is already taken", date),
            Message::ReservationSlotTaken => "This time slot is already reserved".to_string(),
            Message::ShiftCreated(id) => format!("Shift {} created", id),
            Message::ShiftsHeader(cast_id) => format!("Shifts for cast {}", cast_id),
            Message::NoShiftsFound => "No shifts found".to_string(),

            // === ATTENDANCE MESSAGES ===
            Message::AttendanceHeader(cast_id) => format!("Attendance for cast {}", cast_id),
            Message::AttendanceOngoing => "Reservation in progress".to_string(),
            Message::AttendanceUpcoming => "Next reservation".to_string(),
            Message::AttendanceIdle => "No current or upcoming reservation".to_string(),
            Message::MultipleOngoingReservations(cast_id, count) => {
                format!("Cast {} has {} overlapping ongoing reservations; using the earliest", cast_id, count)
            }

            // === DASHBOARD / SETTLEMENT MESSAGES ===
            Message::DashboardHeader(cast_id) => format!("Dashboard for cast {}", cast_id),
            Message::SettlementHeader(month) => format!("Settlement for {}", month),
            Message::ReservationsHeader(cast_id) => format!("Reservations for cast {}", cast_id),
            Message::NoReservationsFound => "No reservations found".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Settlement exported to: {}", path),
            Message::ExportFailed(error) => format!("Export failed: {}", error),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),
            Message::ConfigValueOutOfRange(key, value, min, max) => {
                format!("{} must be between {} and {}, got {}", key, min, max, value)
            }
            Message::ConfigModuleSchedule => "Schedule (time zone)".to_string(),
            Message::ConfigModuleAttendance => "Attendance windows".to_string(),
            Message::ConfigModuleDashboard => "Dashboard".to_string(),
            Message::ConfigModuleSettlement => "Settlement".to_string(),
            Message::ConfigModuleDatabase => "Database".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptUtcOffset => "UTC offset of the system time zone (minutes)".to_string(),
            Message::PromptCheckInLead => "Check-in opens this many minutes before start".to_string(),
            Message::PromptCheckInGrace => "Check-in closes this many minutes after end".to_string(),
            Message::PromptOngoingLead => "Ongoing window starts this many minutes before start".to_string(),
            Message::PromptOngoingGrace => "Ongoing window ends this many minutes after end".to_string(),
            Message::PromptUpcomingLimit => "Number of upcoming reservations on the dashboard".to_string(),
            Message::PromptLineItemLimit => "Number of settlement line items".to_string(),
            Message::PromptDatabasePath => "Database file path (empty for default)".to_string(),

            // === DATABASE MESSAGES ===
            Message::DbConnectionFailed => "Failed to connect to database".to_string(),
            Message::BackgroundTaskFailed(error) => format!("Background query failed: {}", error),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::DatabaseVersion(version) => format!("Database version: {}", version),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database needs migration".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
        };
        write!(f, "{}", text)
    }
}
