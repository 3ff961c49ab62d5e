#[derive(Debug, Clone)]
pub enum Message {
    // === CAST / STORE MESSAGES ===
    CastNotFound(i64),
    CastStoreNotFound(i64), // cast id
    StoreNotFound(i64),

    // === QUERY VALIDATION MESSAGES ===
    InvalidDateRange(String, String), // start, end
    RangeEndWithoutStart,
    RangeWithUpperComparator,
    InvalidLimit(u32, u32), // given, max
    InvalidShiftWindow(String, String), // start, end
    ShiftDateMismatch(String, String), // given date, local start date
    InvalidReservationWindow(String, String), // start, end
    InvalidMonth(String),
    InvalidTimestamp(String),
    InvalidTime(String),
    InvalidDate(String),

    // === SCHEDULE CONFLICT MESSAGES ===
    ShiftSlotTaken(String), // date
    ReservationSlotTaken,
    ShiftCreated(i64),
    ShiftsHeader(i64),
    NoShiftsFound,

    // === ATTENDANCE MESSAGES ===
    AttendanceHeader(i64),
    AttendanceOngoing,
    AttendanceUpcoming,
    AttendanceIdle,
    MultipleOngoingReservations(i64, usize), // cast id, count

    // === DASHBOARD / SETTLEMENT MESSAGES ===
    DashboardHeader(i64),
    SettlementHeader(String), // month
    ReservationsHeader(i64),
    NoReservationsFound,

    // === EXPORT MESSAGES ===
    ExportCompleted(String), // path
    ExportFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError,
    ConfigValueOutOfRange(String, i64, i64, i64), // key, value, min, max
    ConfigModuleSchedule,
    ConfigModuleAttendance,
    ConfigModuleDashboard,
    ConfigModuleSettlement,
    ConfigModuleDatabase,

    // === PROMPTS ===
    PromptSelectModules,
    PromptUtcOffset,
    PromptCheckInLead,
    PromptCheckInGrace,
    PromptOngoingLead,
    PromptOngoingGrace,
    PromptUpcomingLimit,
    PromptLineItemLimit,
    PromptDatabasePath,

    // === DATABASE MESSAGES ===
    DbConnectionFailed,
    BackgroundTaskFailed(String),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
}
