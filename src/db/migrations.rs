//! Versioned schema migrations.
//!
//! Each migration runs once, in version order, and is recorded in the
//! `migrations` table. All pending migrations are applied inside a single
//! transaction so a failure leaves the schema where it was.
//!
//! ## Usage
//!
//! ```rust
//! use castline::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert_eq!(get_db_version(&conn)?, 4);
//! # Ok::<(), rusqlite::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use rusqlite::{params, Connection, Result, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: stores, the cast roster, catalogue tables and reservations
        self.add_migration(1, "create_core_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS stores (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS casts (
                    id INTEGER PRIMARY KEY,
                    store_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS customers (
                    id INTEGER PRIMARY KEY,
                    store_id INTEGER NOT NULL,
                    name TEXT,
                    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS courses (
                    id INTEGER PRIMARY KEY,
                    store_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    duration INTEGER,
                    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS areas (
                    id INTEGER PRIMARY KEY,
                    store_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS options (
                    id INTEGER PRIMARY KEY,
                    store_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    price INTEGER NOT NULL DEFAULT 0,
                    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS reservations (
                    id INTEGER PRIMARY KEY,
                    store_id INTEGER NOT NULL,
                    cast_id INTEGER NOT NULL,
                    customer_id INTEGER,
                    course_id INTEGER,
                    area_id INTEGER,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'confirmed', 'in_progress', 'completed', 'cancelled')),
                    price INTEGER NOT NULL DEFAULT 0,
                    staff_revenue INTEGER,
                    store_revenue INTEGER,
                    welfare_expense INTEGER,
                    designation_fee INTEGER,
                    transportation_fee INTEGER,
                    additional_fee INTEGER,
                    discount INTEGER,
                    check_in_at TEXT,
                    check_out_at TEXT,
                    location_memo TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    CHECK (end_time > start_time),
                    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE,
                    FOREIGN KEY (cast_id) REFERENCES casts(id) ON DELETE CASCADE,
                    FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE SET NULL,
                    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE SET NULL,
                    FOREIGN KEY (area_id) REFERENCES areas(id) ON DELETE SET NULL
                )",
                [],
            )?;

            // Name and price are copied at booking time
            tx.execute(
                "CREATE TABLE IF NOT EXISTS reservation_options (
                    id INTEGER PRIMARY KEY,
                    reservation_id INTEGER NOT NULL,
                    option_id INTEGER,
                    option_name TEXT,
                    option_price INTEGER,
                    FOREIGN KEY (reservation_id) REFERENCES reservations(id) ON DELETE CASCADE,
                    FOREIGN KEY (option_id) REFERENCES options(id) ON DELETE SET NULL
                )",
                [],
            )?;

            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_reservations_cast_start ON reservations(cast_id, store_id, start_time)",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_reservation_options_reservation ON reservation_options(reservation_id)",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_casts_store ON casts(store_id)", [])?;

            Ok(())
        });

        // Version 2: cast shifts; one slot per cast, no overlap on the same date
        self.add_migration(2, "add_cast_shifts", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS cast_shifts (
                    id INTEGER PRIMARY KEY,
                    cast_id INTEGER NOT NULL,
                    date DATE NOT NULL,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    is_available BOOLEAN NOT NULL DEFAULT TRUE,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE (cast_id, date, start_time, end_time),
                    CHECK (end_time > start_time),
                    FOREIGN KEY (cast_id) REFERENCES casts(id) ON DELETE CASCADE
                )",
                [],
            )?;

            // Half-open intervals: a shift ending at 12:00 and one starting at 12:00 do not overlap
            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS cast_shifts_no_overlap
                BEFORE INSERT ON cast_shifts
                WHEN EXISTS (
                    SELECT 1 FROM cast_shifts
                    WHERE cast_id = NEW.cast_id
                      AND date = NEW.date
                      AND start_time < NEW.end_time
                      AND NEW.start_time < end_time
                )
                BEGIN
                    SELECT RAISE(ABORT, 'cast shift overlaps an existing shift');
                END",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_cast_shifts_cast_date ON cast_shifts(cast_id, date)", [])?;
            Ok(())
        });

        // Version 3: staff-submitted attendance correction requests
        self.add_migration(3, "add_attendance_requests", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS attendance_requests (
                    id INTEGER PRIMARY KEY,
                    reservation_id INTEGER NOT NULL,
                    cast_id INTEGER NOT NULL,
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'in_review', 'approved', 'rejected')),
                    request_type TEXT NOT NULL,
                    requested_at TEXT NOT NULL,
                    reason TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (reservation_id) REFERENCES reservations(id) ON DELETE CASCADE,
                    FOREIGN KEY (cast_id) REFERENCES casts(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_attendance_requests_cast_status ON attendance_requests(cast_id, status)",
                [],
            )?;
            Ok(())
        });

        // Version 4: a cast cannot hold two live bookings at once
        self.add_migration(4, "add_reservation_overlap_guard", |tx| {
            tx.execute(
                "CREATE TRIGGER IF NOT EXISTS reservations_no_overlap
                BEFORE INSERT ON reservations
                WHEN NEW.status <> 'cancelled' AND EXISTS (
                    SELECT 1 FROM reservations
                    WHERE cast_id = NEW.cast_id
                      AND status <> 'cancelled'
                      AND start_time < NEW.end_time
                      AND NEW.start_time < end_time
                )
                BEGIN
                    SELECT RAISE(ABORT, 'reservation overlaps an existing booking');
                END",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// `(version, name, applied_at)` for every applied migration, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>>>()?;

        Ok(history)
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
