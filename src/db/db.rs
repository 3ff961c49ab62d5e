use crate::db::migrations::init_with_migrations;
use crate::libs::config::Config;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Result, Row};
use std::path::Path;
use std::time::Duration;

/// How long a connection waits on another connection's write lock.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub const DB_FILE_NAME: &str = "castline.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database configured for this machine and applies migrations.
    pub fn new() -> anyhow::Result<Db> {
        let db_file_path = Config::read()?.database_path()?;
        Ok(Db::open(db_file_path)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        Db::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Db> {
        Db::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Db> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }
}

/// Fixed-width UTC form (`2024-05-01T01:00:00.000Z`); string order is time order.
pub fn to_sql_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_sql_timestamp(index: usize, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

pub(crate) fn timestamp_at(row: &Row, index: usize) -> Result<DateTime<Utc>> {
    parse_sql_timestamp(index, &row.get::<_, String>(index)?)
}

pub(crate) fn optional_timestamp_at(row: &Row, index: usize) -> Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(index)?
        .map(|value| parse_sql_timestamp(index, &value))
        .transpose()
}
