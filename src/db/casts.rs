//! Stores, the cast roster and the per-store catalogue (customers, courses,
//! areas, add-on options).
//!
//! The core only reads from these tables; the insert helpers exist for the
//! booking side and for seeding test databases.

use crate::libs::error::{CastError, Result};
use crate::libs::messages::Message;
use crate::libs::reservation::{CastId, StoreId};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

const INSERT_STORE: &str = "INSERT INTO stores (name) VALUES (?1)";
const INSERT_CAST: &str = "INSERT INTO casts (store_id, name) VALUES (?1, ?2)";
const INSERT_CUSTOMER: &str = "INSERT INTO customers (store_id, name) VALUES (?1, ?2)";
const INSERT_COURSE: &str = "INSERT INTO courses (store_id, name, duration) VALUES (?1, ?2, ?3)";
const INSERT_AREA: &str = "INSERT INTO areas (store_id, name) VALUES (?1, ?2)";
const INSERT_OPTION: &str = "INSERT INTO options (store_id, name, price) VALUES (?1, ?2, ?3)";
const SELECT_CAST_STORE: &str = "SELECT c.store_id, s.id FROM casts c LEFT JOIN stores s ON s.id = c.store_id WHERE c.id = ?1";
const SELECT_STORE_EXISTS: &str = "SELECT COUNT(*) FROM stores WHERE id = ?1";
const SELECT_CAST_EXISTS: &str = "SELECT COUNT(*) FROM casts WHERE id = ?1";

pub struct Casts {
    pub conn: Arc<Mutex<Connection>>,
}

impl Casts {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Casts { conn }
    }

    pub fn insert_store(&self, name: &str) -> Result<StoreId> {
        let conn = self.conn.lock();
        conn.execute(INSERT_STORE, params![name])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_cast(&self, store_id: StoreId, name: &str) -> Result<CastId> {
        let conn = self.conn.lock();
        ensure_store(&conn, store_id)?;
        conn.execute(INSERT_CAST, params![store_id, name])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_customer(&self, store_id: StoreId, name: Option<&str>) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(INSERT_CUSTOMER, params![store_id, name])?;
        Ok(conn.last_insert_rowid())
    }

    /// `duration` is in minutes.
    pub fn insert_course(&self, store_id: StoreId, name: &str, duration: Option<i32>) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(INSERT_COURSE, params![store_id, name, duration])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_area(&self, store_id: StoreId, name: &str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(INSERT_AREA, params![store_id, name])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_option(&self, store_id: StoreId, name: &str, price: i64) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(INSERT_OPTION, params![store_id, name, price])?;
        Ok(conn.last_insert_rowid())
    }

    /// The store a cast member belongs to.
    pub fn resolve_store_id(&self, cast_id: CastId) -> Result<StoreId> {
        let conn = self.conn.lock();
        let row: Option<(StoreId, Option<StoreId>)> = conn
            .query_row(SELECT_CAST_STORE, params![cast_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        match row {
            None => Err(CastError::NotFound(Message::CastNotFound(cast_id))),
            Some((_, None)) => Err(CastError::NotFound(Message::CastStoreNotFound(cast_id))),
            Some((store_id, Some(_))) => Ok(store_id),
        }
    }
}

fn ensure_store(conn: &Connection, store_id: StoreId) -> Result<()> {
    let count: i64 = conn.query_row(SELECT_STORE_EXISTS, params![store_id], |row| row.get(0))?;
    if count == 0 {
        return Err(CastError::NotFound(Message::StoreNotFound(store_id)));
    }
    Ok(())
}

pub(crate) fn ensure_cast(conn: &Connection, cast_id: CastId) -> Result<()> {
    let count: i64 = conn.query_row(SELECT_CAST_EXISTS, params![cast_id], |row| row.get(0))?;
    if count == 0 {
        return Err(CastError::NotFound(Message::CastNotFound(cast_id)));
    }
    Ok(())
}
