//! SQLite persistence for castline.
//!
//! [`db::Db`] opens a connection, enables foreign keys and applies the
//! versioned migrations. Table modules each wrap a shared
//! `Arc<Mutex<Connection>>`, and [`store::SqliteStore`] bundles them behind
//! the [`CastStore`](crate::libs::store::CastStore) trait.
//!
//! ```rust
//! use castline::db::store::SqliteStore;
//!
//! let store = SqliteStore::open_in_memory()?;
//! let store_id = store.casts().insert_store("Shibuya")?;
//! let cast_id = store.casts().insert_cast(store_id, "Aoi")?;
//! # let _ = cast_id;
//! # Ok::<(), castline::libs::error::CastError>(())
//! ```
//!
//! Timestamps are stored as millisecond RFC 3339 UTC text, so SQL string
//! comparison on `start_time` orders and filters chronologically.

/// Connection setup and timestamp column helpers.
pub mod db;

/// Schema versions and the `migrations` bookkeeping table.
pub mod migrations;

/// Staff correction requests counted on the dashboard.
pub mod attendance_requests;

/// Stores, cast roster and per-store catalogue.
pub mod casts;

/// Reservation queries and the booking insert.
pub mod reservations;

/// Cast shifts and their conflict-guarded insert.
pub mod shifts;

pub mod store;
