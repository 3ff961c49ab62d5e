//! # Castline - cast attendance & schedule aggregation
//!
//! Derives a live attendance state per cast member, dashboard statistics and
//! monthly settlements from reservation records, and guards shift creation
//! against overlapping slots.
//!
//! - [`libs`]: time windows, projection, attendance, aggregators, portal
//! - [`db`]: SQLite store with versioned migrations
//! - [`commands`]: the `castline` command line
//!
//! ```rust,no_run
//! use castline::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
