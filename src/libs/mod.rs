//! Core library for castline.
//!
//! Pure computation lives in [`time_window`], [`projection`], [`attendance`],
//! [`dashboard`] and [`settlement`]; none of them read the clock. The
//! [`portal`] wires them to a [`store::CastStore`] and fans reads out
//! concurrently. The remaining modules are the ambient pieces shared with the
//! command line: configuration, messages, formatting, tables and export.

pub mod attendance;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod formatter;
pub mod messages;
pub mod portal;
pub mod projection;
pub mod query;
pub mod reservation;
pub mod schedule;
pub mod settlement;
pub mod store;
pub mod time_window;
pub mod view;
