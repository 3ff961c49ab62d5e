//! Command-line interface for castline.
//!
//! Every command captures the current instant once (or takes `--at`) and
//! hands it to the portal, so a single invocation sees a consistent "now".

pub mod attendance;
pub mod dashboard;
pub mod init;
pub mod migrations;
pub mod reservations;
pub mod settlement;
pub mod shift;

use crate::db::store::SqliteStore;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::portal::CastPortal;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Show the current attendance state of a cast member")]
    Attendance(attendance::AttendanceArgs),
    #[command(about = "Show dashboard statistics for a cast member")]
    Dashboard(dashboard::DashboardArgs),
    #[command(about = "Show or export the monthly settlement")]
    Settlement(settlement::SettlementArgs),
    #[command(about = "List reservations")]
    Reservations(reservations::ReservationsArgs),
    #[command(about = "Add or list shifts", arg_required_else_help = true)]
    Shift(shift::ShiftArgs),
    #[command(about = "Inspect database migrations", arg_required_else_help = true)]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Attendance(args) => attendance::cmd(args).await,
            Commands::Dashboard(args) => dashboard::cmd(args).await,
            Commands::Settlement(args) => settlement::cmd(args).await,
            Commands::Reservations(args) => reservations::cmd(args).await,
            Commands::Shift(args) => shift::cmd(args).await,
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Which cast member, and optionally which store, a command is about.
#[derive(Debug, Clone, Args)]
pub struct CastTarget {
    /// Cast member id
    #[arg(short, long)]
    pub cast: i64,

    /// Store id; resolved from the cast member when omitted
    #[arg(short, long)]
    pub store: Option<i64>,

    /// Evaluate at this instant (RFC 3339) instead of now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CastTarget {
    pub fn now(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}

/// Opens the configured database and wraps it in a portal.
pub(crate) fn open_portal() -> Result<CastPortal<SqliteStore>> {
    let config = Config::read()?;
    let store = SqliteStore::open(config.database_path()?).with_context(|| Message::DbConnectionFailed.to_string())?;
    Ok(CastPortal::new(Arc::new(store), config.rules()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn parse_instant(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| Message::InvalidTimestamp(value.to_string()).to_string())
}

pub fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| Message::InvalidDate(value.to_string()).to_string())
}

pub fn parse_time(value: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| Message::InvalidTime(value.to_string()).to_string())
}

/// `YYYY-MM` to the first day of that month.
pub fn parse_month(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").map_err(|_| Message::InvalidMonth(value.to_string()).to_string())
}
