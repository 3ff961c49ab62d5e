//! Configuration management for castline.
//!
//! Settings live in `config.json` inside the platform data directory
//! resolved by [`DataStorage`]. Every section is optional; a missing file or
//! section falls back to the defaults the attendance and aggregation core
//! was designed around.
//!
//! ```rust,no_run
//! use castline::libs::config::Config;
//!
//! let config = Config::read()?;
//! let rules = config.rules();
//! println!("check-in opens {} minutes early", rules.attendance.check_in_lead_minutes);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::time_window::offset_from_minutes;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use chrono::FixedOffset;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the database file path.
pub const DB_PATH_ENV: &str = "CASTLINE_DB";

/// Largest accepted attendance window, one week either way.
pub const MAX_WINDOW_MINUTES: i64 = 7 * 24 * 60;

/// Largest accepted distance from UTC, just under a day.
pub const MAX_UTC_OFFSET_MINUTES: i64 = 24 * 60 - 1;

/// A configurable section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// The single time zone the whole system computes day and month windows in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Minutes east of UTC. 540 is JST.
    pub utc_offset_minutes: i32,
}

/// Time gates around a reservation.
///
/// Check-in is allowed strictly between `start - check_in_lead_minutes` and
/// `end + check_in_grace_minutes`. A reservation is "ongoing" while now lies
/// in `[start - ongoing_lead_minutes, end + ongoing_grace_minutes]`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AttendanceConfig {
    pub check_in_lead_minutes: i64,
    pub check_in_grace_minutes: i64,
    pub ongoing_lead_minutes: i64,
    pub ongoing_grace_minutes: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many upcoming reservations the dashboard fetches.
    pub upcoming_limit: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SettlementConfig {
    /// How many line items the settlement lists, most recent first.
    pub line_item_limit: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig { utc_offset_minutes: 540 }
    }
}

impl Default for AttendanceConfig {
    /// - 30 minutes early check-in
    /// - 60 minutes late check-in after the end
    /// - ongoing from 10 minutes before start until 15 minutes after end
    fn default() -> Self {
        AttendanceConfig {
            check_in_lead_minutes: 30,
            check_in_grace_minutes: 60,
            ongoing_lead_minutes: 10,
            ongoing_grace_minutes: 15,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig { upcoming_limit: 10 }
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        SettlementConfig { line_item_limit: 25 }
    }
}

/// Resolved settings handed to the core, with every default applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub time_zone: FixedOffset,
    pub attendance: AttendanceConfig,
    pub dashboard: DashboardConfig,
    pub settlement: SettlementConfig,
}

impl Default for Rules {
    fn default() -> Self {
        Config::default().rules()
    }
}

impl Config {
    /// Reads the configuration file, or returns defaults if there is none.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config =
            serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(format!("{}: {}", Message::ConfigParseError, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the time arithmetic cannot represent.
    pub fn validate(&self) -> Result<()> {
        let mut checks: Vec<(&str, i64, i64)> = Vec::new();
        if let Some(schedule) = &self.schedule {
            checks.push(("schedule.utc_offset_minutes", schedule.utc_offset_minutes.into(), MAX_UTC_OFFSET_MINUTES));
        }
        if let Some(attendance) = &self.attendance {
            checks.push(("attendance.check_in_lead_minutes", attendance.check_in_lead_minutes, MAX_WINDOW_MINUTES));
            checks.push(("attendance.check_in_grace_minutes", attendance.check_in_grace_minutes, MAX_WINDOW_MINUTES));
            checks.push(("attendance.ongoing_lead_minutes", attendance.ongoing_lead_minutes, MAX_WINDOW_MINUTES));
            checks.push(("attendance.ongoing_grace_minutes", attendance.ongoing_grace_minutes, MAX_WINDOW_MINUTES));
        }

        for (key, value, max) in checks {
            if !(-max..=max).contains(&value) {
                return Err(msg_error_anyhow!(format!(
                    "{}: {}",
                    Message::ConfigParseError,
                    Message::ConfigValueOutOfRange(key.to_string(), value, -max, max)
                )));
            }
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        let schedule = self.schedule.clone().unwrap_or_default();
        Rules {
            time_zone: offset_from_minutes(schedule.utc_offset_minutes),
            attendance: self.attendance.clone().unwrap_or_default(),
            dashboard: self.dashboard.clone().unwrap_or_default(),
            settlement: self.settlement.clone().unwrap_or_default(),
        }
    }

    /// Database file to open: `CASTLINE_DB`, then the configured path, then
    /// `castline.db` in the data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Ok(path) = env::var(DB_PATH_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        if let Some(path) = self.database.as_ref().and_then(|db| db.path.clone()) {
            return Ok(path);
        }
        Ok(DataStorage::new().get_path(crate::db::db::DB_FILE_NAME)?)
    }

    /// Interactive setup wizard; returns the edited configuration unsaved.
    pub fn init() -> Result<Self> {
        let mut config = Config::read()?;
        let modules = vec![
            ConfigModule {
                key: "schedule".to_string(),
                name: Message::ConfigModuleSchedule.to_string(),
            },
            ConfigModule {
                key: "attendance".to_string(),
                name: Message::ConfigModuleAttendance.to_string(),
            },
            ConfigModule {
                key: "dashboard".to_string(),
                name: Message::ConfigModuleDashboard.to_string(),
            },
            ConfigModule {
                key: "settlement".to_string(),
                name: Message::ConfigModuleSettlement.to_string(),
            },
            ConfigModule {
                key: "database".to_string(),
                name: Message::ConfigModuleDatabase.to_string(),
            },
        ];
        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&names)
            .interact()?;

        for index in selected {
            msg_print!(modules[index].name.as_str(), true);
            match modules[index].key.as_str() {
                "schedule" => {
                    let current = config.schedule.clone().unwrap_or_default();
                    config.schedule = Some(ScheduleConfig {
                        utc_offset_minutes: prompt(Message::PromptUtcOffset, current.utc_offset_minutes)?,
                    });
                }
                "attendance" => {
                    let current = config.attendance.clone().unwrap_or_default();
                    config.attendance = Some(AttendanceConfig {
                        check_in_lead_minutes: prompt(Message::PromptCheckInLead, current.check_in_lead_minutes)?,
                        check_in_grace_minutes: prompt(Message::PromptCheckInGrace, current.check_in_grace_minutes)?,
                        ongoing_lead_minutes: prompt(Message::PromptOngoingLead, current.ongoing_lead_minutes)?,
                        ongoing_grace_minutes: prompt(Message::PromptOngoingGrace, current.ongoing_grace_minutes)?,
                    });
                }
                "dashboard" => {
                    let current = config.dashboard.clone().unwrap_or_default();
                    config.dashboard = Some(DashboardConfig {
                        upcoming_limit: prompt(Message::PromptUpcomingLimit, current.upcoming_limit)?,
                    });
                }
                "settlement" => {
                    let current = config.settlement.clone().unwrap_or_default();
                    config.settlement = Some(SettlementConfig {
                        line_item_limit: prompt(Message::PromptLineItemLimit, current.line_item_limit)?,
                    });
                }
                "database" => {
                    let current = config
                        .database
                        .as_ref()
                        .and_then(|db| db.path.as_ref())
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(current)
                        .allow_empty(true)
                        .interact_text()?;
                    config.database = Some(DatabaseConfig {
                        path: (!path.trim().is_empty()).then(|| PathBuf::from(path.trim())),
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

fn prompt<T>(message: Message, default: T) -> Result<T>
where
    T: Clone + ToString + std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Debug + ToString,
{
    let value = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(message.to_string())
        .default(default)
        .interact_text()?;
    Ok(value)
}
