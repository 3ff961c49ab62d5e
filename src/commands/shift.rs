//! Shift creation and listing.
//!
//! Times are entered as wall-clock `HH:MM` in the system time zone. An end
//! time at or before the start time is read as the next day, for overnight
//! shifts.

use super::{open_portal, parse_date, parse_time, print_json};
use crate::libs::schedule::NewShift;
use crate::libs::{messages::Message, view::View};
use crate::{msg_bail_anyhow, msg_print, msg_success};
use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ShiftArgs {
    #[command(subcommand)]
    command: ShiftCommand,
}

#[derive(Debug, Subcommand)]
enum ShiftCommand {
    /// Declare an availability window
    Add {
        #[arg(short, long)]
        cast: i64,
        #[arg(short, long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Record the window as unavailable
        #[arg(long)]
        unavailable: bool,
        #[arg(long)]
        json: bool,
    },
    /// List shifts dated within a range
    List {
        #[arg(short, long)]
        cast: i64,
        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,
        #[arg(long, value_parser = parse_date)]
        to: NaiveDate,
        #[arg(long)]
        json: bool,
    },
}

/// UTC window for a local date and wall-clock start/end.
pub fn shift_window(date: NaiveDate, start: NaiveTime, end: NaiveTime, tz: &FixedOffset) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let to_utc = |time: NaiveTime, day: NaiveDate| -> Result<DateTime<Utc>> {
        match tz.from_local_datetime(&day.and_time(time)).single() {
            Some(local) => Ok(local.with_timezone(&Utc)),
            None => msg_bail_anyhow!(Message::InvalidTime(time.format("%H:%M").to_string())),
        }
    };

    let start_at = to_utc(start, date)?;
    let end_day = if end <= start { date + Duration::days(1) } else { date };
    let end_at = to_utc(end, end_day)?;
    Ok((start_at, end_at))
}

pub async fn cmd(args: ShiftArgs) -> Result<()> {
    let portal = open_portal()?;
    let tz = portal.rules().time_zone;

    match args.command {
        ShiftCommand::Add {
            cast,
            date,
            start,
            end,
            unavailable,
            json,
        } => {
            let (start_time, end_time) = shift_window(date, start, end, &tz)?;
            let shift = portal
                .schedule_shift(NewShift {
                    cast_id: cast,
                    date,
                    start_time,
                    end_time,
                    is_available: !unavailable,
                })
                .await?;

            if json {
                return print_json(&shift);
            }
            msg_success!(Message::ShiftCreated(shift.id));
        }
        ShiftCommand::List { cast, from, to, json } => {
            let shifts = portal.shifts(cast, from, to).await?;

            if json {
                return print_json(&shifts);
            }
            msg_print!(Message::ShiftsHeader(cast), true);
            if shifts.is_empty() {
                msg_print!(Message::NoShiftsFound);
            } else {
                View::shifts(&shifts, &tz);
            }
        }
    }

    Ok(())
}
