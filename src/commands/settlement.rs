use super::{open_portal, parse_month, print_json, CastTarget};
use crate::libs::export::{ExportFormat, SettlementExporter};
use crate::libs::{messages::Message, view::View};
use crate::{msg_bail_anyhow, msg_print, msg_success};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SettlementArgs {
    #[command(flatten)]
    target: CastTarget,

    /// Month to settle (YYYY-MM); defaults to the month containing now
    #[arg(short, long, value_parser = parse_month)]
    month: Option<NaiveDate>,

    /// Write the settlement to a file in this format
    #[arg(short, long, value_enum)]
    export: Option<ExportFormat>,

    /// Output file for --export
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn cmd(args: SettlementArgs) -> Result<()> {
    let portal = open_portal()?;
    let tz = portal.rules().time_zone;

    let at = match args.month {
        Some(first_day) => match tz.from_local_datetime(&first_day.and_time(NaiveTime::MIN)).single() {
            Some(local) => local.with_timezone(&Utc),
            None => msg_bail_anyhow!(Message::InvalidMonth(first_day.format("%Y-%m").to_string())),
        },
        None => args.target.now(),
    };

    let summary = portal.settlement(args.target.cast, args.target.store, at).await?;

    if let Some(format) = args.export {
        let path = SettlementExporter::new(format, args.output, tz).export(args.target.cast, &summary)?;
        msg_success!(Message::ExportCompleted(path.display().to_string()));
        return Ok(());
    }

    if args.target.json {
        return print_json(&summary);
    }

    let month = summary.period.start.with_timezone(&tz).format("%Y-%m").to_string();
    msg_print!(Message::SettlementHeader(month), true);
    View::settlement(&summary, &tz);
    Ok(())
}
