use super::{open_portal, parse_instant, print_json, CastTarget};
use crate::libs::query::{Comparator, ReservationListParams, SortOrder};
use crate::libs::{messages::Message, view::View};
use crate::msg_print;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(flatten)]
    target: CastTarget,

    /// Start-time bound (RFC 3339)
    #[arg(short, long, value_parser = parse_instant)]
    date: Option<DateTime<Utc>>,

    /// Inclusive range end (RFC 3339); requires --date
    #[arg(long, value_parser = parse_instant)]
    date_to: Option<DateTime<Utc>>,

    /// How --date bounds the start time when no range end is given
    #[arg(long, value_enum, default_value_t = Comparator::Gte)]
    comparator: Comparator,

    #[arg(short, long)]
    limit: Option<u32>,

    #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
    sort: SortOrder,

    /// Print the fee breakdown of each reservation
    #[arg(long)]
    fees: bool,
}

pub async fn cmd(args: ReservationsArgs) -> Result<()> {
    let portal = open_portal()?;
    let params = ReservationListParams {
        date: args.date,
        date_to: args.date_to,
        comparator: args.comparator,
        limit: args.limit,
        sort: args.sort,
    };
    let reservations = portal
        .reservations(args.target.cast, args.target.store, params, args.target.now())
        .await?;

    if args.target.json {
        return print_json(&reservations);
    }

    msg_print!(Message::ReservationsHeader(args.target.cast), true);
    if reservations.is_empty() {
        msg_print!(Message::NoReservationsFound);
        return Ok(());
    }

    View::reservations(&reservations, &portal.rules().time_zone);
    if args.fees {
        for reservation in &reservations {
            msg_print!(format!("#{}", reservation.id));
            View::fees(reservation);
        }
    }
    Ok(())
}
