use super::{open_portal, print_json, CastTarget};
use crate::libs::{messages::Message, view::View};
use crate::msg_print;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(flatten)]
    target: CastTarget,
}

pub async fn cmd(args: AttendanceArgs) -> Result<()> {
    let portal = open_portal()?;
    let state = portal.attendance(args.target.cast, args.target.store, args.target.now()).await?;

    if args.target.json {
        return print_json(&state);
    }

    msg_print!(Message::AttendanceHeader(args.target.cast), true);
    View::attendance(&state, &portal.rules().time_zone);
    Ok(())
}
