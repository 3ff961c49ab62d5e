use super::{open_portal, print_json, CastTarget};
use crate::libs::{messages::Message, view::View};
use crate::msg_print;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    target: CastTarget,
}

pub async fn cmd(args: DashboardArgs) -> Result<()> {
    let portal = open_portal()?;
    let stats = portal.dashboard(args.target.cast, args.target.store, args.target.now()).await?;

    if args.target.json {
        return print_json(&stats);
    }

    msg_print!(Message::DashboardHeader(args.target.cast), true);
    View::dashboard(&stats);
    Ok(())
}
