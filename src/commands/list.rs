use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use plancal_core::{SystemClock, View};
use plancal_core::date::{format_month, format_week};
use plancal_core::filter::filtered_events;

use super::PeriodArgs;
use crate::client::Client;
use crate::render::render_event_list;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Only events whose title, description or location contains this
    #[arg(short, long, default_value = "")]
    pub search: String,
}

pub async fn run(args: ListArgs, client: &Client) -> Result<()> {
    let current = args.period.current(&SystemClock);
    let events = client.list_events().await?;
    let shown = filtered_events(&events, &args.search, current, args.period.view);

    let heading = match args.period.view {
        View::Week => format_week(current),
        View::Month => format_month(current),
    };
    println!("{}", heading.bold());
    println!();
    println!("{}", render_event_list(&shown));

    Ok(())
}
