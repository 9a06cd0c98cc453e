use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use plancal_core::{SystemClock, View};
use plancal_core::date::{format_month, format_week};
use plancal_core::filter::filter_by_view;

use super::PeriodArgs;
use crate::client::Client;
use crate::render::{render_month, render_week};

#[derive(Args, Debug, Clone)]
pub struct CalendarArgs {
    #[command(flatten)]
    pub period: PeriodArgs,
}

pub async fn run(args: CalendarArgs, client: &Client) -> Result<()> {
    let view = args.period.view;
    let current = args.period.current(&SystemClock);
    let events = filter_by_view(&client.list_events().await?, current, view);

    match view {
        View::Week => {
            println!("{}", format_week(current).bold());
            println!("{}", render_week(current, &events));
        }
        View::Month => {
            println!("{}", format_month(current).bold());
            println!("{}", render_month(current, &events));
        }
    }

    Ok(())
}
