use anyhow::Result;
use clap::Args;
use chrono::NaiveDate;
use dialoguer::Select;
use owo_colors::OwoColorize;

use plancal_core::recurrence::{apply_to_series, detach, series_members};
use plancal_core::validation::validate_form;
use plancal_core::{Event, EventForm, PlanCalConfig, PlanCalError, RepeatType};

use super::{collect_conflicts, confirm_overlaps, parse_date_arg, parse_repeat_arg, parse_time_arg};
use crate::client::Client;

#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    /// Id of the event to change
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    #[arg(short, long, value_parser = parse_time_arg)]
    pub start: Option<String>,

    #[arg(short, long, value_parser = parse_time_arg)]
    pub end: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    /// Minutes before the start to notify
    #[arg(short, long)]
    pub notify: Option<u32>,

    /// New repeat: daily, weekly, monthly or yearly
    #[arg(short, long, value_parser = parse_repeat_arg)]
    pub repeat: Option<RepeatType>,

    /// Repeat every N days/weeks/months/years
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub interval: Option<u32>,

    /// New last day of the repetition (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub until: Option<NaiveDate>,

    /// Apply to every event in the series
    #[arg(long, conflicts_with = "single")]
    pub all: bool,

    /// Apply to this occurrence only, taking it out of its series
    #[arg(long)]
    pub single: bool,

    /// Save even if the event overlaps existing ones
    #[arg(short, long)]
    pub force: bool,
}

/// How far an edit of a repeating event reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Single,
    Series,
}

pub async fn run(args: EditArgs, client: &Client, config: &PlanCalConfig) -> Result<()> {
    let events = client.list_events().await?;
    let current = events
        .iter()
        .find(|event| event.id == args.id)
        .ok_or_else(|| PlanCalError::EventNotFound(args.id.clone()))?;

    let edited = Event::new(current.id.clone(), apply_overrides(&current.form, &args));
    validate_form(&edited.form, args.repeat.is_some())?;

    let scope = resolve_scope(current, &args)?;
    let changes = match (scope, current.series()) {
        (Scope::Series, Some(group)) => apply_to_series(&edited, &series_members(&events, group)),
        _ if current.is_recurring() => vec![detach(&edited)],
        _ => vec![edited],
    };

    let conflicts = collect_conflicts(config.overlap_policy, &changes, &events);
    if !conflicts.is_empty() && !args.force && !confirm_overlaps(&conflicts)? {
        println!("{}", "취소되었습니다.".dimmed());
        return Ok(());
    }

    match scope {
        Scope::Series => {
            let updated = client.update_events(&changes).await?;
            println!("{}", format!("일정 {}개가 수정되었습니다.", updated.len()).green());
        }
        Scope::Single => {
            for event in &changes {
                client.update_event(event).await?;
            }
            println!("{}", "일정이 수정되었습니다.".green());
        }
    }

    Ok(())
}

/// `form` with every field given on the command line replaced.
fn apply_overrides(form: &EventForm, args: &EditArgs) -> EventForm {
    let mut form = form.clone();
    if let Some(title) = &args.title {
        form.title = title.clone();
    }
    if let Some(date) = args.date {
        form.date = date.format("%Y-%m-%d").to_string();
    }
    if let Some(start) = &args.start {
        form.start_time = start.clone();
    }
    if let Some(end) = &args.end {
        form.end_time = end.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if let Some(location) = &args.location {
        form.location = location.clone();
    }
    if let Some(category) = &args.category {
        form.category = category.clone();
    }
    if let Some(notify) = args.notify {
        form.notification_time = notify;
    }
    if let Some(kind) = args.repeat {
        form.repeat.kind = kind;
    }
    if let Some(interval) = args.interval {
        form.repeat.interval = interval;
    }
    if let Some(until) = args.until {
        form.repeat.end_date = Some(until);
    }
    form
}

fn resolve_scope(event: &Event, args: &EditArgs) -> Result<Scope> {
    if event.series().is_none() || !event.is_recurring() {
        return Ok(Scope::Single);
    }
    if args.all {
        return Ok(Scope::Series);
    }
    if args.single {
        return Ok(Scope::Single);
    }

    let selection = Select::new()
        .with_prompt("  반복 일정 수정")
        .items(&["이 일정만", "모든 반복 일정"])
        .default(0)
        .interact()?;

    Ok(if selection == 1 { Scope::Series } else { Scope::Single })
}
