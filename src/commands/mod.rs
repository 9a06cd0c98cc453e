pub mod add;
pub mod calendar;
pub mod delete;
pub mod edit;
pub mod list;
pub mod watch;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use plancal_core::date::{Direction, View, navigate, parse_date};
use plancal_core::overlap::to_interval;
use plancal_core::{Clock, Event, EventLike, OverlapPolicy, RepeatType};

/// Normalize a `YYYY-MM-DD` argument.
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

/// Normalize an `H:MM` / `HH:MM` argument to `HH:MM`.
pub fn parse_time_arg(value: &str) -> Result<String, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| format!("invalid time '{}', expected HH:MM", value))
}

pub fn parse_repeat_arg(value: &str) -> Result<RepeatType, String> {
    match value.to_lowercase().as_str() {
        "none" => Ok(RepeatType::None),
        "daily" => Ok(RepeatType::Daily),
        "weekly" => Ok(RepeatType::Weekly),
        "monthly" => Ok(RepeatType::Monthly),
        "yearly" => Ok(RepeatType::Yearly),
        _ => Err(format!(
            "invalid repeat '{}', expected none, daily, weekly, monthly or yearly",
            value
        )),
    }
}

pub fn parse_view_arg(value: &str) -> Result<View, String> {
    match value.to_lowercase().as_str() {
        "week" => Ok(View::Week),
        "month" => Ok(View::Month),
        _ => Err(format!("invalid view '{}', expected week or month", value)),
    }
}

/// Which week or month to show.
#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    /// week or month
    #[arg(long, default_value = "month", value_parser = parse_view_arg)]
    pub view: View,

    /// Any date inside the period (YYYY-MM-DD, default today)
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Move this many weeks/months forward (negative for back)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub shift: i32,
}

impl PeriodArgs {
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        let direction = if self.shift < 0 { Direction::Prev } else { Direction::Next };
        (0..self.shift.unsigned_abs()).fold(self.date.unwrap_or(today), |date, _| {
            navigate(date, direction, self.view)
        })
    }

    /// The date to show, counting "today" from `clock`.
    pub fn current(&self, clock: &impl Clock) -> NaiveDate {
        self.resolve(clock.now().date())
    }
}

/// An existing event that a new or edited event would overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub event: Event,
    /// Longest shared stretch with any candidate. Zero for touching events.
    pub minutes: i64,
}

/// Pool events conflicting with any candidate, each reported once.
pub fn collect_conflicts<E: EventLike>(
    policy: OverlapPolicy,
    candidates: &[E],
    pool: &[Event],
) -> Vec<Conflict> {
    let mut conflicts: Vec<Conflict> = Vec::new();
    for candidate in candidates {
        let interval = to_interval(candidate);
        for event in policy.find_overlapping(candidate, pool) {
            let minutes = interval.overlap_minutes(&to_interval(&event)).unwrap_or(0);
            match conflicts.iter_mut().find(|known| known.event.id == event.id) {
                Some(known) => known.minutes = known.minutes.max(minutes),
                None => conflicts.push(Conflict { event, minutes }),
            }
        }
    }
    conflicts
}

/// Show the conflicting events and ask whether to save anyway.
pub fn confirm_overlaps(conflicts: &[Conflict]) -> Result<bool> {
    println!("{}", "일정 겹침 경고".yellow().bold());
    println!("다음 일정과 겹칩니다:");
    for Conflict { event, minutes } in conflicts {
        println!(
            "  {} ({} {}-{}) {}",
            event.form.title,
            event.form.date,
            event.form.start_time,
            event.form.end_time,
            format!("{}분 겹침", minutes).dimmed()
        );
    }

    let proceed = Confirm::new()
        .with_prompt("계속 진행하시겠습니까?")
        .default(false)
        .interact()?;

    Ok(proceed)
}
