//! Terminal rendering for plancal types.
//!
//! Extension traits and grid builders that turn core types into colored
//! text using owo_colors.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

use plancal_core::date::{WEEK_DAYS, format_date, week_dates, weeks_of_month};
use plancal_core::filter::events_for_day;
use plancal_core::notification::notification_label;
use plancal_core::{Event, Notification, holidays_for_month};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

fn lead_time_label(minutes: u32) -> String {
    notification_label(minutes)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}분 전", minutes))
}

impl Render for Event {
    fn render(&self) -> String {
        let form = &self.form;
        let mut lines = Vec::new();

        let marker = if self.is_recurring() { "↻ " } else { "" };
        lines.push(format!("{}{} {}", marker, form.title.bold(), format!("[{}]", self.id).dimmed()));
        lines.push(format!("   {} {}-{}", form.date, form.start_time, form.end_time));

        if !form.description.is_empty() {
            lines.push(format!("   {}", form.description));
        }
        if !form.location.is_empty() {
            lines.push(format!("   위치: {}", form.location));
        }
        if !form.category.is_empty() {
            lines.push(format!("   카테고리: {}", form.category));
        }
        if let Some(repeat) = form.repeat.describe() {
            lines.push(format!("   반복: {}", repeat).cyan().to_string());
        }
        lines.push(format!("   알림: {}", lead_time_label(form.notification_time)).dimmed().to_string());

        lines.join("\n")
    }
}

impl Render for Notification {
    fn render(&self) -> String {
        format!("🔔 {}", self.message.yellow())
    }
}

/// Render events as a list of cards, or the empty-result message.
pub fn render_event_list(events: &[Event]) -> String {
    if events.is_empty() {
        return "검색 결과가 없습니다.".dimmed().to_string();
    }

    events
        .iter()
        .map(Render::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn titles(events: &[Event]) -> String {
    events
        .iter()
        .map(|event| event.form.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per day of the Sunday-first week containing `date`.
///
/// `events` should already be narrowed to that week.
pub fn render_week(date: NaiveDate, events: &[Event]) -> String {
    week_dates(date)
        .iter()
        .zip(WEEK_DAYS)
        .map(|(day, label)| {
            let day_events: Vec<Event> = events
                .iter()
                .filter(|event| event.form.date == day.format("%Y-%m-%d").to_string())
                .cloned()
                .collect();

            let heading = format!("{} {:>2}/{:<2}", label, day.month(), day.day());
            if day_events.is_empty() {
                heading.dimmed().to_string()
            } else {
                format!("{}  {}", heading.bold(), titles(&day_events))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Month grid with a dot under days that have events and holidays in red,
/// followed by the holiday and events of each such day.
///
/// `events` should already be narrowed to that month.
pub fn render_month(date: NaiveDate, events: &[Event]) -> String {
    let holidays = holidays_for_month(date);
    let holiday = |day: u32| holidays.get(&format_date(date, Some(day))).copied();

    let mut lines = vec![WEEK_DAYS.map(|label| format!("{:<4}", label)).concat().bold().to_string()];

    for row in weeks_of_month(date) {
        let cells: String = row
            .iter()
            .map(|cell| match cell {
                Some(day) => {
                    let busy = !events_for_day(events, *day).is_empty();
                    let text = format!("{:>2}{} ", day, if busy { "•" } else { " " });
                    match (holiday(*day), busy) {
                        (Some(_), _) => text.red().to_string(),
                        (None, true) => text.green().to_string(),
                        (None, false) => text,
                    }
                }
                None => "    ".to_string(),
            })
            .collect();
        lines.push(cells.trim_end().to_string());
    }

    let notable_days: Vec<String> = (1..=31)
        .filter_map(|day| {
            let day_events = events_for_day(events, day);
            let mut parts = Vec::new();
            if let Some(name) = holiday(day) {
                parts.push(name.red().to_string());
            }
            if !day_events.is_empty() {
                parts.push(titles(&day_events));
            }
            (!parts.is_empty()).then(|| format!("{:>2}일  {}", day, parts.join("  ")))
        })
        .collect();

    if !notable_days.is_empty() {
        lines.push(String::new());
        lines.extend(notable_days);
    }

    lines.join("\n")
}
