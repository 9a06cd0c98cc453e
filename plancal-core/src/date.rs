//! Calendar arithmetic: month lengths, week rows, labels and recurrence steps.
//!
//! Weeks start on Sunday throughout. All dates are naive local dates; there is
//! no timezone handling anywhere in plancal.

use std::fmt::Display;

use chrono::{Datelike, Days, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::RepeatType;

/// Column labels for a Sunday-first week.
pub const WEEK_DAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// One row of a month grid. `None` cells fall outside the month.
pub type WeekRow = [Option<u32>; 7];

/// Calendar view granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Week,
    #[default]
    Month,
}

/// Navigation direction for `navigate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a 1-based month.
///
/// Out-of-range months roll over into neighbouring years: month 13 of 2024 is
/// January 2025, month 0 is December of the previous year.
pub fn days_in_month(year: i32, month: i32) -> u32 {
    let index = i64::from(year) * 12 + i64::from(month) - 1;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) + 1;

    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// The seven dates of the Sunday-first week containing `date`.
pub fn week_dates(date: NaiveDate) -> [NaiveDate; 7] {
    let sunday = date - Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    std::array::from_fn(|i| sunday + Duration::days(i as i64))
}

/// Rows of day numbers for the month containing `date`.
pub fn weeks_of_month(date: NaiveDate) -> Vec<WeekRow> {
    let first = first_of_month(date);
    let offset = first.weekday().num_days_from_sunday();
    let total = days_in_month(first.year(), first.month() as i32);

    let mut weeks = Vec::new();
    let mut week: WeekRow = [None; 7];

    for day in 1..=total {
        let index = ((offset + day - 1) % 7) as usize;
        week[index] = Some(day);

        if index == 6 || day == total {
            weeks.push(week);
            week = [None; 7];
        }
    }

    weeks
}

/// "2024년 7월 3주".
///
/// A week belongs to the month containing its Thursday, so boundary weeks go
/// to whichever month holds most of their days. Week 1 is the week holding
/// the month's first Thursday.
pub fn format_week(date: NaiveDate) -> String {
    let weekday = i64::from(date.weekday().num_days_from_sunday());
    let thursday = date + Duration::days(4 - weekday);

    let first = first_of_month(thursday);
    let first_weekday = i64::from(first.weekday().num_days_from_sunday());
    let first_thursday = first + Duration::days((4 - first_weekday + 7) % 7);

    let week_number = (thursday - first_thursday).num_days() / 7 + 1;

    format!(
        "{}년 {}월 {}주",
        thursday.year(),
        thursday.month(),
        week_number
    )
}

/// "2024년 7월".
pub fn format_month(date: NaiveDate) -> String {
    format!("{}년 {}월", date.year(), date.month())
}

/// `YYYY-MM-DD`, optionally replacing the day of month.
pub fn format_date(date: NaiveDate, day: Option<u32>) -> String {
    format!(
        "{}-{}-{}",
        date.year(),
        zero_pad2(date.month()),
        zero_pad2(day.unwrap_or(date.day()))
    )
}

/// Strict `YYYY-MM-DD` parse.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Inclusive on both ends. A reversed range contains nothing.
pub fn in_range<T: PartialOrd>(value: &T, start: &T, end: &T) -> bool {
    value >= start && value <= end
}

/// Step `date` forward by `interval` units of `kind`.
///
/// Monthly and yearly steps clamp to the last day of the target month
/// (Jan 31 + 1 month = Feb 29 in a leap year). Returns `None` only if the
/// result is outside chrono's representable range.
pub fn advance(date: NaiveDate, interval: u32, kind: RepeatType) -> Option<NaiveDate> {
    match kind {
        RepeatType::None => Some(date),
        RepeatType::Daily => date.checked_add_days(Days::new(u64::from(interval))),
        RepeatType::Weekly => date.checked_add_days(Days::new(u64::from(interval) * 7)),
        RepeatType::Monthly => date.checked_add_months(Months::new(interval)),
        RepeatType::Yearly => date.checked_add_months(Months::new(interval.checked_mul(12)?)),
    }
}

/// Move the calendar cursor one page.
///
/// Week views move by seven days. Month views snap to the first of the month
/// before moving, so Jan 31 never skips February.
pub fn navigate(date: NaiveDate, direction: Direction, view: View) -> NaiveDate {
    match view {
        View::Week => match direction {
            Direction::Next => date + Duration::days(7),
            Direction::Prev => date - Duration::days(7),
        },
        View::Month => {
            let first = first_of_month(date);
            let moved = match direction {
                Direction::Next => first.checked_add_months(Months::new(1)),
                Direction::Prev => first.checked_sub_months(Months::new(1)),
            };
            moved.unwrap_or(first)
        }
    }
}

/// Left-pad the rendered value with zeros up to `size` characters.
pub fn zero_pad<T: Display>(value: T, size: usize) -> String {
    format!("{:0>width$}", value.to_string(), width = size)
}

pub fn zero_pad2<T: Display>(value: T) -> String {
    zero_pad(value, 2)
}
