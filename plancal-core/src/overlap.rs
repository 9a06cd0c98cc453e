//! Time-interval conflict detection between events.
//!
//! Events are same-day wall-clock intervals built from `date` + `startTime`
//! and `date` + `endTime`. Anything that fails to parse becomes
//! `EventInstant::Invalid`, and an invalid interval never conflicts with
//! anything.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::date::parse_date;
use crate::event::{Event, EventLike};

/// A parsed point in time, or the marker for unparseable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventInstant {
    At(NaiveDateTime),
    Invalid,
}

impl EventInstant {
    pub fn value(self) -> Option<NaiveDateTime> {
        match self {
            EventInstant::At(dt) => Some(dt),
            EventInstant::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, EventInstant::At(_))
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Combine a `YYYY-MM-DD` date and an `HH:MM` time.
pub fn parse_date_time(date: &str, time: &str) -> EventInstant {
    match (parse_date(date), parse_time(time)) {
        (Some(date), Some(time)) => EventInstant::At(date.and_time(time)),
        _ => EventInstant::Invalid,
    }
}

/// Start and end of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: EventInstant,
    pub end: EventInstant,
}

impl Interval {
    pub const INVALID: Interval = Interval {
        start: EventInstant::Invalid,
        end: EventInstant::Invalid,
    };

    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.start.value()?, self.end.value()?))
    }

    /// Length of the shared part of two intervals, in minutes.
    pub fn overlap_minutes(&self, other: &Interval) -> Option<i64> {
        let (a_start, a_end) = self.bounds()?;
        let (b_start, b_end) = other.bounds()?;

        let start = a_start.max(b_start);
        let end = a_end.min(b_end);
        (start < end).then(|| (end - start).num_minutes())
    }
}

/// Parse an event's interval. If either bound is malformed, both are invalid.
pub fn to_interval<E: EventLike>(event: &E) -> Interval {
    let form = event.form();
    let start = parse_date_time(&form.date, &form.start_time);
    let end = parse_date_time(&form.date, &form.end_time);

    if start.is_valid() && end.is_valid() {
        Interval { start, end }
    } else {
        Interval::INVALID
    }
}

/// Whether two intervals that merely touch (one ends as the other starts)
/// count as a conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Half-open intervals: `[14:00, 15:00)` and `[15:00, 16:00)` do not conflict.
    #[default]
    TouchingIsFree,
    /// Closed intervals: back-to-back events conflict.
    TouchingConflicts,
}

impl OverlapPolicy {
    pub fn intervals_overlap(self, a: &Interval, b: &Interval) -> bool {
        let (Some((a_start, a_end)), Some((b_start, b_end))) = (a.bounds(), b.bounds()) else {
            return false;
        };

        match self {
            OverlapPolicy::TouchingIsFree => a_start < b_end && b_start < a_end,
            OverlapPolicy::TouchingConflicts => a_start <= b_end && b_start <= a_end,
        }
    }

    pub fn overlaps<A: EventLike, B: EventLike>(self, a: &A, b: &B) -> bool {
        self.intervals_overlap(&to_interval(a), &to_interval(b))
    }

    /// Every pool event that conflicts with `candidate`, in pool order.
    ///
    /// An event with the candidate's own id is skipped, so an event being
    /// edited is never reported as conflicting with its stored self.
    pub fn find_overlapping<C: EventLike>(self, candidate: &C, pool: &[Event]) -> Vec<Event> {
        let interval = to_interval(candidate);
        let own_id = candidate.event_id();

        pool.iter()
            .filter(|event| own_id != Some(event.id.as_str()))
            .filter(|event| self.intervals_overlap(&interval, &to_interval(*event)))
            .cloned()
            .collect()
    }
}

/// `OverlapPolicy::overlaps` with the default policy.
pub fn overlaps<A: EventLike, B: EventLike>(a: &A, b: &B) -> bool {
    OverlapPolicy::default().overlaps(a, b)
}

/// `OverlapPolicy::find_overlapping` with the default policy.
pub fn find_overlapping<C: EventLike>(candidate: &C, pool: &[Event]) -> Vec<Event> {
    OverlapPolicy::default().find_overlapping(candidate, pool)
}
