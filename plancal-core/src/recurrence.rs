//! Recurrence expansion for repeating events.
//!
//! A repeating form is materialized into concrete instances before it is sent
//! to the store. Each instance is computed from the anchor date directly
//! (`anchor + interval * i`) rather than from the previous instance, so month
//! end clamping never drifts (Jan 31, Feb 29, Mar 31, Apr 30, ...).

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::date::{advance, format_date, parse_date};
use crate::event::{Event, EventForm, EventLike, RecurrenceGroupId, RecurrenceRule, RepeatType};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Upper bound on the capacity reserved up front by `expand`.
const MAX_PREALLOCATED: usize = 1024;

fn ceil_div(value: i64, unit: i64) -> i64 {
    let quotient = value.div_euclid(unit);
    if value.rem_euclid(unit) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

/// How many candidate instances to generate for `event`.
///
/// Measured from `now` to the end of the rule's end date, or of `horizon`
/// when the rule is open-ended. Days and weeks are ceiling-rounded elapsed
/// time; months and years are plain calendar differences. This sizes the
/// generation only; `expand` still drops candidates past the end date.
/// Never less than 1, so the anchor itself is always kept.
pub fn max_instance_count<E: EventLike>(event: &E, now: NaiveDateTime, horizon: NaiveDate) -> usize {
    let rule = &event.form().repeat;
    if rule.kind.is_none() {
        return 1;
    }

    let bound_date = rule.end_date.unwrap_or(horizon);
    let Some(bound) = bound_date.and_hms_opt(23, 59, 59) else {
        return 1;
    };

    let elapsed_ms = (bound - now).num_milliseconds();
    let count = match rule.kind {
        RepeatType::Daily => ceil_div(elapsed_ms, MS_PER_DAY),
        RepeatType::Weekly => ceil_div(elapsed_ms, MS_PER_WEEK),
        RepeatType::Monthly => {
            i64::from(bound.year() - now.year()) * 12 + i64::from(bound.month())
                - i64::from(now.month())
        }
        RepeatType::Yearly => i64::from(bound.year() - now.year()),
        RepeatType::None => 1,
    };

    usize::try_from(count.max(1)).unwrap_or(1)
}

/// Generate up to `count` instances of `anchor`, in chronological order.
///
/// Only `date` differs between instances. Candidates after the rule's end
/// date are dropped, except the first one, which is the anchor itself. A
/// non-repeating anchor, or one whose date does not parse, yields just the
/// anchor.
pub fn expand<E: EventLike + Clone>(anchor: &E, count: usize) -> Vec<E> {
    let rule = &anchor.form().repeat;
    if rule.kind.is_none() {
        return vec![anchor.clone()];
    }

    let Some(base) = parse_date(&anchor.form().date) else {
        debug!(date = %anchor.form().date, "anchor date does not parse, not expanding");
        return vec![anchor.clone()];
    };

    let mut instances = Vec::with_capacity(count.min(MAX_PREALLOCATED));

    for i in 0..count {
        let Some(step) = u32::try_from(i)
            .ok()
            .and_then(|i| rule.interval.checked_mul(i))
        else {
            break;
        };
        let Some(date) = advance(base, step, rule.kind) else {
            break;
        };

        // Instance dates never decrease, so the first one past the end closes the series.
        if i > 0 && rule.end_date.is_some_and(|end| date > end) {
            break;
        }

        let mut instance = anchor.clone();
        instance.form_mut().date = format_date(date, None);
        instances.push(instance);
    }

    debug!(
        kind = %rule.kind,
        interval = rule.interval,
        requested = count,
        generated = instances.len(),
        "expanded recurrence"
    );

    instances
}

/// `expand` sized by `max_instance_count`.
pub fn expand_series<E: EventLike + Clone>(anchor: &E, now: NaiveDateTime, horizon: NaiveDate) -> Vec<E> {
    expand(anchor, max_instance_count(anchor, now, horizon))
}

/// Members of a recurrence group, in collection order.
pub fn series_members(events: &[Event], group: &RecurrenceGroupId) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.series() == Some(group))
        .cloned()
        .collect()
}

/// Apply an edit to every member of a series.
///
/// Each result carries `template`'s fields but keeps the member's own id,
/// date and group id.
pub fn apply_to_series<E: EventLike>(template: &E, members: &[Event]) -> Vec<Event> {
    let template = template.form();

    members
        .iter()
        .map(|member| {
            let repeat = RecurrenceRule {
                id: member.form.repeat.id.clone(),
                ..template.repeat.clone()
            };

            Event {
                id: member.id.clone(),
                form: EventForm {
                    date: member.form.date.clone(),
                    repeat,
                    ..template.clone()
                },
            }
        })
        .collect()
}

/// Take one instance out of its series ("edit only this one").
pub fn detach(event: &Event) -> Event {
    let mut detached = event.clone();
    detached.form.repeat = RecurrenceRule::none();
    detached
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        ymd(y, m, d).and_hms_opt(0, 0, 0).unwrap()
    }

    fn horizon() -> NaiveDate {
        ymd(2025, 6, 30)
    }

    fn form_with(date: &str, rule: RecurrenceRule) -> EventForm {
        let mut form = EventForm::new("새로운 회의", date, "09:00", "10:00");
        form.description = "새로운 팀 미팅".to_string();
        form.location = "회의실 A".to_string();
        form.category = "업무".to_string();
        form.repeat = rule;
        form
    }

    fn dates<E: EventLike>(events: &[E]) -> Vec<&str> {
        events.iter().map(|e| e.form().date.as_str()).collect()
    }

    // --- max_instance_count ---

    #[test]
    fn count_is_one_without_recurrence() {
        let form = form_with("2024-07-01", RecurrenceRule::none());
        assert_eq!(max_instance_count(&form, midnight(2024, 7, 1), horizon()), 1);
    }

    #[test]
    fn daily_count_runs_to_horizon_when_open_ended() {
        let form = form_with("2024-07-01", RecurrenceRule::new(RepeatType::Daily, 1, None));
        assert_eq!(max_instance_count(&form, midnight(2024, 7, 1), horizon()), 365);
    }

    #[test]
    fn daily_count_runs_to_end_date() {
        let rule = RecurrenceRule::new(RepeatType::Daily, 1, Some(ymd(2025, 4, 30)));
        let form = form_with("2024-07-01", rule);
        assert_eq!(max_instance_count(&form, midnight(2024, 7, 1), horizon()), 304);
    }

    #[test]
    fn weekly_count_is_ceiling_of_weeks() {
        let rule = RecurrenceRule::new(RepeatType::Weekly, 1, Some(ymd(2025, 4, 30)));
        let form = form_with("2024-07-01", rule);
        // 303 days and 23:59:59 is a little over 43 weeks
        assert_eq!(max_instance_count(&form, midnight(2024, 7, 1), horizon()), 44);
    }

    #[test]
    fn monthly_count_is_calendar_month_difference() {
        let rule = RecurrenceRule::new(RepeatType::Monthly, 1, Some(ymd(2025, 4, 30)));
        let form = form_with("2024-07-01", rule);
        assert_eq!(max_instance_count(&form, midnight(2024, 7, 1), horizon()), 9);
    }

    #[test]
    fn yearly_count_is_calendar_year_difference() {
        let rule = RecurrenceRule::new(RepeatType::Yearly, 1, Some(ymd(2025, 4, 30)));
        let form = form_with("2024-07-01", rule);
        assert_eq!(max_instance_count(&form, midnight(2024, 7, 1), horizon()), 1);
    }

    #[test]
    fn count_never_drops_below_one_after_horizon() {
        let form = form_with("2026-03-01", RecurrenceRule::new(RepeatType::Daily, 1, None));
        assert_eq!(max_instance_count(&form, midnight(2026, 3, 1), horizon()), 1);
    }

    // --- expand ---

    #[test]
    fn non_repeating_form_expands_to_itself() {
        let form = form_with("2024-10-16", RecurrenceRule::none());
        assert_eq!(expand(&form, 1), vec![form.clone()]);
        assert_eq!(expand(&form, 5), vec![form]);
    }

    #[test]
    fn daily_expansion_steps_by_interval() {
        let form = form_with("2024-10-16", RecurrenceRule::new(RepeatType::Daily, 5, None));
        let instances = expand(&form, 5);
        assert_eq!(
            dates(&instances),
            vec!["2024-10-16", "2024-10-21", "2024-10-26", "2024-10-31", "2024-11-05"]
        );
        assert!(instances.iter().all(|e| e.title == "새로운 회의"));
    }

    #[test]
    fn weekly_yearly_and_monthly_expansions_have_requested_length() {
        for (kind, interval) in [
            (RepeatType::Weekly, 3),
            (RepeatType::Monthly, 2),
            (RepeatType::Yearly, 1),
        ] {
            let form = form_with("2024-10-16", RecurrenceRule::new(kind, interval, None));
            assert_eq!(expand(&form, 5).len(), 5, "{}", kind);
        }
    }

    #[test]
    fn monthly_expansion_clamps_without_drift() {
        let form = form_with("2024-01-31", RecurrenceRule::new(RepeatType::Monthly, 1, None));
        let instances = expand(&form, 4);
        assert_eq!(
            dates(&instances),
            vec!["2024-01-31", "2024-02-29", "2024-03-31", "2024-04-30"]
        );
    }

    #[test]
    fn expansion_drops_instances_after_end_date() {
        let rule = RecurrenceRule::new(RepeatType::Daily, 10, Some(ymd(2024, 7, 31)));
        let form = form_with("2024-07-16", rule);
        let instances = expand(&form, 10);
        assert_eq!(dates(&instances), vec!["2024-07-16", "2024-07-26"]);
    }

    #[test]
    fn end_date_is_inclusive() {
        let rule = RecurrenceRule::new(RepeatType::Weekly, 1, Some(ymd(2024, 7, 15)));
        let form = form_with("2024-07-01", rule);
        assert_eq!(
            dates(&expand(&form, 10)),
            vec!["2024-07-01", "2024-07-08", "2024-07-15"]
        );
    }

    #[test]
    fn anchor_is_kept_even_after_end_date() {
        let rule = RecurrenceRule::new(RepeatType::Daily, 1, Some(ymd(2024, 6, 1)));
        let form = form_with("2024-07-01", rule);
        assert_eq!(dates(&expand(&form, 3)), vec!["2024-07-01"]);
    }

    #[test]
    fn zero_interval_repeats_anchor_date() {
        let form = form_with("2024-07-01", RecurrenceRule::new(RepeatType::Daily, 0, None));
        assert_eq!(dates(&expand(&form, 3)), vec!["2024-07-01"; 3]);
    }

    #[test]
    fn malformed_anchor_date_is_not_expanded() {
        let form = form_with("2024-07-32", RecurrenceRule::new(RepeatType::Daily, 1, None));
        assert_eq!(expand(&form, 3), vec![form]);
    }

    #[test]
    fn expand_series_uses_instance_count() {
        let rule = RecurrenceRule::new(RepeatType::Monthly, 1, Some(ymd(2024, 12, 31)));
        let form = form_with("2024-07-31", rule);
        let instances = expand_series(&form, midnight(2024, 7, 1), horizon());
        assert_eq!(
            dates(&instances),
            vec!["2024-07-31", "2024-08-31", "2024-09-30", "2024-10-31", "2024-11-30"]
        );
    }

    // --- series editing ---

    fn series() -> Vec<Event> {
        let mut rule = RecurrenceRule::new(RepeatType::Daily, 10, Some(ymd(2024, 7, 31)));
        rule.id = Some(RecurrenceGroupId::new("g1"));
        vec![
            Event::new("1", form_with("2024-07-16", rule.clone())),
            Event::new("2", form_with("2024-07-26", rule)),
            Event::new("3", form_with("2024-07-20", RecurrenceRule::none())),
        ]
    }

    #[test]
    fn series_members_filters_by_group() {
        let events = series();
        let members = series_members(&events, &RecurrenceGroupId::new("g1"));
        assert_eq!(members.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn apply_to_series_keeps_ids_and_dates() {
        let events = series();
        let members = series_members(&events, &RecurrenceGroupId::new("g1"));

        let mut template = events[0].clone();
        template.form.title = "수정된 회의".to_string();

        let updated = apply_to_series(&template, &members);

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].id, "1");
        assert_eq!(updated[1].id, "2");
        assert_eq!(updated[1].form.date, "2024-07-26");
        assert!(updated.iter().all(|e| e.form.title == "수정된 회의"));
        assert!(updated.iter().all(|e| e.series() == Some(&RecurrenceGroupId::new("g1"))));
    }

    #[test]
    fn detach_clears_recurrence() {
        let events = series();
        let detached = detach(&events[0]);
        assert_eq!(detached.id, "1");
        assert_eq!(detached.form.repeat, RecurrenceRule::none());
        assert!(detached.series().is_none());
    }
}
