//! Narrowing an event collection for display.

use chrono::{Datelike, NaiveDate};

use crate::date::{View, days_in_month, in_range, parse_date, week_dates};
use crate::event::Event;

/// Case-insensitive substring match on title, description or location.
/// An empty term matches everything.
pub fn search(events: &[Event], term: &str) -> Vec<Event> {
    let term = term.to_lowercase();
    events
        .iter()
        .filter(|event| {
            term.is_empty()
                || [&event.form.title, &event.form.description, &event.form.location]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

/// First and last day shown by `view` around `current`, both inclusive.
pub fn view_range(current: NaiveDate, view: View) -> (NaiveDate, NaiveDate) {
    match view {
        View::Week => {
            let week = week_dates(current);
            (week[0], week[6])
        }
        View::Month => {
            let first = current.with_day(1).unwrap_or(current);
            let last_day = days_in_month(current.year(), current.month() as i32);
            (first, current.with_day(last_day).unwrap_or(current))
        }
    }
}

/// Events whose date falls in the week or month containing `current`.
/// Events with an unparseable date are dropped.
pub fn filter_by_view(events: &[Event], current: NaiveDate, view: View) -> Vec<Event> {
    let (start, end) = view_range(current, view);
    events
        .iter()
        .filter(|event| parse_date(&event.form.date).is_some_and(|date| in_range(&date, &start, &end)))
        .cloned()
        .collect()
}

pub fn filtered_events(events: &[Event], term: &str, current: NaiveDate, view: View) -> Vec<Event> {
    filter_by_view(&search(events, term), current, view)
}

/// Events falling on day-of-month `day`, for a month grid cell.
pub fn events_for_day(events: &[Event], day: u32) -> Vec<Event> {
    events
        .iter()
        .filter(|event| parse_date(&event.form.date).is_some_and(|date| date.day() == day))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventForm;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> Vec<Event> {
        let make = |id: &str, title: &str, date: &str, description: &str, location: &str| {
            let mut form = EventForm::new(title, date, "10:00", "11:00");
            form.description = description.to_string();
            form.location = location.to_string();
            Event::new(id, form)
        };
        vec![
            make("1", "이벤트 1", "2024-07-01", "", ""),
            make("2", "Event 2", "2024-07-01", "", ""),
            make("3", "Event 3", "2024-07-15", "주간 회의", "회의실 A"),
            make("4", "Event 4", "2024-07-31", "", "Conference Room"),
        ]
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn empty_term_matches_everything() {
        assert_eq!(search(&fixture(), "").len(), 4);
    }

    #[test]
    fn search_is_case_insensitive() {
        let events = fixture();
        assert_eq!(ids(&search(&events, "EVENT 2")), vec!["2"]);
        assert_eq!(search(&events, "EVENT 2"), search(&events, "event 2"));
    }

    #[test]
    fn search_checks_description_and_location() {
        let events = fixture();
        assert_eq!(ids(&search(&events, "주간")), vec!["3"]);
        assert_eq!(ids(&search(&events, "conference")), vec!["4"]);
        assert!(search(&events, "없는 일정").is_empty());
    }

    #[test]
    fn week_view_keeps_only_that_week() {
        let filtered = filtered_events(&fixture(), "", date(2024, 7, 1), View::Week);
        assert_eq!(ids(&filtered), vec!["1", "2"]);
    }

    #[test]
    fn month_view_keeps_whole_month() {
        let filtered = filtered_events(&fixture(), "", date(2024, 7, 1), View::Month);
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn search_and_view_compose() {
        let filtered = filtered_events(&fixture(), "event", date(2024, 7, 1), View::Week);
        assert_eq!(ids(&filtered), vec!["2"]);
    }

    #[test]
    fn week_crossing_month_boundary() {
        // Week of 2024-07-31 runs Sun 07-28 .. Sat 08-03.
        let mut events = fixture();
        events.push(Event::new("5", EventForm::new("8월", "2024-08-02", "09:00", "10:00")));
        let filtered = filter_by_view(&events, date(2024, 7, 31), View::Week);
        assert_eq!(ids(&filtered), vec!["4", "5"]);
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        let mut events = fixture();
        events.push(Event::new("bad", EventForm::new("bad", "2024-07-xx", "09:00", "10:00")));
        assert_eq!(filter_by_view(&events, date(2024, 7, 1), View::Month).len(), 4);
    }

    #[test]
    fn empty_collection_stays_empty() {
        assert!(filtered_events(&[], "", date(2024, 7, 1), View::Month).is_empty());
    }

    #[test]
    fn view_range_of_february_leap_year() {
        assert_eq!(
            view_range(date(2024, 2, 10), View::Month),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
    }

    #[test]
    fn day_lookup() {
        let events = fixture();
        assert_eq!(ids(&events_for_day(&events, 1)), vec!["1", "2"]);
        assert_eq!(ids(&events_for_day(&events, 31)), vec!["4"]);
        assert!(events_for_day(&events, 0).is_empty());
    }
}
