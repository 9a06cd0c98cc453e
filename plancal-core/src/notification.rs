//! Lead-time notifications for upcoming events.
//!
//! `NotificationCenter` holds the session state: ids that have already fired
//! (append-only) and the notifications currently shown. `Poller` drives it on
//! a fixed cadence.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::clock::Clock;
use crate::event::Event;
use crate::overlap::parse_date_time;

/// Default poll cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Lead times offered by the event form, with their labels.
pub const NOTIFICATION_OPTIONS: [(u32, &str); 5] = [
    (1, "1분 전"),
    (10, "10분 전"),
    (60, "1시간 전"),
    (120, "2시간 전"),
    (1440, "1일 전"),
];

/// Label for one of the standard lead times.
pub fn notification_label(minutes: u32) -> Option<&'static str> {
    NOTIFICATION_OPTIONS
        .iter()
        .find(|(value, _)| *value == minutes)
        .map(|(_, label)| *label)
}

/// An alert shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Id of the event that fired it.
    pub id: String,
    pub message: String,
}

pub fn render_message(event: &Event) -> String {
    format!(
        "{}분 후 {} 일정이 시작됩니다.",
        event.form.notification_time, event.form.title
    )
}

/// Fractional minutes from `now` until the event starts. `None` if the start
/// does not parse.
pub fn minutes_until_start(event: &Event, now: NaiveDateTime) -> Option<f64> {
    let start = parse_date_time(&event.form.date, &event.form.start_time).value()?;
    Some((start - now).num_milliseconds() as f64 / 60_000.0)
}

/// Events whose lead time has been reached but whose start has not, and that
/// have not fired yet.
pub fn upcoming_events<'a>(
    events: &'a [Event],
    now: NaiveDateTime,
    notified: &HashSet<String>,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| !notified.contains(&event.id))
        .filter(|event| {
            minutes_until_start(event, now).is_some_and(|minutes| {
                minutes > 0.0 && minutes <= f64::from(event.form.notification_time)
            })
        })
        .collect()
}

/// Notification state for one view.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    notified: HashSet<String>,
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire notifications for events that just crossed their lead time.
    ///
    /// Returns what fired on this call. Calling again with the same `now`
    /// fires nothing.
    pub fn poll(&mut self, events: &[Event], now: NaiveDateTime) -> Vec<Notification> {
        let fired: Vec<Notification> = upcoming_events(events, now, &self.notified)
            .into_iter()
            .map(|event| Notification {
                id: event.id.clone(),
                message: render_message(event),
            })
            .collect();

        for notification in &fired {
            debug!(event_id = %notification.id, "notification fired");
            self.notified.insert(notification.id.clone());
            self.active.push(notification.clone());
        }

        fired
    }

    /// Remove the notification at `index` from the visible list.
    ///
    /// The event stays notified, so it will not fire again.
    pub fn dismiss(&mut self, index: usize) -> Option<Notification> {
        (index < self.active.len()).then(|| self.active.remove(index))
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.active
    }

    pub fn is_notified(&self, id: &str) -> bool {
        self.notified.contains(id)
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }
}

/// Runs `NotificationCenter::poll` on a fixed cadence.
pub struct Poller<C> {
    center: NotificationCenter,
    clock: C,
    period: Duration,
}

impl<C: Clock> Poller<C> {
    pub fn new(clock: C, period: Duration) -> Self {
        Self::with_center(NotificationCenter::new(), clock, period)
    }

    pub fn with_center(center: NotificationCenter, clock: C, period: Duration) -> Self {
        Poller {
            center,
            clock,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Poll the latest snapshot from `events` every period until `shutdown`
    /// completes, handing each fired notification to `on_fire`.
    ///
    /// Ticks never overlap: a tick that falls behind is skipped, not queued.
    /// Returns the center so the caller keeps the session state.
    pub async fn run<S, F>(
        mut self,
        events: watch::Receiver<Vec<Event>>,
        shutdown: S,
        mut on_fire: F,
    ) -> NotificationCenter
    where
        S: Future<Output = ()>,
        F: FnMut(&Notification),
    {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let fired = {
                        let snapshot = events.borrow();
                        self.center.poll(&snapshot, self.clock.now())
                    };
                    for notification in &fired {
                        on_fire(notification);
                    }
                }
            }
        }

        debug!(notified = self.center.notified_count(), "poller stopped");
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::event::EventForm;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn event() -> Event {
        let mut form = EventForm::new("이벤트 1", "2024-07-01", "09:00", "10:00");
        form.description = "event 1 description".to_string();
        form.location = "event 1 location".to_string();
        form.category = "업무".to_string();
        form.notification_time = 10;
        Event::new("1", form)
    }

    // --- upcoming_events ---

    #[test]
    fn event_at_lead_time_is_upcoming() {
        let events = vec![event()];
        let upcoming = upcoming_events(&events, at(8, 50), &HashSet::new());
        assert_eq!(upcoming, vec![&events[0]]);
    }

    #[test]
    fn already_notified_event_is_excluded() {
        let events = vec![event()];
        let notified = HashSet::from(["1".to_string()]);
        assert!(upcoming_events(&events, at(8, 50), &notified).is_empty());
    }

    #[test]
    fn event_outside_lead_time_is_not_upcoming() {
        let events = vec![event()];
        assert!(upcoming_events(&events, at(8, 40), &HashSet::new()).is_empty());
    }

    #[test]
    fn started_event_is_not_upcoming() {
        let events = vec![event()];
        assert!(upcoming_events(&events, at(9, 0), &HashSet::new()).is_empty());
        assert!(upcoming_events(&events, at(9, 10), &HashSet::new()).is_empty());
    }

    #[test]
    fn event_with_bad_start_is_skipped() {
        let mut bad = event();
        bad.form.start_time = "9시".to_string();
        assert!(upcoming_events(&[bad], at(8, 55), &HashSet::new()).is_empty());
    }

    // --- render_message / labels ---

    #[test]
    fn renders_message() {
        assert_eq!(render_message(&event()), "10분 후 이벤트 1 일정이 시작됩니다.");
    }

    #[test]
    fn labels_for_standard_lead_times() {
        assert_eq!(notification_label(1), Some("1분 전"));
        assert_eq!(notification_label(60), Some("1시간 전"));
        assert_eq!(notification_label(1440), Some("1일 전"));
        assert_eq!(notification_label(15), None);
    }

    // --- NotificationCenter ---

    #[test]
    fn fires_once_and_dismissed_notification_never_refires() {
        let events = vec![event()];
        let mut center = NotificationCenter::new();

        let fired = center.poll(&events, at(8, 50));
        assert_eq!(fired.len(), 1);
        assert_eq!(center.notifications().len(), 1);
        assert_eq!(center.notifications()[0].message, "10분 후 이벤트 1 일정이 시작됩니다.");

        assert!(center.poll(&events, at(8, 51)).is_empty());
        assert_eq!(center.notifications().len(), 1);

        let dismissed = center.dismiss(0).unwrap();
        assert_eq!(dismissed.id, "1");
        assert!(center.notifications().is_empty());
        assert!(center.is_notified("1"));

        assert!(center.poll(&events, at(8, 52)).is_empty());
        assert!(center.notifications().is_empty());
    }

    #[test]
    fn poll_is_idempotent_for_same_instant() {
        let events = vec![event()];
        let mut center = NotificationCenter::new();
        center.poll(&events, at(8, 55));
        center.poll(&events, at(8, 55));
        assert_eq!(center.notifications().len(), 1);
        assert_eq!(center.notified_count(), 1);
    }

    #[test]
    fn notifications_accumulate_across_polls() {
        let mut second = event();
        second.id = "2".to_string();
        second.form.title = "이벤트 2".to_string();
        second.form.start_time = "09:30".to_string();
        let events = vec![event(), second];

        let mut center = NotificationCenter::new();
        center.poll(&events, at(8, 55));
        center.poll(&events, at(9, 25));

        let ids: Vec<_> = center.notifications().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn dismiss_out_of_range_is_noop() {
        let mut center = NotificationCenter::new();
        center.poll(&[event()], at(8, 55));
        assert!(center.dismiss(3).is_none());
        assert_eq!(center.notifications().len(), 1);
    }

    // --- Poller ---

    #[tokio::test(start_paused = true)]
    async fn poller_fires_once_until_shutdown() {
        let (_tx, rx) = watch::channel(vec![event()]);
        let poller = Poller::new(FixedClock(at(8, 50)), DEFAULT_POLL_INTERVAL);

        let mut fired = Vec::new();
        let center = poller
            .run(rx, tokio::time::sleep(Duration::from_secs(5)), |n| {
                fired.push(n.clone())
            })
            .await;

        assert_eq!(fired.len(), 1);
        assert_eq!(center.notifications().len(), 1);
        assert!(center.is_notified("1"));
    }

    #[tokio::test(start_paused = true)]
    async fn poller_sees_refreshed_snapshot() {
        let (tx, rx) = watch::channel(Vec::new());
        let poller = Poller::new(FixedClock(at(8, 55)), DEFAULT_POLL_INTERVAL);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            let _ = tx.send(vec![event()]);
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let mut fired = Vec::new();
        poller
            .run(rx, tokio::time::sleep(Duration::from_secs(5)), |n| {
                fired.push(n.id.clone())
            })
            .await;

        assert_eq!(fired, vec!["1".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn poller_stops_immediately_when_shutdown_is_ready() {
        let (_tx, rx) = watch::channel(vec![event()]);
        let poller = Poller::new(FixedClock(at(8, 50)), DEFAULT_POLL_INTERVAL);

        let center = poller.run(rx, std::future::ready(()), |_| {}).await;

        assert_eq!(center.notified_count(), 0);
    }
}
