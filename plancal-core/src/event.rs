//! Event types shared by the engine, the server and the CLI.
//!
//! `date`, `start_time` and `end_time` are kept in their wire form
//! (`YYYY-MM-DD`, `HH:MM`). The engine parses them on demand so that a
//! malformed value degrades to an invalid instant instead of failing the whole
//! payload at deserialization time.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Lead time used when a form does not say otherwise.
pub const DEFAULT_NOTIFICATION_MINUTES: u32 = 10;

fn default_notification_time() -> u32 {
    DEFAULT_NOTIFICATION_MINUTES
}

/// How an event repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatType {
    pub fn is_none(self) -> bool {
        self == RepeatType::None
    }

    /// Unit shown after the interval, e.g. "2개월마다".
    pub fn unit_label(self) -> Option<&'static str> {
        match self {
            RepeatType::Daily => Some("일"),
            RepeatType::Weekly => Some("주"),
            RepeatType::Monthly => Some("개월"),
            RepeatType::Yearly => Some("년"),
            RepeatType::None => None,
        }
    }

    pub fn repeat_label(self) -> Option<&'static str> {
        match self {
            RepeatType::Daily => Some("매일"),
            RepeatType::Weekly => Some("매주"),
            RepeatType::Monthly => Some("매월"),
            RepeatType::Yearly => Some("매년"),
            RepeatType::None => None,
        }
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepeatType::None => "none",
            RepeatType::Daily => "daily",
            RepeatType::Weekly => "weekly",
            RepeatType::Monthly => "monthly",
            RepeatType::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

/// Identifier shared by every instance materialized from one recurring creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecurrenceGroupId(String);

impl RecurrenceGroupId {
    pub fn new(id: impl Into<String>) -> Self {
        RecurrenceGroupId(id.into())
    }

    /// Fresh random group id.
    pub fn generate() -> Self {
        RecurrenceGroupId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecurrenceGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recurrence rule attached to every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RepeatType,
    /// Step count in units of `kind`. Meaningless for `RepeatType::None`.
    #[serde(default)]
    pub interval: u32,
    /// Inclusive upper bound for generated instances.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_end_date"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecurrenceGroupId>,
}

impl RecurrenceRule {
    pub fn none() -> Self {
        RecurrenceRule {
            kind: RepeatType::None,
            interval: 0,
            end_date: None,
            id: None,
        }
    }

    pub fn new(kind: RepeatType, interval: u32, end_date: Option<NaiveDate>) -> Self {
        RecurrenceRule {
            kind,
            interval,
            end_date,
            id: None,
        }
    }

    /// Human-readable summary such as "2주마다 (종료: 2024-12-31)".
    pub fn describe(&self) -> Option<String> {
        let unit = self.kind.unit_label()?;
        let mut text = format!("{}{}마다", self.interval, unit);
        if let Some(end) = self.end_date {
            text.push_str(&format!(" (종료: {})", end.format("%Y-%m-%d")));
        }
        Some(text)
    }
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        RecurrenceRule::none()
    }
}

/// Forms send an empty string when the end date field is left blank.
fn deserialize_end_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid endDate '{}'", s))),
    }
}

/// An event before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    /// Minutes of lead time before the start at which to notify.
    #[serde(default = "default_notification_time")]
    pub notification_time: u32,
    #[serde(default)]
    pub repeat: RecurrenceRule,
}

impl EventForm {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        EventForm {
            title: title.into(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            description: String::new(),
            location: String::new(),
            category: String::new(),
            notification_time: DEFAULT_NOTIFICATION_MINUTES,
            repeat: RecurrenceRule::none(),
        }
    }
}

/// A persisted event. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(flatten)]
    pub form: EventForm,
}

impl Event {
    pub fn new(id: impl Into<String>, form: EventForm) -> Self {
        Event {
            id: id.into(),
            form,
        }
    }

    /// The recurrence group this event belongs to, if any.
    pub fn series(&self) -> Option<&RecurrenceGroupId> {
        self.form.repeat.id.as_ref()
    }

    pub fn is_recurring(&self) -> bool {
        !self.form.repeat.kind.is_none()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.form.title)
    }
}

/// Anything the engine can schedule: a stored `Event` or a pending `EventForm`.
pub trait EventLike {
    fn form(&self) -> &EventForm;

    fn form_mut(&mut self) -> &mut EventForm;

    /// Store id, when there is one.
    fn event_id(&self) -> Option<&str> {
        None
    }
}

impl EventLike for EventForm {
    fn form(&self) -> &EventForm {
        self
    }

    fn form_mut(&mut self) -> &mut EventForm {
        self
    }
}

impl EventLike for Event {
    fn form(&self) -> &EventForm {
        &self.form
    }

    fn form_mut(&mut self) -> &mut EventForm {
        &mut self.form
    }

    fn event_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}
