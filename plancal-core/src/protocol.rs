//! Request and response bodies shared by plancal-server and its clients.
//!
//! Field names follow the JSON API: `{"events": [...]}` for collections,
//! `{"eventIds": [...]}` for bulk deletes and `{"error": "..."}` for failures.

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// `{"events": [...]}`. `T` is `Event` for stored events and `EventForm`
/// for events that have no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventList<T = Event> {
    pub events: Vec<T>,
}

impl<T> EventList<T> {
    pub fn new(events: Vec<T>) -> Self {
        EventList { events }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventIdList {
    pub event_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
