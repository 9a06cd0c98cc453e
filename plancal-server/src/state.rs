use std::path::Path;
use std::sync::Arc;

use plancal_core::protocol::EventList;
use plancal_core::{Event, EventForm, PlanCalError, PlanCalResult, RecurrenceGroupId};
use tokio::sync::RwLock;
use tracing::info;

/// In-memory event collection. Ids are UUID v4 strings.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl EventStore {
    pub fn new(events: Vec<Event>) -> Self {
        EventStore { events }
    }

    /// Load a `{"events": [...]}` JSON file.
    pub fn from_seed_file(path: &Path) -> PlanCalResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let seed: EventList = serde_json::from_str(&contents)?;
        info!(count = seed.events.len(), path = %path.display(), "loaded seed events");
        Ok(Self::new(seed.events))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn create(&mut self, form: EventForm) -> Event {
        let event = Event::new(new_id(), form);
        self.events.push(event.clone());
        event
    }

    /// Store every form under one freshly generated recurrence group.
    pub fn create_series(&mut self, forms: Vec<EventForm>) -> Vec<Event> {
        let group = RecurrenceGroupId::generate();
        forms
            .into_iter()
            .map(|mut form| {
                form.repeat.id = Some(group.clone());
                self.create(form)
            })
            .collect()
    }

    pub fn update(&mut self, id: &str, form: EventForm) -> PlanCalResult<Event> {
        let slot = self
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| PlanCalError::EventNotFound(id.to_string()))?;

        slot.form = form;
        Ok(slot.clone())
    }

    /// Replace each listed event that exists. Unknown ids are skipped, but if
    /// none of them exist the whole call fails.
    pub fn update_many(&mut self, events: Vec<Event>) -> PlanCalResult<Vec<Event>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = events.iter().map(|event| event.id.clone()).collect();
        let mut updated = Vec::new();

        for event in events {
            if let Some(slot) = self.events.iter_mut().find(|e| e.id == event.id) {
                *slot = event;
                updated.push(slot.clone());
            }
        }

        if updated.is_empty() {
            return Err(PlanCalError::EventNotFound(ids.join(", ")));
        }
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> PlanCalResult<Event> {
        let index = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| PlanCalError::EventNotFound(id.to_string()))?;

        Ok(self.events.remove(index))
    }

    /// Remove every listed id; returns how many were removed.
    pub fn delete_many(&mut self, ids: &[String]) -> usize {
        let before = self.events.len();
        self.events.retain(|event| !ids.contains(&event.id));
        before - self.events.len()
    }

    pub fn reset(&mut self) {
        self.events.clear();
    }
}

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<EventStore>>,
}

impl AppState {
    pub fn new(store: EventStore) -> Self {
        AppState {
            store: Arc::new(RwLock::new(store)),
        }
    }
}
