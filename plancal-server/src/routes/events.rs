//! Event endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use plancal_core::protocol::{EventIdList, EventList};
use plancal_core::{Event, EventForm};
use tracing::info;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", put(update_event).delete(delete_event))
        .route(
            "/api/events-list",
            post(create_events).put(update_events).delete(delete_events),
        )
        .route("/api/reset-events", post(reset_events))
}

/// GET /api/events
async fn list_events(State(state): State<AppState>) -> Json<EventList> {
    let store = state.store.read().await;
    Json(EventList::new(store.events().to_vec()))
}

/// POST /api/events - Create a single event
async fn create_event(
    State(state): State<AppState>,
    Json(form): Json<EventForm>,
) -> (StatusCode, Json<Event>) {
    let event = state.store.write().await.create(form);
    info!(id = %event.id, title = %event.form.title, "created event");
    (StatusCode::CREATED, Json(event))
}

/// POST /api/events-list - Create the instances of a recurring event
async fn create_events(
    State(state): State<AppState>,
    Json(body): Json<EventList<EventForm>>,
) -> (StatusCode, Json<Vec<Event>>) {
    let events = state.store.write().await.create_series(body.events);
    info!(count = events.len(), "created event series");
    (StatusCode::CREATED, Json(events))
}

/// PUT /api/events/:id
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<EventForm>,
) -> Result<Json<Event>, AppError> {
    let event = state.store.write().await.update(&id, form)?;
    info!(id = %event.id, "updated event");
    Ok(Json(event))
}

/// PUT /api/events-list - Replace several events at once
async fn update_events(
    State(state): State<AppState>,
    Json(body): Json<EventList>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.store.write().await.update_many(body.events)?;
    info!(count = events.len(), "updated events");
    Ok(Json(events))
}

/// DELETE /api/events/:id
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.write().await.delete(&id)?;
    info!(%id, "deleted event");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/events-list
async fn delete_events(
    State(state): State<AppState>,
    Json(body): Json<EventIdList>,
) -> StatusCode {
    let removed = state.store.write().await.delete_many(&body.event_ids);
    info!(removed, "deleted events");
    StatusCode::NO_CONTENT
}

/// POST /api/reset-events
async fn reset_events(State(state): State<AppState>) -> StatusCode {
    state.store.write().await.reset();
    info!("cleared all events");
    StatusCode::NO_CONTENT
}
