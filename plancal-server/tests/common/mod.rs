//! Helpers for driving the router in-process.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header::CONTENT_TYPE};
use http_body_util::BodyExt;
use plancal_core::Event;
use tower::ServiceExt;

use plancal_server::app;
use plancal_server::state::{AppState, EventStore};

/// Router over a fresh store holding `events`.
pub fn build_test_app(events: Vec<Event>) -> Router {
    app(AppState::new(EventStore::new(events)))
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    send(app, Method::DELETE, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn form_json(title: &str, date: &str, start: &str, end: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "date": date,
        "startTime": start,
        "endTime": end,
        "description": "",
        "location": "",
        "category": "업무",
        "notificationTime": 10,
        "repeat": { "type": "none", "interval": 0 }
    })
}

pub fn seeded_event(id: &str, title: &str) -> Event {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "date": "2024-07-01",
        "startTime": "09:00",
        "endTime": "10:00",
        "repeat": { "type": "none", "interval": 0 }
    }))
    .unwrap()
}
