//! HTTP client for communicating with plancal-server

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use plancal_core::protocol::{ErrorResponse, EventIdList, EventList};
use plancal_core::{Event, EventForm};

/// HTTP client for plancal-server
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Client {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /api/events
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let resp = self
            .http
            .get(self.url("/api/events"))
            .send()
            .await
            .context("Failed to connect to server")?;

        let list: EventList = parse_json(resp).await?;
        Ok(list.events)
    }

    /// POST /api/events
    pub async fn create_event(&self, form: &EventForm) -> Result<Event> {
        let resp = self
            .http
            .post(self.url("/api/events"))
            .json(form)
            .send()
            .await
            .context("Failed to connect to server")?;

        parse_json(resp).await
    }

    /// POST /api/events-list
    pub async fn create_events(&self, forms: &[EventForm]) -> Result<Vec<Event>> {
        let resp = self
            .http
            .post(self.url("/api/events-list"))
            .json(&EventList::new(forms.to_vec()))
            .send()
            .await
            .context("Failed to connect to server")?;

        parse_json(resp).await
    }

    /// PUT /api/events/:id
    pub async fn update_event(&self, event: &Event) -> Result<Event> {
        let resp = self
            .http
            .put(self.url(&format!("/api/events/{}", event.id)))
            .json(event)
            .send()
            .await
            .context("Failed to connect to server")?;

        parse_json(resp).await
    }

    /// PUT /api/events-list
    pub async fn update_events(&self, events: &[Event]) -> Result<Vec<Event>> {
        let resp = self
            .http
            .put(self.url("/api/events-list"))
            .json(&EventList::new(events.to_vec()))
            .send()
            .await
            .context("Failed to connect to server")?;

        parse_json(resp).await
    }

    /// DELETE /api/events/:id
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/events/{}", id)))
            .send()
            .await
            .context("Failed to connect to server")?;

        check_status(resp).await?;
        Ok(())
    }

    /// DELETE /api/events-list
    pub async fn delete_events(&self, ids: &[String]) -> Result<()> {
        let resp = self
            .http
            .delete(self.url("/api/events-list"))
            .json(&EventIdList {
                event_ids: ids.to_vec(),
            })
            .send()
            .await
            .context("Failed to connect to server")?;

        check_status(resp).await?;
        Ok(())
    }
}

/// Pass successful responses through; turn failures into the server's error message.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    match resp.json::<ErrorResponse>().await {
        Ok(err) => anyhow::bail!("{}", err.error),
        Err(_) => anyhow::bail!("Server responded with {}", status),
    }
}

async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    check_status(resp)
        .await?
        .json()
        .await
        .context("Invalid response from server")
}
