//! CTFtime HTTP client

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use ctf_common::CtftimeConfig;
use ctf_core::{CalendarEvent, DomainError, EventCalendar, EventFilter, RepoResult};

use crate::models::EventModel;

/// Client for the CTFtime events API
#[derive(Clone)]
pub struct CtftimeClient {
    http: Client,
    base_url: String,
}

impl fmt::Debug for CtftimeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtftimeClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CtftimeClient {
    /// Build a client from configuration
    ///
    /// CTFtime rejects unknown user agents, so the configured one is sent with
    /// every request.
    pub fn new(config: &CtftimeConfig) -> RepoResult<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(calendar_error)?;

        Ok(Self::with_client(http, &config.base_url))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/events/", self.base_url)
    }

    fn event_url(&self, id: i64) -> String {
        format!("{}/events/{id}/", self.base_url)
    }
}

fn calendar_error(e: impl fmt::Display) -> DomainError {
    DomainError::CalendarError(e.to_string())
}

/// Query parameters for an event window
fn window_query(filter: &EventFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(3);
    if filter.limit > 0 {
        query.push(("limit", filter.limit.to_string()));
    }
    if let Some(start) = filter.start {
        query.push(("start", start.timestamp().to_string()));
    }
    if let Some(finish) = filter.finish {
        query.push(("finish", finish.timestamp().to_string()));
    }
    query
}

#[async_trait]
impl EventCalendar for CtftimeClient {
    #[instrument(skip(self))]
    async fn find_events(&self, filter: &EventFilter) -> RepoResult<Vec<CalendarEvent>> {
        let response = self
            .http
            .get(self.events_url())
            .query(&window_query(filter))
            .send()
            .await
            .map_err(calendar_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::CalendarError(format!(
                "event listing returned {status}"
            )));
        }

        let events: Vec<EventModel> = response.json().await.map_err(calendar_error)?;
        debug!(count = events.len(), "Fetched upcoming events");

        Ok(events.into_iter().map(CalendarEvent::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_event(&self, id: i64) -> RepoResult<CalendarEvent> {
        let response = self
            .http
            .get(self.event_url(id))
            .send()
            .await
            .map_err(calendar_error)?;

        let status = response.status();
        if status.is_client_error() {
            return Err(DomainError::EventNotFound(id));
        }
        if !status.is_success() {
            return Err(DomainError::CalendarError(format!(
                "event {id} returned {status}"
            )));
        }

        let event: EventModel = response.json().await.map_err(calendar_error)?;
        Ok(event.into())
    }
}
