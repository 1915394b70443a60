//! Events source.
//!
//! Upcoming events are published as a JSON array at `{base_url}/events.json`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EventsConfig;
use crate::error::{Error, Result};

/// An upcoming event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub category: String,
}

/// Source of upcoming events
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<Event>>;
}

/// Fetches events over HTTP
pub struct HttpEventSource {
    client: Client,
    base_url: String,
}

impl HttpEventSource {
    pub fn new(config: &EventsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn events_url(&self) -> String {
        format!("{}/events.json", self.base_url)
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        let url = self.events_url();
        debug!(url = %url, "Fetching events");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::external(format!("events request failed: HTTP {}", status)));
        }

        let body = response.text().await?;
        let events: Vec<Event> = serde_json::from_str(&body)
            .map_err(|e| Error::external(format!("malformed events payload: {}", e)))?;

        info!(count = events.len(), "Fetched events");
        Ok(events)
    }
}
