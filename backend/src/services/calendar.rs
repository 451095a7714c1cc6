use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::Config;
use crate::constants::{EXTERNAL_API_TIMEOUT_SECS, GOOGLE_CALENDAR_API_BASE};

/// Thin Google Calendar client over a pre-provisioned bearer token. Events
/// land on the primary calendar of the integration account.
#[derive(Debug, Clone)]
pub struct CalendarService {
    client: Client,
    token: String,
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    id: String,
}

impl CalendarService {
    pub fn from_config(config: &Config) -> Option<Self> {
        Some(Self {
            client: Client::new(),
            token: config.google_calendar_token.clone()?,
        })
    }

    /// Creates an event and returns its id.
    pub async fn create_event(
        &self,
        summary: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<String> {
        let body = json!({
            "summary": summary,
            "start": { "dateTime": starts_at.to_rfc3339_opts(SecondsFormat::Secs, true) },
            "end": { "dateTime": ends_at.to_rfc3339_opts(SecondsFormat::Secs, true) },
        });

        let response = self
            .client
            .post(GOOGLE_CALENDAR_API_BASE)
            .bearer_auth(&self.token)
            .json(&body)
            .timeout(Duration::from_secs(EXTERNAL_API_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()
            .context("calendar event creation failed")?;

        let event: EventResponse = response.json().await?;
        Ok(event.id)
    }

    pub async fn delete_event(&self, event_id: &str) -> Result<()> {
        self.client
            .delete(format!("{GOOGLE_CALENDAR_API_BASE}/{event_id}"))
            .bearer_auth(&self.token)
            .timeout(Duration::from_secs(EXTERNAL_API_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("calendar deletion failed for event {event_id}"))?;

        Ok(())
    }
}
