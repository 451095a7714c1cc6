use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::Config;
use crate::constants::{EXTERNAL_API_TIMEOUT_SECS, ZOOM_API_BASE, ZOOM_OAUTH_TOKEN_URL};

/// Thin Zoom client using server-to-server OAuth. Every call fetches a fresh
/// access token; call volume here is a handful of requests per scheduled or
/// ended meeting.
#[derive(Debug, Clone)]
pub struct ZoomService {
    client: Client,
    account_id: String,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Clone)]
pub struct ZoomMeeting {
    pub id: String,
    pub join_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct MeetingResponse {
    id: u64,
    join_url: String,
}

impl ZoomService {
    /// Built only when all three server-to-server OAuth credentials are
    /// configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        Some(Self {
            client: Client::new(),
            account_id: config.zoom_account_id.clone()?,
            client_id: config.zoom_client_id.clone()?,
            client_secret: config.zoom_client_secret.clone()?,
        })
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .post(ZOOM_OAUTH_TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.account_id.as_str()),
            ])
            .timeout(Duration::from_secs(EXTERNAL_API_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()
            .context("zoom token request failed")?;

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    pub async fn create_meeting(
        &self,
        topic: &str,
        starts_at: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<ZoomMeeting> {
        let token = self.access_token().await?;
        let body = json!({
            "topic": topic,
            "type": 2,
            "start_time": starts_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "duration": duration_minutes,
            "settings": {
                "join_before_host": true,
                "waiting_room": false,
            },
        });

        let response = self
            .client
            .post(format!("{ZOOM_API_BASE}/users/me/meetings"))
            .bearer_auth(&token)
            .json(&body)
            .timeout(Duration::from_secs(EXTERNAL_API_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()
            .context("zoom meeting creation failed")?;

        let meeting: MeetingResponse = response.json().await?;
        Ok(ZoomMeeting {
            id: meeting.id.to_string(),
            join_url: meeting.join_url,
        })
    }

    pub async fn delete_meeting(&self, meeting_id: &str) -> Result<()> {
        let token = self.access_token().await?;
        self.client
            .delete(format!("{ZOOM_API_BASE}/meetings/{meeting_id}"))
            .bearer_auth(&token)
            .timeout(Duration::from_secs(EXTERNAL_API_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("zoom deletion failed for meeting {meeting_id}"))?;

        Ok(())
    }
}
