use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled session between the two parties of an accepted connection.
/// `zoom_meeting_id` / `calendar_event_id` are set only when the external
/// resource was actually created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub connection_id: Uuid,
    pub organizer_id: Uuid,
    pub topic: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub zoom_meeting_id: Option<String>,
    pub zoom_join_url: Option<String>,
    pub calendar_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a meeting; external resource ids are filled in only
/// when their creation succeeded.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub id: Uuid,
    pub connection_id: Uuid,
    pub organizer_id: Uuid,
    pub topic: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub zoom_meeting_id: Option<String>,
    pub zoom_join_url: Option<String>,
    pub calendar_event_id: Option<String>,
}
