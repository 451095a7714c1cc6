use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Envelope, ok};
use crate::Config;
use crate::db::{connections, meetings};
use crate::error::ApiError;
use crate::models::{ConnectionStatus, Meeting, NewMeeting};
use crate::services::{CalendarService, ZoomService};
use crate::utils::session::SessionUser;

#[derive(Debug, Deserialize)]
pub struct ScheduleMeetingRequest {
    pub connection_id: Option<Uuid>,
    pub topic: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub create_zoom: bool,
    #[serde(default)]
    pub create_calendar_event: bool,
}

fn validate_meeting_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    if starts_at <= now {
        return Err(ApiError::InvalidArgument(
            "meetings must be scheduled in the future".to_string(),
        ));
    }
    if ends_at <= starts_at {
        return Err(ApiError::InvalidArgument(
            "ends_at must be after starts_at".to_string(),
        ));
    }
    Ok(())
}

/// `POST /meetings` — schedule a session on an accepted connection.
/// External resource creation is opt-in and degrades gracefully: a Zoom or
/// Calendar failure logs a warning and the meeting is stored without the
/// corresponding id.
pub async fn schedule_meeting(
    State((pool, config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<ScheduleMeetingRequest>,
) -> Result<(StatusCode, Json<Envelope<Meeting>>), ApiError> {
    let connection_id = req
        .connection_id
        .ok_or_else(|| ApiError::InvalidArgument("connection_id is required".to_string()))?;
    let topic = req
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("topic is required".to_string()))?;
    let starts_at = req
        .starts_at
        .ok_or_else(|| ApiError::InvalidArgument("starts_at is required".to_string()))?;
    let ends_at = req
        .ends_at
        .ok_or_else(|| ApiError::InvalidArgument("ends_at is required".to_string()))?;
    validate_meeting_window(starts_at, ends_at, Utc::now())?;

    let connection = connections::get_connection(&pool, connection_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("connection not found".to_string()))?;
    if !connection.involves(session.user_id) {
        return Err(ApiError::PermissionDenied(
            "only a party to the connection may schedule meetings".to_string(),
        ));
    }
    if connection.status != ConnectionStatus::Accepted {
        return Err(ApiError::Conflict(
            "meetings can only be scheduled on an accepted connection".to_string(),
        ));
    }

    let mut zoom_meeting_id = None;
    let mut zoom_join_url = None;
    if req.create_zoom {
        match ZoomService::from_config(&config) {
            Some(zoom) => {
                let duration_minutes = (ends_at - starts_at).num_minutes().max(1);
                match zoom.create_meeting(topic, starts_at, duration_minutes).await {
                    Ok(meeting) => {
                        zoom_meeting_id = Some(meeting.id);
                        zoom_join_url = Some(meeting.join_url);
                    }
                    Err(err) => {
                        tracing::warn!("zoom meeting creation failed, continuing without: {err:#}");
                    }
                }
            }
            None => tracing::warn!("zoom meeting requested but credentials are not configured"),
        }
    }

    let mut calendar_event_id = None;
    if req.create_calendar_event {
        match CalendarService::from_config(&config) {
            Some(calendar) => match calendar.create_event(topic, starts_at, ends_at).await {
                Ok(event_id) => calendar_event_id = Some(event_id),
                Err(err) => {
                    tracing::warn!("calendar event creation failed, continuing without: {err:#}");
                }
            },
            None => tracing::warn!("calendar event requested but no token is configured"),
        }
    }

    let meeting = meetings::create_meeting(
        &pool,
        &NewMeeting {
            id: Uuid::new_v4(),
            connection_id: connection.id,
            organizer_id: session.user_id,
            topic: topic.to_string(),
            starts_at,
            ends_at,
            zoom_meeting_id,
            zoom_join_url,
            calendar_event_id,
        },
    )
    .await?;

    tracing::info!(
        "meeting {} scheduled on connection {}",
        meeting.id,
        connection.id
    );

    Ok((StatusCode::CREATED, ok(meeting)))
}

/// `GET /meetings` — the caller's upcoming meetings.
pub async fn list_meetings(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
) -> Result<Json<Envelope<Vec<Meeting>>>, ApiError> {
    let meetings = meetings::upcoming_for_user(&pool, session.user_id, Utc::now()).await?;
    Ok(ok(meetings))
}
