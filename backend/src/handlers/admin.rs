use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Envelope, ok};
use crate::Config;
use crate::db::{connections, meetings, profiles};
use crate::error::ApiError;
use crate::services::{self, CalendarService, ExternalCleanup, ZoomService};
use crate::utils::session::SessionUser;

#[derive(Debug, Deserialize)]
pub struct EndMatchRequest {
    pub connection_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct EndMatchResponse {
    pub removed_meetings: u64,
}

/// `POST /users/endMatch` — delete a connection and cascade to its
/// future-dated meetings. External Zoom/Calendar cleanup is best-effort:
/// each failure is logged per resource and never aborts the cascade.
pub async fn end_match(
    State((pool, config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<EndMatchRequest>,
) -> Result<Json<Envelope<EndMatchResponse>>, ApiError> {
    let connection_id = req
        .connection_id
        .ok_or_else(|| ApiError::InvalidArgument("connection_id is required".to_string()))?;

    let connection = connections::get_connection(&pool, connection_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("connection not found".to_string()))?;

    let actor = profiles::get_profile(&pool, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile not found".to_string()))?;
    if !connection.involves(actor.id) && !actor.is_admin {
        return Err(ApiError::PermissionDenied(
            "only a party to the match or an admin may end it".to_string(),
        ));
    }

    let future_meetings =
        meetings::future_for_connection(&pool, connection.id, Utc::now()).await?;

    let zoom = ZoomService::from_config(&config);
    let calendar = CalendarService::from_config(&config);
    for action in services::cleanups_for(&future_meetings) {
        match action {
            ExternalCleanup::ZoomMeeting(id) => match &zoom {
                Some(service) => {
                    if let Err(err) = service.delete_meeting(&id).await {
                        tracing::warn!("zoom cleanup failed for meeting {id}: {err:#}");
                    }
                }
                None => tracing::warn!("zoom meeting {id} left behind: no credentials configured"),
            },
            ExternalCleanup::CalendarEvent(id) => match &calendar {
                Some(service) => {
                    if let Err(err) = service.delete_event(&id).await {
                        tracing::warn!("calendar cleanup failed for event {id}: {err:#}");
                    }
                }
                None => tracing::warn!("calendar event {id} left behind: no token configured"),
            },
        }
    }

    let meeting_ids: Vec<_> = future_meetings.iter().map(|meeting| meeting.id).collect();
    let removed_meetings = meetings::delete_meetings(&pool, &meeting_ids).await?;
    connections::delete_connection(&pool, connection.id).await?;

    tracing::info!(
        "match {} ended by {}, {} future meetings removed",
        connection.id,
        actor.id,
        removed_meetings
    );

    Ok(ok(EndMatchResponse { removed_meetings }))
}
