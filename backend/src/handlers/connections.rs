use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::{Envelope, ok};
use crate::Config;
use crate::db::{self, connections, profiles};
use crate::error::ApiError;
use crate::matching::normalize_label;
use crate::models::{Connection, ConnectionStatus, PublicProfile, UserProfile};
use crate::utils::session::SessionUser;

#[derive(Debug, Deserialize)]
pub struct SendRequestRequest {
    pub recipient_id: Option<Uuid>,
    pub teach_skill: Option<String>,
    pub learn_skill: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequestRequest {
    pub request_id: Option<Uuid>,
    pub status: Option<String>,
}

/// A pending request as shown to its recipient, sender populated.
#[derive(Debug, Serialize)]
pub struct PendingRequestView {
    pub connection: Connection,
    pub sender: PublicProfile,
}

fn duplicate_conflict_message(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Pending => "a request between these users is already pending",
        ConnectionStatus::Accepted => "these users are already connected",
        ConnectionStatus::Rejected => "a previous request between these users was already processed",
    }
}

fn parse_response_status(status: Option<&str>) -> Result<ConnectionStatus, ApiError> {
    match status {
        Some("accepted") => Ok(ConnectionStatus::Accepted),
        Some("rejected") => Ok(ConnectionStatus::Rejected),
        _ => Err(ApiError::InvalidArgument(
            "status must be \"accepted\" or \"rejected\"".to_string(),
        )),
    }
}

/// Recipient-only, pending-only transition guard.
fn validate_response(connection: &Connection, actor: Uuid) -> Result<(), ApiError> {
    if connection.user2_id != actor {
        return Err(ApiError::PermissionDenied(
            "only the recipient may respond to this request".to_string(),
        ));
    }
    if connection.status != ConnectionStatus::Pending {
        return Err(ApiError::Conflict(
            "this request was already processed".to_string(),
        ));
    }
    Ok(())
}

/// `POST /users/sendRequest` — create a pending connection toward another
/// user.
pub async fn send_request(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<SendRequestRequest>,
) -> Result<(StatusCode, Json<Envelope<Connection>>), ApiError> {
    let recipient_id = req
        .recipient_id
        .ok_or_else(|| ApiError::InvalidArgument("recipient_id is required".to_string()))?;
    let teach_skill = req
        .teach_skill
        .as_deref()
        .map(normalize_label)
        .filter(|skill| !skill.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("teach_skill is required".to_string()))?;
    let learn_skill = req
        .learn_skill
        .as_deref()
        .map(normalize_label)
        .filter(|skill| !skill.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("learn_skill is required".to_string()))?;

    if recipient_id == session.user_id {
        return Err(ApiError::InvalidArgument(
            "cannot send a connection request to yourself".to_string(),
        ));
    }

    profiles::get_profile(&pool, recipient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipient profile not found".to_string()))?;

    if let Some(existing) = connections::find_between(&pool, session.user_id, recipient_id).await? {
        return Err(ApiError::Conflict(
            duplicate_conflict_message(existing.status).to_string(),
        ));
    }

    let connection = connections::create_connection(
        &pool,
        Uuid::new_v4(),
        session.user_id,
        recipient_id,
        &teach_skill,
        &learn_skill,
    )
    .await
    .map_err(|err| {
        // Two racing requests can both pass the pre-check; the pair index
        // decides, and the loser surfaces as the same Conflict kind.
        if db::is_unique_violation(&err) {
            ApiError::Conflict("a connection between these users already exists".to_string())
        } else {
            ApiError::Internal(err)
        }
    })?;

    tracing::info!(
        "connection request {} sent from {} to {}",
        connection.id,
        connection.user1_id,
        connection.user2_id
    );

    Ok((StatusCode::CREATED, ok(connection)))
}

/// `GET /users/pendingRequests` — requests awaiting the caller's response.
pub async fn pending_requests(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
) -> Result<Json<Envelope<Vec<PendingRequestView>>>, ApiError> {
    let pending = connections::pending_for_recipient(&pool, session.user_id).await?;

    let sender_ids: Vec<_> = pending.iter().map(|c| c.user1_id).collect();
    let senders: HashMap<Uuid, UserProfile> = profiles::get_profiles(&pool, &sender_ids)
        .await?
        .into_iter()
        .map(|profile| (profile.id, profile))
        .collect();

    let views = pending
        .into_iter()
        .filter_map(|connection| {
            let sender = senders.get(&connection.user1_id)?.clone();
            Some(PendingRequestView {
                sender: sender.into(),
                connection,
            })
        })
        .collect();

    Ok(ok(views))
}

/// `POST /users/respondRequest` — accept or reject a pending request.
pub async fn respond_request(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<RespondRequestRequest>,
) -> Result<Json<Envelope<Connection>>, ApiError> {
    let request_id = req
        .request_id
        .ok_or_else(|| ApiError::InvalidArgument("request_id is required".to_string()))?;
    let status = parse_response_status(req.status.as_deref())?;

    let connection = connections::get_connection(&pool, request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("connection request not found".to_string()))?;

    validate_response(&connection, session.user_id)?;

    let connection = connections::set_status(&pool, connection.id, status).await?;
    tracing::info!("connection {} marked {:?}", connection.id, connection.status);

    Ok(ok(connection))
}

/// `GET /users/connections` — the caller's accepted connections.
pub async fn list_connections(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
) -> Result<Json<Envelope<Vec<Connection>>>, ApiError> {
    let connections = connections::accepted_for_user(&pool, session.user_id).await?;
    Ok(ok(connections))
}
