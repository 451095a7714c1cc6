use axum::{Json, extract::State};
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashSet;

use super::{Envelope, ok};
use crate::Config;
use crate::db::{connections, profiles, reviews};
use crate::error::ApiError;
use crate::matching::{self, CandidateMatch};
use crate::utils::session::SessionUser;

#[derive(Debug, Deserialize)]
pub struct FindMatchesRequest {
    pub interest: Option<String>,
}

/// `POST /users/findMatches` — reciprocal candidates for one interest.
/// Read-only; candidates come back in the candidate query's order.
pub async fn find_matches(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<FindMatchesRequest>,
) -> Result<Json<Envelope<Vec<CandidateMatch>>>, ApiError> {
    let interest = req
        .interest
        .as_deref()
        .map(matching::normalize_label)
        .filter(|interest| !interest.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("interest is required".to_string()))?;

    let requester = profiles::get_profile(&pool, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("requester profile not found".to_string()))?;

    let connected: HashSet<_> = connections::accepted_peer_ids(&pool, requester.id)
        .await?
        .into_iter()
        .collect();

    let candidates = profiles::candidates_teaching(&pool, &interest, requester.id).await?;
    let survivors = matching::filter_candidates(&requester, &interest, &connected, candidates);

    let ids: Vec<_> = survivors.iter().map(|candidate| candidate.id).collect();
    let ratings = reviews::average_ratings_for(&pool, &ids).await?;

    let matches = matching::to_candidate_matches(&requester, survivors, &ratings);
    tracing::debug!(
        "found {} matches for user {} interest {:?}",
        matches.len(),
        requester.id,
        interest
    );

    Ok(ok(matches))
}
