use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Envelope, ok};
use crate::Config;
use crate::constants::{MAX_RATING, MIN_RATING};
use crate::db::{connections, reviews};
use crate::error::ApiError;
use crate::models::{ConnectionStatus, Review};
use crate::utils::session::SessionUser;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub connection_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

fn validate_rating(rating: Option<i32>) -> Result<i32, ApiError> {
    match rating {
        Some(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => Ok(rating),
        _ => Err(ApiError::InvalidArgument(format!(
            "rating must be an integer between {MIN_RATING} and {MAX_RATING}"
        ))),
    }
}

/// `POST /reviews` — rate the other party of an accepted connection.
pub async fn create_review(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Envelope<Review>>), ApiError> {
    let connection_id = req
        .connection_id
        .ok_or_else(|| ApiError::InvalidArgument("connection_id is required".to_string()))?;
    let rating = validate_rating(req.rating)?;

    let connection = connections::get_connection(&pool, connection_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("connection not found".to_string()))?;

    let to_user_id = connection.peer_of(session.user_id).ok_or_else(|| {
        ApiError::PermissionDenied("only a party to the connection may leave a review".to_string())
    })?;

    if connection.status != ConnectionStatus::Accepted {
        return Err(ApiError::Conflict(
            "reviews require an accepted connection".to_string(),
        ));
    }

    let comment = req
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|comment| !comment.is_empty());

    let review = reviews::create_review(
        &pool,
        Uuid::new_v4(),
        session.user_id,
        to_user_id,
        connection.id,
        rating,
        comment,
    )
    .await?;

    Ok((StatusCode::CREATED, ok(review)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rating_bounds() {
        assert_eq!(validate_rating(Some(1)).unwrap(), 1);
        assert_eq!(validate_rating(Some(5)).unwrap(), 5);
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());
        assert!(validate_rating(None).is_err());
    }
}
