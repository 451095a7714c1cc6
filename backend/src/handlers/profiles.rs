use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use sqlx::PgPool;

use super::{Envelope, ok};
use crate::Config;
use crate::constants::WEEK_DAYS;
use crate::db::{self, profiles};
use crate::error::ApiError;
use crate::matching::normalize_labels;
use crate::models::{AvailabilitySlot, UserProfile};
use crate::utils::session::SessionUser;

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub availability: Vec<AvailabilitySlot>,
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub availability: Option<Vec<AvailabilitySlot>>,
    pub timezone: Option<String>,
}

/// Slot times are deliberately not validated here: a malformed `HH:MM` is
/// stored as-is and simply never overlaps anything at match time. Only the
/// weekday range is checked.
fn validate_slots(slots: &[AvailabilitySlot]) -> Result<(), ApiError> {
    for slot in slots {
        if !(0..WEEK_DAYS).contains(&slot.day_of_week) {
            return Err(ApiError::InvalidArgument(format!(
                "day_of_week must be between 0 and 6, got {}",
                slot.day_of_week
            )));
        }
    }
    Ok(())
}

fn validate_timezone(timezone: Option<&str>) -> Result<Option<String>, ApiError> {
    match timezone {
        None => Ok(None),
        Some(name) => {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<chrono_tz::Tz>()
                .map(|tz| Some(tz.to_string()))
                .map_err(|_| ApiError::InvalidArgument(format!("unknown timezone: {trimmed}")))
        }
    }
}

/// `POST /users/profile` — registration for the authenticated identity.
pub async fn create_profile(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Envelope<UserProfile>>), ApiError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("name is required".to_string()))?;
    validate_slots(&req.availability)?;
    let timezone = validate_timezone(req.timezone.as_deref())?;

    if profiles::get_profile(&pool, session.user_id).await?.is_some() {
        return Err(ApiError::Conflict("profile already exists".to_string()));
    }

    let skills = normalize_labels(&req.skills);
    let interests = normalize_labels(&req.interests);

    let profile = profiles::create_profile(
        &pool,
        session.user_id,
        &session.email,
        name,
        &skills,
        &interests,
        &req.availability,
        timezone.as_deref(),
    )
    .await
    .map_err(|err| {
        if db::is_unique_violation(&err) {
            ApiError::Conflict("a profile with this email already exists".to_string())
        } else {
            ApiError::Internal(err)
        }
    })?;

    tracing::info!("profile created for user {}", profile.id);

    Ok((StatusCode::CREATED, ok(profile)))
}

/// `GET /users/me` — the caller's own profile.
pub async fn get_me(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
) -> Result<Json<Envelope<UserProfile>>, ApiError> {
    let profile = profiles::get_profile(&pool, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile not found".to_string()))?;

    Ok(ok(profile))
}

/// `PUT /users/profile` — partial update; absent fields keep their value.
pub async fn update_profile(
    State((pool, _config)): State<(PgPool, Config)>,
    session: SessionUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Envelope<UserProfile>>, ApiError> {
    let current = profiles::get_profile(&pool, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile not found".to_string()))?;

    let name = match req.name.as_deref().map(str::trim) {
        Some("") => {
            return Err(ApiError::InvalidArgument("name cannot be empty".to_string()));
        }
        Some(name) => name.to_string(),
        None => current.name,
    };
    let skills = match req.skills {
        Some(skills) => normalize_labels(&skills),
        None => current.skills,
    };
    let interests = match req.interests {
        Some(interests) => normalize_labels(&interests),
        None => current.interests,
    };
    let availability = match req.availability {
        Some(slots) => {
            validate_slots(&slots)?;
            slots
        }
        None => current.availability.0,
    };
    let timezone = match req.timezone.as_deref() {
        Some(tz) => validate_timezone(Some(tz))?,
        None => current.timezone,
    };

    let profile = profiles::update_profile(
        &pool,
        session.user_id,
        &name,
        &skills,
        &interests,
        &availability,
        timezone.as_deref(),
    )
    .await?;

    Ok(ok(profile))
}
