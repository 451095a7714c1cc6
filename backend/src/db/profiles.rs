use anyhow::Result;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{AvailabilitySlot, UserProfile};

pub async fn create_profile(
    pool: &PgPool,
    id: Uuid,
    email: &str,
    name: &str,
    skills: &[String],
    interests: &[String],
    availability: &[AvailabilitySlot],
    timezone: Option<&str>,
) -> Result<UserProfile> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO users (id, email, name, skills, interests, availability, timezone)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, email, name, skills, interests, availability, timezone, is_admin, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(name)
    .bind(skills)
    .bind(interests)
    .bind(Json(availability))
    .bind(timezone)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, email, name, skills, interests, availability, timezone, is_admin, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profiles(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<UserProfile>> {
    let profiles = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, email, name, skills, interests, availability, timezone, is_admin, created_at, updated_at
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    skills: &[String],
    interests: &[String],
    availability: &[AvailabilitySlot],
    timezone: Option<&str>,
) -> Result<UserProfile> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE users
        SET name = $2, skills = $3, interests = $4, availability = $5, timezone = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, name, skills, interests, availability, timezone, is_admin, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(skills)
    .bind(interests)
    .bind(Json(availability))
    .bind(timezone)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

/// Candidate pool for one matching request: everyone who teaches `skill`
/// except the requester, in insertion order. Reciprocity and availability
/// are filtered in memory by the matching module.
pub async fn candidates_teaching(
    pool: &PgPool,
    skill: &str,
    requester_id: Uuid,
) -> Result<Vec<UserProfile>> {
    let candidates = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, email, name, skills, interests, availability, timezone, is_admin, created_at, updated_at
        FROM users
        WHERE $1 = ANY(skills) AND id <> $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(skill)
    .bind(requester_id)
    .fetch_all(pool)
    .await?;

    Ok(candidates)
}
