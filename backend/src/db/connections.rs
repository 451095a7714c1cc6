use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Connection, ConnectionStatus};

/// Any-status lookup for the unordered pair. Backs the duplicate-request
/// pre-check and its per-status conflict messages.
pub async fn find_between(pool: &PgPool, a: Uuid, b: Uuid) -> Result<Option<Connection>> {
    let connection = sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, user1_id, user2_id, skill1, skill2, status, created_at, responded_at
        FROM connections
        WHERE (user1_id = $1 AND user2_id = $2) OR (user1_id = $2 AND user2_id = $1)
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_optional(pool)
    .await?;

    Ok(connection)
}

/// Inserts a pending connection. The unique index on the normalized pair key
/// makes the losing side of a concurrent duplicate insert fail; callers map
/// that through [`super::is_unique_violation`].
pub async fn create_connection(
    pool: &PgPool,
    id: Uuid,
    user1_id: Uuid,
    user2_id: Uuid,
    skill1: &str,
    skill2: &str,
) -> Result<Connection> {
    let connection = sqlx::query_as::<_, Connection>(
        r#"
        INSERT INTO connections (id, user1_id, user2_id, skill1, skill2, status)
        VALUES ($1, $2, $3, $4, $5, 'pending')
        RETURNING id, user1_id, user2_id, skill1, skill2, status, created_at, responded_at
        "#,
    )
    .bind(id)
    .bind(user1_id)
    .bind(user2_id)
    .bind(skill1)
    .bind(skill2)
    .fetch_one(pool)
    .await?;

    Ok(connection)
}

pub async fn get_connection(pool: &PgPool, id: Uuid) -> Result<Option<Connection>> {
    let connection = sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, user1_id, user2_id, skill1, skill2, status, created_at, responded_at
        FROM connections
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(connection)
}

pub async fn pending_for_recipient(pool: &PgPool, recipient_id: Uuid) -> Result<Vec<Connection>> {
    let connections = sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, user1_id, user2_id, skill1, skill2, status, created_at, responded_at
        FROM connections
        WHERE user2_id = $1 AND status = 'pending'
        ORDER BY created_at ASC
        "#,
    )
    .bind(recipient_id)
    .fetch_all(pool)
    .await?;

    Ok(connections)
}

pub async fn accepted_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Connection>> {
    let connections = sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, user1_id, user2_id, skill1, skill2, status, created_at, responded_at
        FROM connections
        WHERE status = 'accepted' AND (user1_id = $1 OR user2_id = $1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(connections)
}

/// Ids of everyone the user holds an accepted connection with.
pub async fn accepted_peer_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT CASE WHEN user1_id = $1 THEN user2_id ELSE user1_id END
        FROM connections
        WHERE status = 'accepted' AND (user1_id = $1 OR user2_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: ConnectionStatus,
) -> Result<Connection> {
    let connection = sqlx::query_as::<_, Connection>(
        r#"
        UPDATE connections
        SET status = $2, responded_at = NOW()
        WHERE id = $1
        RETURNING id, user1_id, user2_id, skill1, skill2, status, created_at, responded_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(connection)
}

pub async fn delete_connection(pool: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM connections
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
