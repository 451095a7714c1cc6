use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Meeting, NewMeeting};

pub async fn create_meeting(pool: &PgPool, meeting: &NewMeeting) -> Result<Meeting> {
    let meeting = sqlx::query_as::<_, Meeting>(
        r#"
        INSERT INTO meetings
            (id, connection_id, organizer_id, topic, starts_at, ends_at,
             zoom_meeting_id, zoom_join_url, calendar_event_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, connection_id, organizer_id, topic, starts_at, ends_at,
                  zoom_meeting_id, zoom_join_url, calendar_event_id, created_at
        "#,
    )
    .bind(meeting.id)
    .bind(meeting.connection_id)
    .bind(meeting.organizer_id)
    .bind(&meeting.topic)
    .bind(meeting.starts_at)
    .bind(meeting.ends_at)
    .bind(meeting.zoom_meeting_id.as_deref())
    .bind(meeting.zoom_join_url.as_deref())
    .bind(meeting.calendar_event_id.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(meeting)
}

/// The caller's meetings that start after `after`, across all of their
/// connections.
pub async fn upcoming_for_user(
    pool: &PgPool,
    user_id: Uuid,
    after: DateTime<Utc>,
) -> Result<Vec<Meeting>> {
    let meetings = sqlx::query_as::<_, Meeting>(
        r#"
        SELECT m.id, m.connection_id, m.organizer_id, m.topic, m.starts_at, m.ends_at,
               m.zoom_meeting_id, m.zoom_join_url, m.calendar_event_id, m.created_at
        FROM meetings m
        JOIN connections c ON m.connection_id = c.id
        WHERE (c.user1_id = $1 OR c.user2_id = $1) AND m.starts_at > $2
        ORDER BY m.starts_at ASC
        "#,
    )
    .bind(user_id)
    .bind(after)
    .fetch_all(pool)
    .await?;

    Ok(meetings)
}

/// Future-dated meetings of one connection, the set the end-match cascade
/// removes.
pub async fn future_for_connection(
    pool: &PgPool,
    connection_id: Uuid,
    after: DateTime<Utc>,
) -> Result<Vec<Meeting>> {
    let meetings = sqlx::query_as::<_, Meeting>(
        r#"
        SELECT id, connection_id, organizer_id, topic, starts_at, ends_at,
               zoom_meeting_id, zoom_join_url, calendar_event_id, created_at
        FROM meetings
        WHERE connection_id = $1 AND starts_at > $2
        ORDER BY starts_at ASC
        "#,
    )
    .bind(connection_id)
    .bind(after)
    .fetch_all(pool)
    .await?;

    Ok(meetings)
}

pub async fn delete_meetings(pool: &PgPool, ids: &[Uuid]) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM meetings
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
