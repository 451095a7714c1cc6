use anyhow::Result;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{RatingSummary, Review};

pub async fn create_review(
    pool: &PgPool,
    id: Uuid,
    from_user_id: Uuid,
    to_user_id: Uuid,
    connection_id: Uuid,
    rating: i32,
    comment: Option<&str>,
) -> Result<Review> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (id, from_user_id, to_user_id, connection_id, rating, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, from_user_id, to_user_id, connection_id, rating, comment, created_at
        "#,
    )
    .bind(id)
    .bind(from_user_id)
    .bind(to_user_id)
    .bind(connection_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await?;

    Ok(review)
}

/// One grouped query for the whole candidate set. Users with no reviews are
/// simply absent from the map; callers supply the default.
pub async fn average_ratings_for(
    pool: &PgPool,
    user_ids: &[Uuid],
) -> Result<HashMap<Uuid, RatingSummary>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, (Uuid, f64, i64)>(
        r#"
        SELECT to_user_id, AVG(rating)::FLOAT8, COUNT(*)
        FROM reviews
        WHERE to_user_id = ANY($1)
        GROUP BY to_user_id
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(user_id, average, count)| (user_id, RatingSummary { average, count }))
        .collect())
}
