pub mod connection;
pub mod connections;
pub mod meetings;
pub mod migrations;
pub mod profiles;
pub mod reviews;

pub use connection::{DatabaseConfig, get_db_pool};

/// True when the error chain bottoms out in a database unique-constraint
/// violation, e.g. the normalized connection pair key or the user email.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}
