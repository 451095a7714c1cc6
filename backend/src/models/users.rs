use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A recurring weekly window during which a user is willing to meet.
/// `start`/`end` are raw `"HH:MM"` strings; `start < end` is expected but not
/// enforced, and duplicate or overlapping slots are permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub day_of_week: i16,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Lowercased labels the user can teach.
    pub skills: Vec<String>,
    /// Lowercased labels the user wants to learn.
    pub interests: Vec<String>,
    pub availability: Json<Vec<AvailabilitySlot>>,
    /// IANA zone name, informational only.
    pub timezone: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile view exposed to other users (pending requests, match results).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
}

impl From<UserProfile> for PublicProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            skills: profile.skills,
            interests: profile.interests,
        }
    }
}
