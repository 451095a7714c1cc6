pub mod admin;
pub mod connections;
pub mod matches;
pub mod meetings;
pub mod profiles;
pub mod reviews;

pub use admin::end_match;
pub use connections::{list_connections, pending_requests, respond_request, send_request};
pub use matches::find_matches;
pub use meetings::{list_meetings, schedule_meeting};
pub use profiles::{create_profile, get_me, update_profile};
pub use reviews::create_review;

use axum::Json;
use serde::Serialize;

/// Uniform success envelope for every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}
