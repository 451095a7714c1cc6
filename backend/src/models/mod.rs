pub mod connections;
pub mod meetings;
pub mod reviews;
pub mod users;

pub use connections::{Connection, ConnectionStatus};
pub use meetings::{Meeting, NewMeeting};
pub use reviews::{RatingSummary, Review};
pub use users::{AvailabilitySlot, PublicProfile, UserProfile};
