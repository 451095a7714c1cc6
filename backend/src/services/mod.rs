pub mod calendar;
pub mod zoom;

pub use calendar::CalendarService;
pub use zoom::{ZoomMeeting, ZoomService};

use crate::models::Meeting;

/// One external resource the end-match cascade should try to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalCleanup {
    ZoomMeeting(String),
    CalendarEvent(String),
}

/// Which external deletions a set of meetings requires: one action per
/// stored resource id. Pure planning; the caller executes each action
/// best-effort and never lets a failure abort the cascade.
pub fn cleanups_for(meetings: &[Meeting]) -> Vec<ExternalCleanup> {
    let mut actions = Vec::new();
    for meeting in meetings {
        if let Some(zoom_id) = &meeting.zoom_meeting_id {
            actions.push(ExternalCleanup::ZoomMeeting(zoom_id.clone()));
        }
        if let Some(event_id) = &meeting.calendar_event_id {
            actions.push(ExternalCleanup::CalendarEvent(event_id.clone()));
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn meeting(zoom_meeting_id: Option<&str>, calendar_event_id: Option<&str>) -> Meeting {
        let starts_at = Utc::now() + Duration::days(1);
        Meeting {
            id: Uuid::new_v4(),
            connection_id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            topic: "intro session".to_string(),
            starts_at,
            ends_at: starts_at + Duration::hours(1),
            zoom_meeting_id: zoom_meeting_id.map(|s| s.to_string()),
            zoom_join_url: zoom_meeting_id.map(|_| "https://zoom.example/j/1".to_string()),
            calendar_event_id: calendar_event_id.map(|s| s.to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_one_zoom_action_per_meeting_with_zoom_id() {
        let meetings = vec![meeting(Some("9001"), None), meeting(None, None)];
        let actions = cleanups_for(&meetings);
        assert_eq!(
            actions,
            vec![ExternalCleanup::ZoomMeeting("9001".to_string())]
        );
    }

    #[test]
    fn test_meeting_with_both_resources_plans_both() {
        let meetings = vec![meeting(Some("9001"), Some("evt_1"))];
        let actions = cleanups_for(&meetings);
        assert_eq!(
            actions,
            vec![
                ExternalCleanup::ZoomMeeting("9001".to_string()),
                ExternalCleanup::CalendarEvent("evt_1".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_external_resources_plans_nothing() {
        let meetings = vec![meeting(None, None), meeting(None, None)];
        assert!(cleanups_for(&meetings).is_empty());
    }
}
