pub mod availability;

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{RatingSummary, UserProfile};
use self::availability::schedules_overlap;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// One entry of a `findMatches` result. Derived per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    pub user_id: Uuid,
    pub name: String,
    /// The candidate's interests the requester can teach. Non-empty for
    /// every returned candidate.
    pub skills_they_want: Vec<String>,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
}

/// Canonical form for skill and interest labels: trimmed, lowercased, inner
/// whitespace collapsed.
pub fn normalize_label(label: &str) -> String {
    WHITESPACE.replace_all(label.trim(), " ").to_lowercase()
}

/// Normalizes a label list, dropping empties and duplicates while keeping
/// first-seen order.
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(|label| normalize_label(label))
        .filter(|label| !label.is_empty() && seen.insert(label.clone()))
        .collect()
}

/// The candidate's interests the requester can serve, in the candidate's
/// interest order.
pub fn skills_they_want(requester: &UserProfile, candidate: &UserProfile) -> Vec<String> {
    candidate
        .interests
        .iter()
        .filter(|interest| requester.skills.contains(interest))
        .cloned()
        .collect()
}

/// Eligibility filter for one matching request. A candidate survives when it
/// is not the requester, not already connected, teaches `interest`, wants at
/// least one skill the requester teaches, and (only if the requester has any
/// availability slots) shares at least one overlapping weekly slot. Input
/// order is preserved.
pub fn filter_candidates(
    requester: &UserProfile,
    interest: &str,
    connected: &HashSet<Uuid>,
    candidates: Vec<UserProfile>,
) -> Vec<UserProfile> {
    let gate_on_availability = !requester.availability.is_empty();
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate.id != requester.id
                && !connected.contains(&candidate.id)
                && candidate.skills.iter().any(|skill| skill == interest)
                && candidate
                    .interests
                    .iter()
                    .any(|want| requester.skills.contains(want))
                && (!gate_on_availability
                    || schedules_overlap(
                        requester.availability.as_slice(),
                        candidate.availability.as_slice(),
                    ))
        })
        .collect()
}

/// Shapes surviving candidates into the response type, attaching rating
/// aggregates. Candidates with no reviews get `avg_rating: None, 0`.
pub fn to_candidate_matches(
    requester: &UserProfile,
    survivors: Vec<UserProfile>,
    ratings: &HashMap<Uuid, RatingSummary>,
) -> Vec<CandidateMatch> {
    survivors
        .into_iter()
        .map(|candidate| {
            let wants = skills_they_want(requester, &candidate);
            let summary = ratings.get(&candidate.id);
            CandidateMatch {
                user_id: candidate.id,
                name: candidate.name,
                skills_they_want: wants,
                avg_rating: summary.map(|s| s.average),
                review_count: summary.map_or(0, |s| s.count),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilitySlot;
    use chrono::Utc;
    use sqlx::types::Json;

    fn slot(day_of_week: i16, start: &str, end: &str) -> AvailabilitySlot {
        AvailabilitySlot {
            day_of_week,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn profile(
        name: &str,
        skills: &[&str],
        interests: &[&str],
        availability: Vec<AvailabilitySlot>,
    ) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            email: format!("{name}@example.com"),
            name: name.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            availability: Json(availability),
            timezone: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reciprocal_candidate_matches() {
        // Requester teaches python, wants guitar, no availability set.
        let requester = profile("rita", &["python"], &["guitar"], vec![]);
        let candidate = profile("xavier", &["guitar"], &["python", "spanish"], vec![]);
        let candidate_id = candidate.id;

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        assert_eq!(survivors.len(), 1);

        let matches = to_candidate_matches(&requester, survivors, &HashMap::new());
        assert_eq!(matches[0].user_id, candidate_id);
        assert_eq!(matches[0].skills_they_want, vec!["python".to_string()]);
        assert_eq!(matches[0].avg_rating, None);
        assert_eq!(matches[0].review_count, 0);
    }

    #[test]
    fn test_candidate_without_reciprocity_is_excluded() {
        let requester = profile("rita", &["python"], &["guitar"], vec![]);
        let candidate = profile("xavier", &["guitar"], &["spanish"], vec![]);

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_candidate_not_teaching_interest_is_excluded() {
        let requester = profile("rita", &["python"], &["guitar"], vec![]);
        let candidate = profile("xavier", &["piano"], &["python"], vec![]);

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_already_connected_candidate_is_excluded() {
        let requester = profile("rita", &["python"], &["guitar"], vec![]);
        let candidate = profile("xavier", &["guitar"], &["python"], vec![]);
        let connected: HashSet<Uuid> = [candidate.id].into_iter().collect();

        let survivors = filter_candidates(&requester, "guitar", &connected, vec![candidate]);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_requester_is_excluded_from_own_results() {
        let requester = profile("rita", &["python", "guitar"], &["guitar"], vec![]);

        let survivors = filter_candidates(
            &requester,
            "guitar",
            &HashSet::new(),
            vec![requester.clone()],
        );
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_no_requester_availability_skips_time_filter() {
        let requester = profile("rita", &["python"], &["guitar"], vec![]);
        let candidate = profile(
            "xavier",
            &["guitar"],
            &["python"],
            vec![slot(1, "19:00", "20:00")],
        );

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        assert_eq!(survivors.len(), 1);
    }

    #[test]
    fn test_touching_availability_is_excluded() {
        let requester = profile(
            "rita",
            &["python"],
            &["guitar"],
            vec![slot(1, "18:00", "19:00")],
        );
        let candidate = profile(
            "xavier",
            &["guitar"],
            &["python"],
            vec![slot(1, "19:00", "20:00")],
        );

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_overlapping_availability_is_included() {
        let requester = profile(
            "rita",
            &["python"],
            &["guitar"],
            vec![slot(1, "18:00", "19:00")],
        );
        let candidate = profile(
            "xavier",
            &["guitar"],
            &["python"],
            vec![slot(1, "18:30", "19:30")],
        );

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        assert_eq!(survivors.len(), 1);
    }

    #[test]
    fn test_candidate_with_no_slots_fails_availability_gate() {
        let requester = profile(
            "rita",
            &["python"],
            &["guitar"],
            vec![slot(1, "18:00", "19:00")],
        );
        let candidate = profile("xavier", &["guitar"], &["python"], vec![]);

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_all_reciprocal_interests_are_reported() {
        let requester = profile("rita", &["python", "spanish"], &["guitar"], vec![]);
        let candidate = profile(
            "xavier",
            &["guitar"],
            &["spanish", "surfing", "python"],
            vec![],
        );

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![candidate]);
        let matches = to_candidate_matches(&requester, survivors, &HashMap::new());
        assert_eq!(
            matches[0].skills_they_want,
            vec!["spanish".to_string(), "python".to_string()]
        );
    }

    #[test]
    fn test_rating_aggregates_are_attached() {
        let requester = profile("rita", &["python"], &["guitar"], vec![]);
        let rated = profile("xavier", &["guitar"], &["python"], vec![]);
        let unrated = profile("yolanda", &["guitar"], &["python"], vec![]);
        let rated_id = rated.id;

        let mut ratings = HashMap::new();
        ratings.insert(
            rated_id,
            RatingSummary {
                average: 4.5,
                count: 2,
            },
        );

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![rated, unrated]);
        let matches = to_candidate_matches(&requester, survivors, &ratings);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].avg_rating, Some(4.5));
        assert_eq!(matches[0].review_count, 2);
        assert_eq!(matches[1].avg_rating, None);
        assert_eq!(matches[1].review_count, 0);
    }

    #[test]
    fn test_candidate_order_is_preserved() {
        let requester = profile("rita", &["python"], &["guitar"], vec![]);
        let first = profile("alice", &["guitar"], &["python"], vec![]);
        let second = profile("bob", &["guitar"], &["python"], vec![]);
        let ids = vec![first.id, second.id];

        let survivors =
            filter_candidates(&requester, "guitar", &HashSet::new(), vec![first, second]);
        let got: Vec<Uuid> = survivors.iter().map(|c| c.id).collect();
        assert_eq!(got, ids);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Guitar  "), "guitar");
        assert_eq!(normalize_label("Machine   Learning"), "machine learning");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_normalize_labels_dedups_and_drops_empties() {
        let labels = vec![
            "Guitar".to_string(),
            "  guitar ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "Web  Dev".to_string(),
        ];
        assert_eq!(
            normalize_labels(&labels),
            vec!["guitar".to_string(), "web dev".to_string()]
        );
    }
}
