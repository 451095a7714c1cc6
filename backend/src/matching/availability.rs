use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::AvailabilitySlot;

static HHMM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("HH:MM pattern"));

/// Parses `"HH:MM"` into minutes since midnight. Returns `None` for anything
/// that is not a well-formed 24h clock time.
pub fn parse_minutes(value: &str) -> Option<u32> {
    let caps = HHMM.captures(value)?;
    let hours: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(hours * 60 + minutes)
}

/// Half-open interval overlap on the same weekday: `09:00-10:00` and
/// `10:00-11:00` touch but do not overlap. A malformed time on either side
/// makes the pair non-overlapping rather than an error.
///
/// Times are compared as raw clock values; the owners' `timezone` fields are
/// not consulted.
pub fn slots_overlap(a: &AvailabilitySlot, b: &AvailabilitySlot) -> bool {
    if a.day_of_week != b.day_of_week {
        return false;
    }
    let (Some(start_a), Some(end_a)) = (parse_minutes(&a.start), parse_minutes(&a.end)) else {
        return false;
    };
    let (Some(start_b), Some(end_b)) = (parse_minutes(&b.start), parse_minutes(&b.end)) else {
        return false;
    };
    start_a.max(start_b) < end_a.min(end_b)
}

/// True when at least one slot pair across the two schedules overlaps.
pub fn schedules_overlap(mine: &[AvailabilitySlot], theirs: &[AvailabilitySlot]) -> bool {
    mine.iter()
        .any(|a| theirs.iter().any(|b| slots_overlap(a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day_of_week: i16, start: &str, end: &str) -> AvailabilitySlot {
        AvailabilitySlot {
            day_of_week,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn test_parse_minutes_valid() {
        assert_eq!(parse_minutes("00:00"), Some(0));
        assert_eq!(parse_minutes("09:30"), Some(570));
        assert_eq!(parse_minutes("9:30"), Some(570));
        assert_eq!(parse_minutes("18:00"), Some(1080));
        assert_eq!(parse_minutes("23:59"), Some(1439));
    }

    #[test]
    fn test_parse_minutes_malformed() {
        assert_eq!(parse_minutes(""), None);
        assert_eq!(parse_minutes("24:00"), None);
        assert_eq!(parse_minutes("12:60"), None);
        assert_eq!(parse_minutes("12:5"), None);
        assert_eq!(parse_minutes("1200"), None);
        assert_eq!(parse_minutes("noon"), None);
        assert_eq!(parse_minutes("12:00pm"), None);
    }

    #[test]
    fn test_overlapping_slots() {
        let a = slot(1, "18:00", "19:00");
        let b = slot(1, "18:30", "19:30");
        assert!(slots_overlap(&a, &b));
        assert!(slots_overlap(&b, &a));
    }

    #[test]
    fn test_touching_slots_do_not_overlap() {
        let a = slot(1, "18:00", "19:00");
        let b = slot(1, "19:00", "20:00");
        assert!(!slots_overlap(&a, &b));
        assert!(!slots_overlap(&b, &a));
    }

    #[test]
    fn test_different_days_do_not_overlap() {
        let a = slot(1, "18:00", "19:00");
        let b = slot(2, "18:00", "19:00");
        assert!(!slots_overlap(&a, &b));
    }

    #[test]
    fn test_contained_slot_overlaps() {
        let outer = slot(3, "08:00", "20:00");
        let inner = slot(3, "12:00", "13:00");
        assert!(slots_overlap(&outer, &inner));
    }

    #[test]
    fn test_malformed_slot_is_skipped() {
        let good = slot(1, "18:00", "19:00");
        let bad = slot(1, "six pm", "19:00");
        assert!(!slots_overlap(&good, &bad));
        assert!(!slots_overlap(&bad, &good));
    }

    #[test]
    fn test_inverted_slot_never_overlaps() {
        let inverted = slot(1, "19:00", "18:00");
        let normal = slot(1, "18:00", "20:00");
        assert!(!slots_overlap(&inverted, &normal));
    }

    #[test]
    fn test_schedules_overlap_any_pair() {
        let mine = vec![slot(0, "10:00", "11:00"), slot(1, "18:00", "19:00")];
        let theirs = vec![slot(5, "10:00", "11:00"), slot(1, "18:30", "19:30")];
        assert!(schedules_overlap(&mine, &theirs));

        let disjoint = vec![slot(5, "10:00", "11:00"), slot(1, "19:00", "20:00")];
        assert!(!schedules_overlap(&mine, &disjoint));
    }

    #[test]
    fn test_empty_schedules_do_not_overlap() {
        let mine = vec![slot(1, "18:00", "19:00")];
        assert!(!schedules_overlap(&mine, &[]));
        assert!(!schedules_overlap(&[], &mine));
    }
}
