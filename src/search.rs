//! History search: case-insensitive substring filters over requests and logs.
//!
//! Linear scans that keep the input order. An empty term matches everything;
//! any other term, whitespace included, must appear as written.

use crate::model::{ActivityLog, EmergencyRequest};

/// Requests whose id, location, or assigned ambulance contains `term`.
pub fn filter_requests<'a>(
    records: &'a [EmergencyRequest],
    term: &str,
) -> Vec<&'a EmergencyRequest> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| {
            contains(r.id.as_str(), &needle)
                || contains(&r.location, &needle)
                || r.ambulance_id
                    .as_ref()
                    .is_some_and(|a| contains(a.as_str(), &needle))
        })
        .collect()
}

/// Log entries whose description or category label contains `term`.
pub fn filter_logs<'a>(records: &'a [ActivityLog], term: &str) -> Vec<&'a ActivityLog> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|l| contains(&l.description, &needle) || contains(l.category.label(), &needle))
        .collect()
}

/// `needle` must already be lowercase.
fn contains(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{LogCategory, RequestStatus};
    use crate::seed::Seed;

    fn ids(found: &[&EmergencyRequest]) -> Vec<String> {
        found.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn empty_term_returns_everything_in_order() {
        let seed = Seed::builtin();
        let found = filter_requests(&seed.requests, "");
        assert_eq!(found.len(), seed.requests.len());
        for (got, want) in found.iter().zip(&seed.requests) {
            assert_eq!(*got, want);
        }

        let logs = filter_logs(&seed.logs, "");
        assert_eq!(logs.len(), seed.logs.len());
    }

    #[test]
    fn whitespace_is_part_of_the_term() {
        let seed = Seed::builtin();
        assert!(filter_requests(&seed.requests, "   ").is_empty());
        assert!(filter_requests(&seed.requests, " emr001").is_empty());
        assert_eq!(ids(&filter_requests(&seed.requests, "emr001")), ["EMR001"]);
        assert_eq!(ids(&filter_requests(&seed.requests, "elm street")), ["EMR001"]);

        let found = filter_logs(&seed.logs, " ");
        assert_eq!(found.len(), seed.logs.len());
        assert!(found.iter().all(|l| l.description.contains(' ')));
    }

    #[test]
    fn matches_id_case_insensitively() {
        let seed = Seed::builtin();
        assert_eq!(ids(&filter_requests(&seed.requests, "hst00")), [
            "HST001", "HST002", "HST003", "HST004"
        ]);
    }

    #[test]
    fn matches_location() {
        let seed = Seed::builtin();
        assert_eq!(ids(&filter_requests(&seed.requests, "OAK AVENUE")), ["EMR002"]);
    }

    #[test]
    fn matches_assigned_ambulance_and_skips_unassigned() {
        let seed = Seed::builtin();
        let found = filter_requests(&seed.requests, "amb003");
        assert_eq!(ids(&found), ["EMR004", "HST004"]);
        assert!(found.iter().all(|r| r.ambulance_id.is_some()));
    }

    #[test]
    fn does_not_scan_notes() {
        let seed = Seed::builtin();
        assert!(filter_requests(&seed.requests, "false alarm").is_empty());
    }

    #[test]
    fn every_result_contains_term_in_a_scanned_field() {
        let seed = Seed::builtin();
        for term in ["1", "st", "amb", "emr00", "Lane", "zzz"] {
            let needle = term.to_lowercase();
            let found = filter_requests(&seed.requests, term);
            assert!(found.len() <= seed.requests.len());
            for r in found {
                let hit = r.id.as_str().to_lowercase().contains(&needle)
                    || r.location.to_lowercase().contains(&needle)
                    || r.ambulance_id
                        .as_ref()
                        .is_some_and(|a| a.as_str().to_lowercase().contains(&needle));
                assert!(hit, "{} does not contain {term}", r.id);
                assert!(seed.requests.contains(r));
            }
        }
    }

    #[test]
    fn status_is_not_a_search_field() {
        let seed = Seed::builtin();
        let found = filter_requests(&seed.requests, "resolved");
        assert!(found.iter().all(|r| r.status != RequestStatus::Resolved));
    }

    #[test]
    fn logs_match_description() {
        let seed = Seed::builtin();
        let found = filter_logs(&seed.logs, "backup");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "SL003");
    }

    #[test]
    fn logs_match_category_label() {
        let seed = Seed::builtin();
        let found = filter_logs(&seed.logs, "user action");
        assert!(!found.is_empty());
        assert!(found.iter().all(|l| l.category == LogCategory::UserAction));
    }
}
