// src/domain/detector.rs

use crate::domain::prospect::HospitalSnapshot;
use crate::registry::models::{RegistryBuildingRecord, RegistryHospitalRecord};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// A hospital whose establishment date falls within this trailing window is
/// treated as newly opened.
pub const NEW_HOSPITAL_WINDOW_DAYS: i64 = 7;

/// A building approved for use within this trailing window is a candidate.
pub const NEW_BUILDING_WINDOW_DAYS: i64 = 30;

/// Purpose-category names that make a building a plausible clinic site. The
/// ledger writes these into either the primary purpose code name or the
/// secondary free-text purpose field.
pub const MEDICAL_USE_ALLOWLIST: &[&str] = &[
    "제1종근린생활시설",
    "제2종근린생활시설",
    "근린생활시설",
    "의료시설",
    "업무시설",
];

fn parse_yyyymmdd(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y%m%d").ok()
}

// ---------------- Hospital diff ----------------
//
// Hospitals have a canonical id (ykiho) and a trusted prior snapshot, so true
// set difference applies. Buildings have neither; see the filter below.

/// Live records established within the trailing window, i.e. newly opened.
pub fn newly_established<'a>(
    live: &'a [RegistryHospitalRecord],
    today: NaiveDate,
) -> Vec<&'a RegistryHospitalRecord> {
    let cutoff = today - chrono::Duration::days(NEW_HOSPITAL_WINDOW_DAYS);
    live.iter()
        .filter(|r| !r.ykiho.is_empty())
        .filter(|r| match parse_yyyymmdd(&r.established) {
            Some(d) => d >= cutoff && d <= today,
            None => false,
        })
        .collect()
}

/// Persisted-active hospitals absent from the live id set, i.e. closed.
/// Output is sorted by ykiho so callers behave identically regardless of
/// fetch ordering.
pub fn closed_hospitals<'a>(
    active: &'a HashMap<String, HospitalSnapshot>,
    live_ids: &HashSet<String>,
) -> Vec<&'a HospitalSnapshot> {
    let mut closed: Vec<&HospitalSnapshot> = active
        .iter()
        .filter(|(ykiho, _)| !live_ids.contains(*ykiho))
        .map(|(_, snapshot)| snapshot)
        .collect();
    closed.sort_by(|a, b| a.ykiho.cmp(&b.ykiho));
    closed
}

// ---------------- Building filter ----------------

pub fn is_medical_purpose(record: &RegistryBuildingRecord) -> bool {
    MEDICAL_USE_ALLOWLIST
        .iter()
        .any(|keyword| record.main_purpose.contains(keyword) || record.etc_purpose.contains(keyword))
}

fn is_recently_approved(record: &RegistryBuildingRecord, today: NaiveDate) -> bool {
    let cutoff = today - chrono::Duration::days(NEW_BUILDING_WINDOW_DAYS);
    match parse_yyyymmdd(&record.use_approved) {
        Some(d) => d >= cutoff,
        None => false,
    }
}

/// A building is a prospect candidate when it was approved for use within the
/// trailing window and its purpose text matches the medical-use allowlist.
pub fn is_candidate_building(record: &RegistryBuildingRecord, today: NaiveDate) -> bool {
    is_recently_approved(record, today) && is_medical_purpose(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital(ykiho: &str, established: &str) -> RegistryHospitalRecord {
        RegistryHospitalRecord {
            ykiho: ykiho.to_string(),
            name: format!("{ykiho}의원"),
            address: "서울 강남구".to_string(),
            phone: String::new(),
            longitude: 127.0,
            latitude: 37.5,
            specialty: String::new(),
            established: established.to_string(),
            doctor_count: 1,
            clinic_type_cd: "31".to_string(),
        }
    }

    fn snapshot(ykiho: &str) -> HospitalSnapshot {
        HospitalSnapshot {
            ykiho: ykiho.to_string(),
            name: format!("{ykiho}의원"),
            address: format!("서울 강남구 {ykiho}로 1"),
            latitude: 37.5,
            longitude: 127.0,
        }
    }

    fn building(main: &str, etc: &str, approved: &str) -> RegistryBuildingRecord {
        RegistryBuildingRecord {
            building_id: "11680-1".to_string(),
            name: String::new(),
            lot_address: String::new(),
            road_address: String::new(),
            main_purpose: main.to_string(),
            etc_purpose: etc.to_string(),
            total_area: 120.0,
            use_approved: approved.to_string(),
            ground_floors: 2,
            underground_floors: 0,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_diff_reports_closed_and_new_independent_of_order() {
        let today = day(2026, 8, 30);
        let active: HashMap<String, HospitalSnapshot> = ["A", "B", "C"]
            .iter()
            .map(|k| (k.to_string(), snapshot(k)))
            .collect();

        // D opened 3 days ago; B and C are long-established.
        let live = vec![
            hospital("D", "20260827"),
            hospital("C", "20190104"),
            hospital("B", "20111130"),
        ];
        let live_ids: HashSet<String> = live.iter().map(|h| h.ykiho.clone()).collect();

        let closed = closed_hospitals(&active, &live_ids);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].ykiho, "A");

        let new = newly_established(&live, today);
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].ykiho, "D");

        // Same result with the live list reversed.
        let reversed: Vec<_> = live.iter().rev().cloned().collect();
        let new_rev = newly_established(&reversed, today);
        assert_eq!(new_rev.len(), 1);
        assert_eq!(new_rev[0].ykiho, "D");
    }

    #[test]
    fn test_establishment_window_boundaries() {
        let today = day(2026, 8, 30);
        let live = vec![
            hospital("EDGE", "20260823"),   // exactly 7 days ago: in
            hospital("OLD", "20260822"),    // 8 days ago: out
            hospital("FUTURE", "20260901"), // future-dated rows are not "new"
            hospital("BAD", "not-a-date"),
        ];
        let new = newly_established(&live, today);
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].ykiho, "EDGE");
    }

    #[test]
    fn test_blank_ykiho_never_counts_as_new() {
        let today = day(2026, 8, 30);
        let live = vec![hospital("", "20260829")];
        assert!(newly_established(&live, today).is_empty());
    }

    #[test]
    fn test_building_filter_requires_both_recency_and_purpose() {
        let today = day(2026, 8, 30);

        // 14 days old, 1st-class neighborhood facility: candidate.
        let hit = building("제1종근린생활시설", "", "20260816");
        assert!(is_candidate_building(&hit, today));

        // Right purpose, approved 31 days ago: out.
        let stale = building("의료시설", "", "20260730");
        assert!(!is_candidate_building(&stale, today));

        // Fresh approval, residential purpose: out.
        let wrong_use = building("공동주택", "주택", "20260828");
        assert!(!is_candidate_building(&wrong_use, today));

        // Purpose match via the secondary free-text field counts too.
        let etc_hit = building("공동주택", "일부 제2종근린생활시설", "20260828");
        assert!(is_candidate_building(&etc_hit, today));

        // Missing approval date: out.
        let no_date = building("의료시설", "", "");
        assert!(!is_candidate_building(&no_date, today));
    }

    #[test]
    fn test_building_window_boundary() {
        let today = day(2026, 8, 30);
        // Exactly 30 days ago is still inside the window.
        let edge = building("의료시설", "", "20260731");
        assert!(is_candidate_building(&edge, today));
    }
}
