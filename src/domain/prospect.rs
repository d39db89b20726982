// src/domain/prospect.rs

use crate::domain::scoring;
use crate::registry::models::RegistryBuildingRecord;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProspectKind {
    NewBuild,
    Vacancy,
}

impl ProspectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProspectKind::NewBuild => "NEW_BUILD",
            ProspectKind::Vacancy => "VACANCY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW_BUILD" => Some(ProspectKind::NewBuild),
            "VACANCY" => Some(ProspectKind::Vacancy),
            _ => None,
        }
    }
}

/// Last-known state of an `is_active` hospital row, loaded for the closed
/// detection diff. When the hospital disappears from the live registry this
/// snapshot is all we have left to seed the vacancy prospect from.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalSnapshot {
    pub ykiho: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A detected opportunity headed for upsert, flattened and scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProspectCandidate {
    /// Natural key: building id for new builds, address for vacancies.
    pub source_key: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: ProspectKind,
    pub prior_use: String,
    pub floor_area: f64,
    pub fit_score: i64,
    pub recommended_depts: Vec<String>,
    pub previous_clinic: Option<String>,
}

impl ProspectCandidate {
    /// Build a NEW_BUILD candidate from a ledger record that already passed
    /// the medical-use filter.
    pub fn from_building(record: &RegistryBuildingRecord) -> Self {
        let address = if record.road_address.is_empty() {
            record.lot_address.clone()
        } else {
            record.road_address.clone()
        };
        // Ledger pk is the natural key; some entries ship without one, in
        // which case the address has to stand in.
        let source_key = if record.building_id.is_empty() {
            address.clone()
        } else {
            record.building_id.clone()
        };

        ProspectCandidate {
            source_key,
            address,
            latitude: 0.0,
            longitude: 0.0,
            kind: ProspectKind::NewBuild,
            prior_use: record.main_purpose.clone(),
            floor_area: record.total_area,
            fit_score: scoring::score_building(record.total_area, record.ground_floors),
            recommended_depts: scoring::recommend_departments(record.total_area),
            previous_clinic: None,
        }
    }

    /// Build a VACANCY candidate from the stale snapshot of a hospital that
    /// vanished from the registry. Coordinates are carried over as-is; no
    /// building attributes are available, so the fixed vacancy score applies.
    pub fn from_closed_hospital(snapshot: &HospitalSnapshot) -> Self {
        ProspectCandidate {
            source_key: snapshot.address.clone(),
            address: snapshot.address.clone(),
            latitude: snapshot.latitude,
            longitude: snapshot.longitude,
            kind: ProspectKind::Vacancy,
            prior_use: "의원".to_string(),
            floor_area: 0.0,
            fit_score: scoring::VACANCY_FIT_SCORE,
            recommended_depts: scoring::recommend_departments(0.0),
            previous_clinic: Some(snapshot.name.clone()),
        }
    }
}

/// A prospect row as stored, loaded back for alert matching.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProspect {
    pub id: i64,
    pub source_key: String,
    pub address: String,
    pub kind: ProspectKind,
    pub fit_score: i64,
    pub recommended_depts: Vec<String>,
    pub previous_clinic: Option<String>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn building(id: &str, road: &str, lot: &str) -> RegistryBuildingRecord {
        RegistryBuildingRecord {
            building_id: id.to_string(),
            name: "테스트빌딩".to_string(),
            lot_address: lot.to_string(),
            road_address: road.to_string(),
            main_purpose: "제2종근린생활시설".to_string(),
            etc_purpose: String::new(),
            total_area: 150.0,
            use_approved: "20260820".to_string(),
            ground_floors: 3,
            underground_floors: 1,
        }
    }

    #[test]
    fn test_building_candidate_prefers_road_address_and_pk_key() {
        let c = ProspectCandidate::from_building(&building(
            "11680-1",
            "테헤란로 1",
            "역삼동 1-1",
        ));
        assert_eq!(c.source_key, "11680-1");
        assert_eq!(c.address, "테헤란로 1");
        assert_eq!(c.kind, ProspectKind::NewBuild);
        assert_eq!(c.fit_score, 80);
    }

    #[test]
    fn test_building_candidate_falls_back_to_address_key() {
        let c = ProspectCandidate::from_building(&building("", "", "역삼동 1-1"));
        assert_eq!(c.address, "역삼동 1-1");
        assert_eq!(c.source_key, "역삼동 1-1");
    }

    #[test]
    fn test_fresh_neighborhood_building_end_to_end() {
        // A 220㎡ six-storey building approved two weeks ago under a
        // 1st-class neighborhood-facility purpose: passes the candidate
        // filter and scores all three bonuses into the top department bucket.
        let record = RegistryBuildingRecord {
            building_id: "11680-100203".to_string(),
            name: "역삼타워".to_string(),
            lot_address: "서울특별시 강남구 역삼동 123-45".to_string(),
            road_address: "서울특별시 강남구 테헤란로 101".to_string(),
            main_purpose: "제1종근린생활시설".to_string(),
            etc_purpose: String::new(),
            total_area: 220.0,
            use_approved: "20260816".to_string(),
            ground_floors: 6,
            underground_floors: 2,
        };
        let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        assert!(crate::domain::detector::is_candidate_building(&record, today));

        let c = ProspectCandidate::from_building(&record);
        assert_eq!(c.fit_score, 95);
        assert_eq!(c.recommended_depts, vec!["정형외과", "재활의학과"]);
        assert_eq!(c.kind, ProspectKind::NewBuild);
        assert_eq!(c.source_key, "11680-100203");
    }

    #[test]
    fn test_vacancy_candidate_carries_snapshot() {
        let snapshot = HospitalSnapshot {
            ykiho: "YK1".to_string(),
            name: "사라진의원".to_string(),
            address: "서울 강남구 역삼로 10".to_string(),
            latitude: 37.5,
            longitude: 127.03,
        };
        let c = ProspectCandidate::from_closed_hospital(&snapshot);
        assert_eq!(c.kind, ProspectKind::Vacancy);
        assert_eq!(c.previous_clinic.as_deref(), Some("사라진의원"));
        assert_eq!(c.fit_score, 70);
        assert_eq!(c.latitude, 37.5);
        assert!(!c.recommended_depts.is_empty());
    }
}
