// src/domain/scoring.rs

/// Fixed score assigned to vacancy prospects, where no building attributes
/// are available to score against.
pub const VACANCY_FIT_SCORE: i64 = 70;

/// Heuristic suitability score for a building, 0-100+.
///
/// Base 70, with independent cumulative bonuses; a 250㎡ building collects
/// both area bonuses. Thresholds are load-bearing for downstream alert
/// filters, so they must not drift.
pub fn score_building(total_area: f64, ground_floors: i64) -> i64 {
    let mut score = 70;
    if total_area >= 100.0 {
        score += 10;
    }
    if total_area >= 200.0 {
        score += 10;
    }
    if ground_floors >= 5 {
        score += 5;
    }
    score
}

/// Ranked medical specialties recommended for a floor area. The buckets are
/// half-open, mutually exclusive, and total over all inputs; unparseable
/// areas arrive here as 0.0 and land in the default bucket.
pub fn recommend_departments(total_area: f64) -> Vec<String> {
    let depts: &[&str] = if total_area >= 200.0 {
        &["정형외과", "재활의학과"]
    } else if total_area >= 100.0 {
        &["내과", "이비인후과", "소아과"]
    } else if total_area >= 50.0 {
        &["피부과", "안과"]
    } else {
        &["내과", "가정의학과"]
    };
    depts.iter().map(|d| d.to_string()).collect()
}
