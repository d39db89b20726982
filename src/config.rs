// src/config.rs

use std::env;
use std::time::Duration;

/// A (sido, sggu) region pair for the hospital registry.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalRegion {
    pub sido_cd: String,
    pub sggu_cd: String,
}

/// A (sigungu, bjdong) district pair for the building ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingDistrict {
    pub sigungu_cd: String,
    pub bjdong_cd: String,
}

/// Process configuration, environment-variable driven with local-dev defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// data.go.kr service key for the hospital registry.
    pub hospital_api_key: String,
    /// data.go.kr service key for the building ledger.
    pub building_api_key: String,
    /// Base URL of the collaborator notification API.
    pub notify_api_base: String,
    pub notify_api_key: String,
    /// SQLite database path.
    pub db_path: String,
    /// Regions scanned for hospitals, `sido:sggu` pairs.
    pub hospital_regions: Vec<HospitalRegion>,
    /// Districts scanned for buildings, `sigungu:bjdong` pairs.
    pub building_districts: Vec<BuildingDistrict>,
    /// Delay between consecutive registry calls (rate-limit courtesy).
    pub fetch_delay: Duration,
    pub page_size: usize,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        // Defaults cover Gangnam-gu for local development so the pipeline can
        // run end-to-end with only the service keys set.
        let regions = env_or("HOSPITAL_REGIONS", "110000:110019");
        let districts = env_or("BUILDING_DISTRICTS", "11680:10300");

        Config {
            hospital_api_key: env_or("HOSPITAL_API_KEY", ""),
            building_api_key: env_or("BUILDING_API_KEY", ""),
            notify_api_base: env_or("NOTIFY_API_BASE", "http://localhost:4000"),
            notify_api_key: env_or("NOTIFY_API_KEY", ""),
            db_path: env_or("DATABASE_PATH", "prospects.sqlite3"),
            hospital_regions: parse_pairs(&regions)
                .into_iter()
                .map(|(a, b)| HospitalRegion {
                    sido_cd: a,
                    sggu_cd: b,
                })
                .collect(),
            building_districts: parse_pairs(&districts)
                .into_iter()
                .map(|(a, b)| BuildingDistrict {
                    sigungu_cd: a,
                    bjdong_cd: b,
                })
                .collect(),
            fetch_delay: Duration::from_millis(
                env_or("FETCH_DELAY_MS", "500").parse().unwrap_or(500),
            ),
            page_size: env_or("FETCH_PAGE_SIZE", "100").parse().unwrap_or(100),
        }
    }
}

/// Parse `"11680:10300,11650:10800"` into code pairs, skipping malformed entries.
fn parse_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|entry| {
            let mut parts = entry.trim().splitn(2, ':');
            let a = parts.next()?.trim();
            let b = parts.next()?.trim();
            if a.is_empty() || b.is_empty() {
                return None;
            }
            Some((a.to_string(), b.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let pairs = parse_pairs("11680:10300, 11650:10800");
        assert_eq!(
            pairs,
            vec![
                ("11680".to_string(), "10300".to_string()),
                ("11650".to_string(), "10800".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_pairs_skips_malformed() {
        let pairs = parse_pairs("11680:10300,garbage,:,11650:");
        assert_eq!(pairs, vec![("11680".to_string(), "10300".to_string())]);
    }
}
