// building.rs
use crate::registry::models::{BuildingResponse, RegistryBuildingRecord};
use crate::registry::RegistryError;
use reqwest::blocking::Client;
use std::time::Duration;

const BUILDING_API_URL: &str =
    "http://apis.data.go.kr/1613000/BldRgstHubService/getBrTitleInfo";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the MOLIT building-ledger title-section API (건축물대장 표제부).
pub struct BuildingRegistryClient {
    client: Client,
    service_key: String,
}

impl BuildingRegistryClient {
    pub fn new(service_key: impl Into<String>) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        Ok(Self {
            client,
            service_key: service_key.into(),
        })
    }

    /// Fetch one page of building-ledger entries for a district. Same
    /// fail-soft contract as the hospital client: errors log and return an
    /// empty page.
    pub fn fetch_buildings(
        &self,
        sigungu_cd: &str,
        bjdong_cd: &str,
        page: usize,
        page_size: usize,
    ) -> Vec<RegistryBuildingRecord> {
        match self.try_fetch_buildings(sigungu_cd, bjdong_cd, page, page_size) {
            Ok(records) => records,
            Err(e) => {
                eprintln!("⚠️ Building fetch failed (sigungu={sigungu_cd} page={page}): {e}");
                Vec::new()
            }
        }
    }

    fn try_fetch_buildings(
        &self,
        sigungu_cd: &str,
        bjdong_cd: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<RegistryBuildingRecord>, RegistryError> {
        let page = page.to_string();
        let page_size = page_size.to_string();
        let params = [
            ("serviceKey", self.service_key.as_str()),
            ("sigunguCd", sigungu_cd),
            ("bjdongCd", bjdong_cd),
            ("pageNo", page.as_str()),
            ("numOfRows", page_size.as_str()),
        ];

        let resp = self
            .client
            .get(BUILDING_API_URL)
            .query(&params)
            .send()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(RegistryError::Http(format!("HTTP {status}: {text}")));
        }

        let parsed: BuildingResponse =
            quick_xml::de::from_str(&text).map_err(|e| RegistryError::XmlParse(e.to_string()))?;

        if let Some(header) = &parsed.header {
            let code = header.result_code.as_deref().unwrap_or("");
            if !code.is_empty() && code != "00" {
                return Err(RegistryError::Api(format!(
                    "resultCode={code} msg={}",
                    header.result_msg.as_deref().unwrap_or("")
                )));
            }
        }

        let items = parsed
            .body
            .and_then(|b| b.items)
            .map(|i| i.item)
            .unwrap_or_default();

        Ok(items.iter().map(RegistryBuildingRecord::from_wire).collect())
    }
}
