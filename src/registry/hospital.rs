// hospital.rs
use crate::registry::models::{HospitalResponse, RegistryHospitalRecord};
use crate::registry::RegistryError;
use reqwest::blocking::Client;
use std::time::Duration;

const HOSPITAL_API_URL: &str =
    "http://apis.data.go.kr/B551182/hospInfoServicev2/getHospBasisList";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the HIRA hospital registry (심평원 병원정보서비스).
pub struct HospitalRegistryClient {
    client: Client,
    service_key: String,
}

impl HospitalRegistryClient {
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

    /// Fetch one page of hospitals for a region. Unlike the building client
    /// this surfaces errors: hospital absence is a destructive signal (it
    /// drives soft-deletes), so the caller must be able to tell a failed
    /// fetch apart from a genuinely empty page and treat the region's scan
    /// as incomplete rather than "confirmed empty".
    pub fn fetch_hospitals(
        &self,
        sido_cd: &str,
        sggu_cd: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<RegistryHospitalRecord>, RegistryError> {
        let page = page.to_string();
        let page_size = page_size.to_string();
        let mut params = vec![
            ("ServiceKey", self.service_key.as_str()),
            ("sidoCd", sido_cd),
            ("pageNo", page.as_str()),
            ("numOfRows", page_size.as_str()),
        ];
        if let Some(sggu) = sggu_cd {
            params.push(("sgguCd", sggu));
        }

        let resp = self
            .client
            .get(HOSPITAL_API_URL)
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

        let parsed: HospitalResponse =
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

        Ok(items.iter().map(RegistryHospitalRecord::from_wire).collect())
    }
}
