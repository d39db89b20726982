use serde::Deserialize;

// Both registries answer with the standard data.go.kr envelope:
//
// <response>
//  ├── <header>
//  │    ├── <resultCode>   "00" on success
//  │    └── <resultMsg>
//  └── <body>
//       ├── <items>
//       │    └── <item>*   source-specific fields, any of which may be absent
//       ├── <pageNo>
//       ├── <numOfRows>
//       └── <totalCount>
//
// The wire structs below are all-Option; nothing past the `from_wire`
// boundary ever sees a missing field.

#[derive(Debug, Deserialize)]
pub struct WireHeader {
    #[serde(rename = "resultCode")]
    pub result_code: Option<String>,
    #[serde(rename = "resultMsg")]
    pub result_msg: Option<String>,
}

// ---------------- Hospital registry (HIRA) ----------------

#[derive(Debug, Deserialize)]
pub struct HospitalResponse {
    pub header: Option<WireHeader>,
    pub body: Option<HospitalBody>,
}

#[derive(Debug, Deserialize)]
pub struct HospitalBody {
    pub items: Option<HospitalItems>,
    #[serde(rename = "totalCount")]
    pub total_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HospitalItems {
    #[serde(default, rename = "item")]
    pub item: Vec<HospitalItem>,
}

/// Numeric-looking fields stay `String` on the wire: the registry emits empty
/// elements for unknown values, which would fail a typed parse outright.
#[derive(Debug, Deserialize)]
pub struct HospitalItem {
    pub ykiho: Option<String>,
    #[serde(rename = "yadmNm")]
    pub yadm_nm: Option<String>,
    pub addr: Option<String>,
    pub telno: Option<String>,
    #[serde(rename = "XPos")]
    pub x_pos: Option<String>,
    #[serde(rename = "YPos")]
    pub y_pos: Option<String>,
    #[serde(rename = "dgsbjtCdNm")]
    pub dgsbjt_cd_nm: Option<String>,
    #[serde(rename = "estbDd")]
    pub estb_dd: Option<String>,
    #[serde(rename = "drTotCnt")]
    pub dr_tot_cnt: Option<String>,
    #[serde(rename = "clCd")]
    pub cl_cd: Option<String>,
}

/// Flat, fully-defaulted hospital record, valid for one fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryHospitalRecord {
    pub ykiho: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub longitude: f64,
    pub latitude: f64,
    pub specialty: String,
    /// Establishment date as `YYYYMMDD`, empty when the registry omits it.
    pub established: String,
    pub doctor_count: i64,
    pub clinic_type_cd: String,
}

impl RegistryHospitalRecord {
    pub fn from_wire(item: &HospitalItem) -> Self {
        RegistryHospitalRecord {
            ykiho: text(&item.ykiho),
            name: text(&item.yadm_nm),
            address: text(&item.addr),
            phone: text(&item.telno),
            longitude: number(&item.x_pos),
            latitude: number(&item.y_pos),
            specialty: text(&item.dgsbjt_cd_nm),
            established: text(&item.estb_dd),
            doctor_count: integer(&item.dr_tot_cnt),
            clinic_type_cd: text(&item.cl_cd),
        }
    }
}

// ---------------- Building ledger (건축물대장) ----------------

#[derive(Debug, Deserialize)]
pub struct BuildingResponse {
    pub header: Option<WireHeader>,
    pub body: Option<BuildingBody>,
}

#[derive(Debug, Deserialize)]
pub struct BuildingBody {
    pub items: Option<BuildingItems>,
    #[serde(rename = "totalCount")]
    pub total_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuildingItems {
    #[serde(default, rename = "item")]
    pub item: Vec<BuildingItem>,
}

#[derive(Debug, Deserialize)]
pub struct BuildingItem {
    #[serde(rename = "mgmBldrgstPk")]
    pub mgm_bldrgst_pk: Option<String>,
    #[serde(rename = "bldNm")]
    pub bld_nm: Option<String>,
    #[serde(rename = "platPlc")]
    pub plat_plc: Option<String>,
    #[serde(rename = "newPlatPlc")]
    pub new_plat_plc: Option<String>,
    #[serde(rename = "mainPurpsCdNm")]
    pub main_purps_cd_nm: Option<String>,
    #[serde(rename = "etcPurps")]
    pub etc_purps: Option<String>,
    #[serde(rename = "totArea")]
    pub tot_area: Option<String>,
    #[serde(rename = "useAprDay")]
    pub use_apr_day: Option<String>,
    #[serde(rename = "grndFlrCnt")]
    pub grnd_flr_cnt: Option<String>,
    #[serde(rename = "ugrndFlrCnt")]
    pub ugrnd_flr_cnt: Option<String>,
}

/// Flat, fully-defaulted building record, valid for one fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryBuildingRecord {
    pub building_id: String,
    pub name: String,
    pub lot_address: String,
    pub road_address: String,
    pub main_purpose: String,
    pub etc_purpose: String,
    /// Total floor area in ㎡; unparseable wire values become 0.0.
    pub total_area: f64,
    /// Use-approval date as `YYYYMMDD`, empty when the ledger omits it.
    pub use_approved: String,
    pub ground_floors: i64,
    pub underground_floors: i64,
}

impl RegistryBuildingRecord {
    pub fn from_wire(item: &BuildingItem) -> Self {
        RegistryBuildingRecord {
            building_id: text(&item.mgm_bldrgst_pk),
            name: text(&item.bld_nm),
            lot_address: text(&item.plat_plc),
            road_address: text(&item.new_plat_plc),
            main_purpose: text(&item.main_purps_cd_nm),
            etc_purpose: text(&item.etc_purps),
            total_area: number(&item.tot_area),
            use_approved: text(&item.use_apr_day),
            ground_floors: integer(&item.grnd_flr_cnt),
            underground_floors: integer(&item.ugrnd_flr_cnt),
        }
    }
}

fn text(field: &Option<String>) -> String {
    field.as_deref().unwrap_or("").trim().to_string()
}

fn number(field: &Option<String>) -> f64 {
    field
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn integer(field: &Option<String>) -> i64 {
    field
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hospital_record_defaults_missing_fields() {
        let item = HospitalItem {
            ykiho: Some("YK0001".to_string()),
            yadm_nm: Some("서울의원".to_string()),
            addr: None,
            telno: None,
            x_pos: Some("127.0276".to_string()),
            y_pos: Some("not-a-number".to_string()),
            dgsbjt_cd_nm: None,
            estb_dd: Some("20260815".to_string()),
            dr_tot_cnt: None,
            cl_cd: Some("31".to_string()),
        };

        let record = RegistryHospitalRecord::from_wire(&item);
        assert_eq!(record.ykiho, "YK0001");
        assert_eq!(record.address, "");
        assert_eq!(record.phone, "");
        assert_eq!(record.longitude, 127.0276);
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.doctor_count, 0);
        assert_eq!(record.established, "20260815");
    }

    #[test]
    fn test_building_envelope_parses() {
        let xml = r#"
            <response>
              <header><resultCode>00</resultCode><resultMsg>NORMAL SERVICE.</resultMsg></header>
              <body>
                <items>
                  <item>
                    <mgmBldrgstPk>11680-100203</mgmBldrgstPk>
                    <bldNm>역삼타워</bldNm>
                    <platPlc>서울특별시 강남구 역삼동 123-45</platPlc>
                    <newPlatPlc>서울특별시 강남구 테헤란로 101</newPlatPlc>
                    <mainPurpsCdNm>제1종근린생활시설</mainPurpsCdNm>
                    <etcPurps></etcPurps>
                    <totArea>220.5</totArea>
                    <useAprDay>20260820</useAprDay>
                    <grndFlrCnt>6</grndFlrCnt>
                    <ugrndFlrCnt>2</ugrndFlrCnt>
                  </item>
                </items>
                <totalCount>1</totalCount>
              </body>
            </response>
        "#;

        let parsed: BuildingResponse = quick_xml::de::from_str(xml).expect("parse failed");
        let items = parsed.body.unwrap().items.unwrap().item;
        assert_eq!(items.len(), 1);

        let record = RegistryBuildingRecord::from_wire(&items[0]);
        assert_eq!(record.building_id, "11680-100203");
        assert_eq!(record.main_purpose, "제1종근린생활시설");
        assert_eq!(record.etc_purpose, "");
        assert_eq!(record.total_area, 220.5);
        assert_eq!(record.ground_floors, 6);
    }

    #[test]
    fn test_empty_items_parses_to_no_records() {
        let xml = r#"
            <response>
              <header><resultCode>00</resultCode></header>
              <body><items></items><totalCount>0</totalCount></body>
            </response>
        "#;
        let parsed: HospitalResponse = quick_xml::de::from_str(xml).expect("parse failed");
        assert!(parsed.body.unwrap().items.unwrap().item.is_empty());
    }
}
