use crate::db::connection::Database;
use crate::domain::prospect::HospitalSnapshot;
use crate::errors::PipelineError;
use crate::registry::models::RegistryHospitalRecord;
use chrono::NaiveDateTime;
use rusqlite::params;
use std::collections::HashMap;

/// Insert-or-update on the registry id. On conflict the mutable registry
/// fields refresh and the row re-activates; created_at is preserved.
pub fn upsert_hospital(
    db: &Database,
    record: &RegistryHospitalRecord,
    now: NaiveDateTime,
) -> Result<(), PipelineError> {
    if record.ykiho.is_empty() {
        return Err(PipelineError::DbError(
            "upsert_hospital: record has no ykiho".into(),
        ));
    }

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO hospitals (
                ykiho, name, address, phone, latitude, longitude,
                specialty, established, doctor_count, clinic_type_cd,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?11)
            ON CONFLICT(ykiho) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                phone = excluded.phone,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                specialty = excluded.specialty,
                established = excluded.established,
                doctor_count = excluded.doctor_count,
                clinic_type_cd = excluded.clinic_type_cd,
                is_active = 1,
                updated_at = excluded.updated_at
            "#,
            params![
                record.ykiho,
                record.name,
                record.address,
                record.phone,
                record.latitude,
                record.longitude,
                record.specialty,
                record.established,
                record.doctor_count,
                record.clinic_type_cd,
                now,
            ],
        )
        .map_err(|e| PipelineError::DbError(e.to_string()))?;
        Ok(())
    })
}

/// All currently-active hospitals keyed by ykiho, for the closed-detection
/// diff.
pub fn active_hospital_map(
    db: &Database,
) -> Result<HashMap<String, HospitalSnapshot>, PipelineError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                SELECT ykiho, name, address, latitude, longitude
                FROM hospitals
                WHERE is_active = 1
                "#,
            )
            .map_err(|e| PipelineError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(HospitalSnapshot {
                    ykiho: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    latitude: row.get(3)?,
                    longitude: row.get(4)?,
                })
            })
            .map_err(|e| PipelineError::DbError(e.to_string()))?;

        let mut map = HashMap::new();
        for r in rows {
            let snapshot = r.map_err(|e| PipelineError::DbError(e.to_string()))?;
            map.insert(snapshot.ykiho.clone(), snapshot);
        }
        Ok(map)
    })
}

/// Soft-delete: the row stays for history, only the active flag flips.
pub fn mark_hospital_inactive(
    db: &Database,
    ykiho: &str,
    now: NaiveDateTime,
) -> Result<(), PipelineError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE hospitals SET is_active = 0, updated_at = ?2 WHERE ykiho = ?1",
            params![ykiho, now],
        )
        .map_err(|e| PipelineError::DbError(e.to_string()))?;
        Ok(())
    })
}
