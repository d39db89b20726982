use crate::db::connection::Database;
use crate::domain::prospect::{ProspectCandidate, ProspectKind, StoredProspect};
use crate::errors::PipelineError;
use chrono::NaiveDateTime;
use rusqlite::params;

/// Insert-or-update on the natural source key. Re-detection refreshes the
/// score and mutable attributes but preserves detected_at, created_at and the
/// manually-curated lifecycle status.
pub fn upsert_prospect(
    db: &Database,
    candidate: &ProspectCandidate,
    now: NaiveDateTime,
) -> Result<(), PipelineError> {
    if candidate.source_key.is_empty() {
        return Err(PipelineError::DbError(
            "upsert_prospect: candidate has no source key".into(),
        ));
    }

    let depts = candidate.recommended_depts.join(",");

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO prospect_locations (
                source_key, address, latitude, longitude, kind,
                prior_use, floor_area, fit_score, recommended_depts,
                status, previous_clinic,
                detected_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'NEW', ?10, ?11, ?11, ?11)
            ON CONFLICT(source_key) DO UPDATE SET
                address = excluded.address,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                prior_use = excluded.prior_use,
                floor_area = excluded.floor_area,
                fit_score = excluded.fit_score,
                recommended_depts = excluded.recommended_depts,
                previous_clinic = excluded.previous_clinic,
                updated_at = excluded.updated_at
            "#,
            params![
                candidate.source_key,
                candidate.address,
                candidate.latitude,
                candidate.longitude,
                candidate.kind.as_str(),
                candidate.prior_use,
                candidate.floor_area,
                candidate.fit_score,
                depts,
                candidate.previous_clinic,
                now,
            ],
        )
        .map_err(|e| PipelineError::DbError(e.to_string()))?;
        Ok(())
    })
}

/// Prospects still in status NEW created at or after `since`, best first,
/// capped. Feeds both the hourly alert pass (1h window) and the daily digest
/// (24h window).
pub fn recent_new_prospects(
    db: &Database,
    since: NaiveDateTime,
    limit: usize,
) -> Result<Vec<StoredProspect>, PipelineError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, source_key, address, kind, fit_score,
                       recommended_depts, previous_clinic, created_at
                FROM prospect_locations
                WHERE status = 'NEW' AND created_at >= ?1
                ORDER BY fit_score DESC, created_at DESC
                LIMIT ?2
                "#,
            )
            .map_err(|e| PipelineError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map(params![since, limit as i64], |row| {
                let kind: String = row.get(3)?;
                let depts: String = row.get(5)?;
                Ok(StoredProspect {
                    id: row.get(0)?,
                    source_key: row.get(1)?,
                    address: row.get(2)?,
                    kind: ProspectKind::parse(&kind).unwrap_or(ProspectKind::NewBuild),
                    fit_score: row.get(4)?,
                    recommended_depts: depts
                        .split(',')
                        .filter(|d| !d.is_empty())
                        .map(str::to_string)
                        .collect(),
                    previous_clinic: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })
            .map_err(|e| PipelineError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| PipelineError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}
