use crate::db::connection::Database;
use crate::domain::alerts::Subscription;
use crate::errors::PipelineError;

/// Active subscriptions with at least one delivery channel on, joined with
/// the owning user's contact info.
pub fn active_subscriptions(db: &Database) -> Result<Vec<Subscription>, PipelineError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                SELECT
                    a.id,             -- 0
                    a.user_id,        -- 1
                    u.name,           -- 2
                    u.email,          -- 3
                    a.region_filter,  -- 4
                    a.type_filter,    -- 5
                    a.min_score,      -- 6
                    a.email_enabled,  -- 7
                    a.push_enabled    -- 8
                FROM user_alerts a
                JOIN users u ON u.id = a.user_id
                WHERE a.is_active = 1
                  AND (a.email_enabled = 1 OR a.push_enabled = 1)
                "#,
            )
            .map_err(|e| PipelineError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Subscription {
                    alert_id: row.get(0)?,
                    user_id: row.get(1)?,
                    user_name: row.get(2)?,
                    email: row.get(3)?,
                    region_filter: row.get(4)?,
                    type_filter: row.get(5)?,
                    min_score: row.get(6)?,
                    email_enabled: row.get::<_, i64>(7)? != 0,
                    push_enabled: row.get::<_, i64>(8)? != 0,
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
