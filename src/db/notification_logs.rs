use crate::db::connection::Database;
use crate::errors::PipelineError;
use chrono::NaiveDateTime;
use rusqlite::params;

/// Append one audit row per notified user. The pipeline never reads these
/// back; they exist for the ops/CRM side.
pub fn insert_notification_log(
    db: &Database,
    user_id: i64,
    kind: &str,
    prospect_count: usize,
    sent_at: NaiveDateTime,
) -> Result<(), PipelineError> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO notification_logs (user_id, kind, prospect_count, sent_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, kind, prospect_count as i64, sent_at],
        )
        .map_err(|e| PipelineError::DbError(e.to_string()))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::init_db;
    use crate::db::test_support::make_test_db;
    use chrono::NaiveDate;

    #[test]
    fn test_append_only_insert() {
        let db = make_test_db();
        init_db(&db).unwrap();

        let sent_at = NaiveDate::from_ymd_opt(2026, 8, 30)
            .unwrap()
            .and_hms_opt(2, 15, 0)
            .unwrap();
        insert_notification_log(&db, 7, "PROSPECT_ALERT", 3, sent_at).unwrap();
        insert_notification_log(&db, 7, "DAILY_DIGEST", 12, sent_at).unwrap();

        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM notification_logs WHERE user_id = 7",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| PipelineError::DbError(e.to_string()))
            })
            .unwrap();
        assert_eq!(count, 2);
    }
}
