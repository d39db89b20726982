use rusqlite::Connection;
use std::cell::RefCell;

use crate::errors::PipelineError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot.
thread_local! {
    static DB_CONN: RefCell<Option<Connection>> = RefCell::new(None);
}

#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Provides a mutable connection to the closure, opening one lazily per
    /// thread on first use.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, PipelineError>
    where
        F: FnOnce(&mut Connection) -> Result<T, PipelineError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| PipelineError::DbError(format!("Open DB failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|_| PipelineError::InternalError)?;
        inner_result
    }
}

/// Apply the embedded schema (idempotent, everything is IF NOT EXISTS).
pub fn init_db(db: &Database) -> Result<(), PipelineError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| PipelineError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })
}
