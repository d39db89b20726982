// errors.rs
use std::fmt;

/// Errors originating from the pipeline driver or downstream layers (DB, config).
/// Fetch and delivery failures have their own local error types and are
/// swallowed at their batch boundaries; this enum is what crosses a stage
/// boundary up to the scheduler.
#[derive(Debug)]
pub enum PipelineError {
    Config(String),
    DbError(String),
    InternalError,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(msg) => write!(f, "Config error: {msg}"),
            PipelineError::DbError(msg) => write!(f, "Database Error: {msg}"),
            PipelineError::InternalError => write!(f, "Internal Pipeline Error"),
        }
    }
}

impl std::error::Error for PipelineError {}
