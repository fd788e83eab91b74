use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("Run already exists: {0}")]
    DuplicateRun(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid transition for run {run_id}: {from} -> {to}")]
    InvalidTransition {
        run_id: String,
        from: String,
        to: String,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MapperError {
    /// Fatal errors abort a run before any write happens.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MapperError::Precondition(_) | MapperError::DuplicateRun(_) | MapperError::Config(_)
        )
    }
}

impl From<sqlx::Error> for MapperError {
    fn from(error: sqlx::Error) -> Self {
        MapperError::Database(error.to_string())
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(error: serde_json::Error) -> Self {
        MapperError::Internal(format!("JSON: {error}"))
    }
}

impl From<std::io::Error> for MapperError {
    fn from(error: std::io::Error) -> Self {
        MapperError::Io(error.to_string())
    }
}

impl Serialize for MapperError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type MapperResult<T> = Result<T, MapperError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
