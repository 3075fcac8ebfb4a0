//! Database-specific error types and conversions.

use provost_core::error::ProvostError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("query failed: {0}")]
    Query(String),

    #[error("record not found: {entity} {key}")]
    NotFound { entity: String, key: String },
}

impl From<DbError> for ProvostError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, key } => ProvostError::NotFound { entity, key },
            other => ProvostError::Database(other.to_string()),
        }
    }
}
