//! Error types for the PROVOST system.
//!
//! Each variant maps to a stable HTTP status at the boundary:
//! Validation 400/422, Conflict 409, Auth 401, Forbidden 403,
//! NotFound 404, Database/Internal 500. Messages never include
//! password hashes or token secrets.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvostError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("organization name already exists: {name}")]
    Conflict { name: String },

    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("not found: {entity} {key}")]
    NotFound { entity: String, key: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ProvostResult<T> = Result<T, ProvostError>;
