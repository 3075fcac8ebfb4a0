//! PROVOST Core — domain models, error taxonomy, name sanitization,
//! and repository traits shared across all crates.

pub mod error;
pub mod models;
pub mod repository;
pub mod sanitize;

pub use error::{ProvostError, ProvostResult};
