//! Admin domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single admin owning one organization.
///
/// The email is the authorization subject: destructive operations on
/// an organization require a token whose `sub` equals `admin_email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    /// Opaque Argon2id PHC-format digest — never the plaintext.
    pub hashed_password: String,
    /// Owning organization.
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Catalog-level insert input (password already hashed).
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub hashed_password: String,
    pub organization_id: Uuid,
}
