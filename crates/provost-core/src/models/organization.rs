//! Organization domain model.
//!
//! An organization is the master-catalog record for one tenant. Its
//! sanitized name is globally unique and addresses the tenant store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A master-catalog organization record.
///
/// Exactly one live organization maps to exactly one tenant store,
/// named `org_<organization_name_lower>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Display form — arbitrary case and spacing.
    pub organization_name: String,
    /// Sanitized form — the unique key and store-name component.
    pub organization_name_lower: String,
    /// Email of the single owning admin.
    pub admin_email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an organization together with its admin.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganization {
    pub organization_name: String,
    pub email: String,
    /// Raw password — hashed before storage, never persisted.
    pub password: String,
}

/// Catalog-level insert input (name already sanitized by the caller).
#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub organization_name: String,
    pub organization_name_lower: String,
    pub admin_email: String,
}
