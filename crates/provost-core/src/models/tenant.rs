//! Tenant store metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single bootstrap record written into every tenant store.
///
/// The back-reference to the owning organization is for audit and
/// lookup only — ownership lives in the master catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantMetadata {
    pub organization_id: Uuid,
    pub organization_name: String,
    pub created_at: DateTime<Utc>,
}
