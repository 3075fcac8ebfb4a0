//! Schema definitions and migration runner for the master catalog.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. The unique index on the sanitized
//! organization name is the authoritative reservation mechanism for
//! tenant store names; tenant stores themselves are schemaless and
//! created on demand.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_catalog",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — master catalog tables
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (master catalog)
-- =======================================================================
DEFINE TABLE organizations SCHEMAFULL;
DEFINE FIELD organization_name ON TABLE organizations TYPE string;
DEFINE FIELD organization_name_lower ON TABLE organizations TYPE string;
DEFINE FIELD admin_email ON TABLE organizations TYPE string;
DEFINE FIELD created_at ON TABLE organizations TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organizations_name_lower ON TABLE organizations \
    COLUMNS organization_name_lower UNIQUE;

-- =======================================================================
-- Admins (master catalog, one per organization)
-- =======================================================================
DEFINE TABLE admins SCHEMAFULL;
DEFINE FIELD email ON TABLE admins TYPE string;
DEFINE FIELD hashed_password ON TABLE admins TYPE string;
DEFINE FIELD organization_id ON TABLE admins TYPE string;
DEFINE FIELD created_at ON TABLE admins TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_admins_email ON TABLE admins COLUMNS email UNIQUE;
DEFINE INDEX idx_admins_org ON TABLE admins COLUMNS organization_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending catalog migrations against the given client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Query(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Query(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query("CREATE _migration SET version = $version, name = $name")
                .bind(("version", migration.version))
                .bind(("name", migration.name))
                .await?
                .check()
                .map_err(|e| {
                    DbError::Query(format!(
                        "Failed to record migration v{}: {}",
                        migration.version, e,
                    ))
                })?;

            info!(version = migration.version, "Migration applied successfully");
        }
    }

    Ok(())
}

/// Returns the raw catalog DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that bypass
/// the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
