//! PROVOST Database — SurrealDB connection management, master-catalog
//! schema, and repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbConfig`], [`DbManager`])
//! - Master-catalog schema and migrations ([`run_migrations`])
//! - [`SurrealCatalog`] — the master catalog of organizations and admins
//! - [`SurrealTenantStores`] — physical tenant databases, one per
//!   organization, addressed by sanitized name
//! - Error types ([`DbError`])

mod catalog;
mod connection;
mod error;
mod schema;
mod stores;

pub use catalog::SurrealCatalog;
pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use stores::SurrealTenantStores;
