//! PROVOST Tenancy — lifecycle orchestration across the master
//! catalog and tenant stores, and the batch migration engine.
//!
//! The two stores are independent failure domains with no shared
//! transaction; every multi-step operation here carries explicit
//! compensation for partial failure.

pub mod lifecycle;
pub mod migrate;

pub use lifecycle::Lifecycle;
pub use migrate::{CollectionReport, MigrationEngine, MigrationReport};
