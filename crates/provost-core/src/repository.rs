//! Repository trait definitions for data access abstraction.
//!
//! All operations are async. The master catalog and the tenant stores
//! are separate failure domains with no cross-store transactions —
//! the lifecycle orchestrator sequences them and compensates on
//! partial failure. Implementations are passed in as constructed
//! dependencies so tests can substitute in-memory instances.

use uuid::Uuid;

use crate::error::ProvostResult;
use crate::models::{
    admin::{Admin, NewAdmin},
    organization::{NewOrganization, Organization},
    tenant::TenantMetadata,
};

// ---------------------------------------------------------------------------
// Master catalog
// ---------------------------------------------------------------------------

/// CRUD over organization and admin records in the master catalog.
///
/// Operations are deliberately granular — the orchestrator inserts the
/// organization and its admin as separate steps so each has a defined
/// compensating delete. `insert_org` must surface a unique-constraint
/// violation on the sanitized name as [`ProvostError::Conflict`]; the
/// caller's pre-check via `find_org` exists only for a friendlier
/// error path and is not the enforcement mechanism.
pub trait Catalog: Send + Sync {
    fn insert_org(
        &self,
        input: NewOrganization,
    ) -> impl Future<Output = ProvostResult<Organization>> + Send;

    /// Look up an organization by its sanitized name.
    fn find_org(
        &self,
        name_lower: &str,
    ) -> impl Future<Output = ProvostResult<Option<Organization>>> + Send;

    /// Like `find_org` but absence is [`ProvostError::NotFound`].
    fn get_org(
        &self,
        name_lower: &str,
    ) -> impl Future<Output = ProvostResult<Organization>> + Send;

    /// Update both name fields in place. Catalog-only — tenant data
    /// keeps its old physical store.
    fn rename_org(
        &self,
        id: Uuid,
        new_name: &str,
        new_name_lower: &str,
    ) -> impl Future<Output = ProvostResult<Organization>> + Send;

    fn delete_org(&self, id: Uuid) -> impl Future<Output = ProvostResult<()>> + Send;

    fn insert_admin(&self, input: NewAdmin) -> impl Future<Output = ProvostResult<Admin>> + Send;

    fn find_admin(
        &self,
        email: &str,
    ) -> impl Future<Output = ProvostResult<Option<Admin>>> + Send;

    /// Remove every admin owned by the given organization.
    fn delete_admins(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = ProvostResult<()>> + Send;
}

impl<T: Catalog> Catalog for std::sync::Arc<T> {
    fn insert_org(
        &self,
        input: NewOrganization,
    ) -> impl Future<Output = ProvostResult<Organization>> + Send {
        (**self).insert_org(input)
    }

    fn find_org(
        &self,
        name_lower: &str,
    ) -> impl Future<Output = ProvostResult<Option<Organization>>> + Send {
        (**self).find_org(name_lower)
    }

    fn get_org(
        &self,
        name_lower: &str,
    ) -> impl Future<Output = ProvostResult<Organization>> + Send {
        (**self).get_org(name_lower)
    }

    fn rename_org(
        &self,
        id: Uuid,
        new_name: &str,
        new_name_lower: &str,
    ) -> impl Future<Output = ProvostResult<Organization>> + Send {
        (**self).rename_org(id, new_name, new_name_lower)
    }

    fn delete_org(&self, id: Uuid) -> impl Future<Output = ProvostResult<()>> + Send {
        (**self).delete_org(id)
    }

    fn insert_admin(&self, input: NewAdmin) -> impl Future<Output = ProvostResult<Admin>> + Send {
        (**self).insert_admin(input)
    }

    fn find_admin(
        &self,
        email: &str,
    ) -> impl Future<Output = ProvostResult<Option<Admin>>> + Send {
        (**self).find_admin(email)
    }

    fn delete_admins(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = ProvostResult<()>> + Send {
        (**self).delete_admins(organization_id)
    }
}

// ---------------------------------------------------------------------------
// Tenant stores
// ---------------------------------------------------------------------------

/// A single document inside a tenant store collection.
///
/// Identifiers are stable strings — the migration engine keys its
/// idempotent copy on them.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: serde_json::Value,
}

/// Physical tenant store management plus the document primitives the
/// migration engine copies with.
///
/// `provision` on an existing store overwrites its metadata (the store
/// name is its address, so duplicates cannot exist); `deprovision` of
/// a missing store is a no-op. The rest operate on named collections
/// inside one store; `list_ids` pages in stable id order so an
/// interrupted copy can resume from an offset.
pub trait TenantStores: Send + Sync {
    fn provision(
        &self,
        store: &str,
        metadata: TenantMetadata,
    ) -> impl Future<Output = ProvostResult<()>> + Send;

    /// Drop the store entirely. Irreversible.
    fn deprovision(&self, store: &str) -> impl Future<Output = ProvostResult<()>> + Send;

    fn exists(&self, store: &str) -> impl Future<Output = ProvostResult<bool>> + Send;

    /// Read the store's bootstrap metadata, if any.
    fn metadata(
        &self,
        store: &str,
    ) -> impl Future<Output = ProvostResult<Option<TenantMetadata>>> + Send;

    /// Names of all collections in the store.
    fn collections(&self, store: &str) -> impl Future<Output = ProvostResult<Vec<String>>> + Send;

    fn count(
        &self,
        store: &str,
        collection: &str,
    ) -> impl Future<Output = ProvostResult<u64>> + Send;

    /// Document ids, ordered by id, starting at `offset`.
    fn list_ids(
        &self,
        store: &str,
        collection: &str,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = ProvostResult<Vec<String>>> + Send;

    fn contains(
        &self,
        store: &str,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = ProvostResult<bool>> + Send;

    fn fetch(
        &self,
        store: &str,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = ProvostResult<Option<Document>>> + Send;

    /// Insert documents under their given ids. Callers must have
    /// excluded ids already present in the collection.
    fn insert(
        &self,
        store: &str,
        collection: &str,
        documents: &[Document],
    ) -> impl Future<Output = ProvostResult<()>> + Send;
}

impl<T: TenantStores> TenantStores for std::sync::Arc<T> {
    fn provision(
        &self,
        store: &str,
        metadata: TenantMetadata,
    ) -> impl Future<Output = ProvostResult<()>> + Send {
        (**self).provision(store, metadata)
    }

    fn deprovision(&self, store: &str) -> impl Future<Output = ProvostResult<()>> + Send {
        (**self).deprovision(store)
    }

    fn exists(&self, store: &str) -> impl Future<Output = ProvostResult<bool>> + Send {
        (**self).exists(store)
    }

    fn metadata(
        &self,
        store: &str,
    ) -> impl Future<Output = ProvostResult<Option<TenantMetadata>>> + Send {
        (**self).metadata(store)
    }

    fn collections(&self, store: &str) -> impl Future<Output = ProvostResult<Vec<String>>> + Send {
        (**self).collections(store)
    }

    fn count(
        &self,
        store: &str,
        collection: &str,
    ) -> impl Future<Output = ProvostResult<u64>> + Send {
        (**self).count(store, collection)
    }

    fn list_ids(
        &self,
        store: &str,
        collection: &str,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = ProvostResult<Vec<String>>> + Send {
        (**self).list_ids(store, collection, offset, limit)
    }

    fn contains(
        &self,
        store: &str,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = ProvostResult<bool>> + Send {
        (**self).contains(store, collection, id)
    }

    fn fetch(
        &self,
        store: &str,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = ProvostResult<Option<Document>>> + Send {
        (**self).fetch(store, collection, id)
    }

    fn insert(
        &self,
        store: &str,
        collection: &str,
        documents: &[Document],
    ) -> impl Future<Output = ProvostResult<()>> + Send {
        (**self).insert(store, collection, documents)
    }
}
