//! Batch migration of a tenant store to a new name.
//!
//! Copies every collection of the source store into the target in
//! fixed-size batches. The copy is idempotent per document — a
//! document whose id already exists in the target is skipped — so an
//! interrupted run can simply be re-invoked. The source store is never
//! dropped; cutover and eventual deletion of the old store are
//! explicit operator steps.

use provost_core::error::{ProvostError, ProvostResult};
use provost_core::repository::TenantStores;
use provost_core::sanitize::tenant_store_name;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// Documents hashed per side for the sample integrity check.
const SAMPLE_SIZE: u64 = 5;

/// Per-collection outcome of a migration run.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub collection: String,
    pub source_count: u64,
    pub target_count: u64,
    pub copied: u64,
    pub skipped: u64,
    pub counts_match: bool,
    pub sample_match: bool,
}

impl CollectionReport {
    pub fn verified(&self) -> bool {
        self.counts_match && self.sample_match
    }
}

/// Outcome of a full migration run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub source_store: String,
    pub target_store: String,
    pub collections: Vec<CollectionReport>,
}

impl MigrationReport {
    /// True when every collection passed both the count and the
    /// sample-hash check.
    pub fn verified(&self) -> bool {
        self.collections.iter().all(CollectionReport::verified)
    }
}

/// Resumable batched copy between tenant stores.
pub struct MigrationEngine<S: TenantStores> {
    stores: S,
    batch_size: u64,
}

impl<S: TenantStores> MigrationEngine<S> {
    pub fn new(stores: S, batch_size: u64) -> Self {
        Self {
            stores,
            batch_size: batch_size.max(1),
        }
    }

    /// Copy every collection of `org_<old>` into `org_<new>` and
    /// verify the result.
    ///
    /// Names must already be sanitized (both the service and the CLI
    /// apply the same sanitization rule before calling). Identical
    /// source and target names yield an empty report — nothing to do.
    /// Any storage error halts the run; already-copied documents stay
    /// in place and a re-invocation resumes safely.
    pub async fn migrate(
        &self,
        old_sanitized: &str,
        new_sanitized: &str,
    ) -> ProvostResult<MigrationReport> {
        let source = tenant_store_name(old_sanitized);
        let target = tenant_store_name(new_sanitized);

        if source == target {
            info!(store = %source, "source and target resolve to the same store; nothing to do");
            return Ok(MigrationReport {
                source_store: source,
                target_store: target,
                collections: Vec::new(),
            });
        }

        if !self.stores.exists(&source).await? {
            return Err(ProvostError::NotFound {
                entity: "tenant store".into(),
                key: source,
            });
        }

        let mut collections = Vec::new();
        for collection in self.stores.collections(&source).await? {
            let report = self.copy_collection(&source, &target, &collection).await?;
            if !report.verified() {
                warn!(
                    collection = %collection,
                    source_count = report.source_count,
                    target_count = report.target_count,
                    counts_match = report.counts_match,
                    sample_match = report.sample_match,
                    "verification mismatch"
                );
            }
            collections.push(report);
        }

        Ok(MigrationReport {
            source_store: source,
            target_store: target,
            collections,
        })
    }

    async fn copy_collection(
        &self,
        source: &str,
        target: &str,
        collection: &str,
    ) -> ProvostResult<CollectionReport> {
        let source_count = self.stores.count(source, collection).await?;
        info!(collection = %collection, total = source_count, "copying collection");

        let mut copied = 0u64;
        let mut skipped = 0u64;
        let mut offset = 0u64;
        loop {
            let ids = self
                .stores
                .list_ids(source, collection, offset, self.batch_size)
                .await?;
            if ids.is_empty() {
                break;
            }
            offset += ids.len() as u64;

            let mut batch = Vec::with_capacity(ids.len());
            for id in &ids {
                if self.stores.contains(target, collection, id).await? {
                    skipped += 1;
                    continue;
                }
                let doc = self.stores.fetch(source, collection, id).await?.ok_or_else(|| {
                    ProvostError::Internal(format!(
                        "document {collection}/{id} disappeared from source during copy"
                    ))
                })?;
                batch.push(doc);
            }

            if !batch.is_empty() {
                self.stores.insert(target, collection, &batch).await?;
                copied += batch.len() as u64;
            }
            info!(collection = %collection, copied, skipped, "batch complete");
        }

        let target_count = self.stores.count(target, collection).await?;
        let counts_match = target_count == source_count;

        let source_hash = self.sample_hash(source, collection).await?;
        let target_hash = self.sample_hash(target, collection).await?;
        let sample_match = source_hash == target_hash;

        Ok(CollectionReport {
            collection: collection.to_string(),
            source_count,
            target_count,
            copied,
            skipped,
            counts_match,
            sample_match,
        })
    }

    /// SHA-256 over the first few id-ordered documents of a
    /// collection. A cheap integrity signal, not an equality proof.
    async fn sample_hash(&self, store: &str, collection: &str) -> ProvostResult<String> {
        let ids = self.stores.list_ids(store, collection, 0, SAMPLE_SIZE).await?;
        let mut hasher = Sha256::new();
        for id in &ids {
            if let Some(doc) = self.stores.fetch(store, collection, id).await? {
                hasher.update(doc.id.as_bytes());
                let body = serde_json::to_string(&doc.data)
                    .map_err(|e| ProvostError::Internal(format!("sample serialization: {e}")))?;
                hasher.update(body.as_bytes());
            }
        }
        Ok(hex::encode(hasher.finalize()))
    }
}
