//! In-memory repository implementations with failpoints, shared by
//! the orchestrator and migration test suites.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use provost_core::error::{ProvostError, ProvostResult};
use provost_core::models::admin::{Admin, NewAdmin};
use provost_core::models::organization::{NewOrganization, Organization};
use provost_core::models::tenant::TenantMetadata;
use provost_core::repository::{Catalog, Document, TenantStores};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemCatalog {
    orgs: Mutex<Vec<Organization>>,
    admins: Mutex<Vec<Admin>>,
    /// When set, the next `insert_admin` fails.
    pub fail_insert_admin: AtomicBool,
}

impl MemCatalog {
    pub fn org_count(&self) -> usize {
        self.orgs.lock().unwrap().len()
    }

    pub fn admin_count(&self) -> usize {
        self.admins.lock().unwrap().len()
    }
}

impl Catalog for MemCatalog {
    async fn insert_org(&self, input: NewOrganization) -> ProvostResult<Organization> {
        let mut orgs = self.orgs.lock().unwrap();
        // Unique-index stand-in: the authoritative conflict trigger.
        if orgs
            .iter()
            .any(|o| o.organization_name_lower == input.organization_name_lower)
        {
            return Err(ProvostError::Conflict {
                name: input.organization_name_lower,
            });
        }
        let org = Organization {
            id: Uuid::new_v4(),
            organization_name: input.organization_name,
            organization_name_lower: input.organization_name_lower,
            admin_email: input.admin_email,
            created_at: Utc::now(),
        };
        orgs.push(org.clone());
        Ok(org)
    }

    async fn find_org(&self, name_lower: &str) -> ProvostResult<Option<Organization>> {
        Ok(self
            .orgs
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.organization_name_lower == name_lower)
            .cloned())
    }

    async fn get_org(&self, name_lower: &str) -> ProvostResult<Organization> {
        self.find_org(name_lower)
            .await?
            .ok_or_else(|| ProvostError::NotFound {
                entity: "organization".into(),
                key: name_lower.to_string(),
            })
    }

    async fn rename_org(
        &self,
        id: Uuid,
        new_name: &str,
        new_name_lower: &str,
    ) -> ProvostResult<Organization> {
        let mut orgs = self.orgs.lock().unwrap();
        let org = orgs
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ProvostError::NotFound {
                entity: "organization".into(),
                key: id.to_string(),
            })?;
        org.organization_name = new_name.to_string();
        org.organization_name_lower = new_name_lower.to_string();
        Ok(org.clone())
    }

    async fn delete_org(&self, id: Uuid) -> ProvostResult<()> {
        self.orgs.lock().unwrap().retain(|o| o.id != id);
        Ok(())
    }

    async fn insert_admin(&self, input: NewAdmin) -> ProvostResult<Admin> {
        if self.fail_insert_admin.load(Ordering::SeqCst) {
            return Err(ProvostError::Database("injected admin insert failure".into()));
        }
        let admin = Admin {
            id: Uuid::new_v4(),
            email: input.email,
            hashed_password: input.hashed_password,
            organization_id: input.organization_id,
            created_at: Utc::now(),
        };
        self.admins.lock().unwrap().push(admin.clone());
        Ok(admin)
    }

    async fn find_admin(&self, email: &str) -> ProvostResult<Option<Admin>> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn delete_admins(&self, organization_id: Uuid) -> ProvostResult<()> {
        self.admins
            .lock()
            .unwrap()
            .retain(|a| a.organization_id != organization_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tenant stores
// ---------------------------------------------------------------------------

type Collection = BTreeMap<String, serde_json::Value>;
type Store = BTreeMap<String, Collection>;

#[derive(Default)]
pub struct MemStores {
    stores: Mutex<BTreeMap<String, Store>>,
    /// When set, the next `provision` fails after creating the store
    /// but before writing its metadata — the ambiguous partial state.
    pub fail_provision: AtomicBool,
    /// When set, `deprovision` fails.
    pub fail_deprovision: AtomicBool,
}

impl MemStores {
    pub fn store_names(&self) -> Vec<String> {
        self.stores.lock().unwrap().keys().cloned().collect()
    }

    /// Seed a raw document, bypassing provisioning.
    pub fn seed(&self, store: &str, collection: &str, id: &str, data: serde_json::Value) {
        self.stores
            .lock()
            .unwrap()
            .entry(store.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }
}

impl TenantStores for MemStores {
    async fn provision(&self, store: &str, metadata: TenantMetadata) -> ProvostResult<()> {
        let mut stores = self.stores.lock().unwrap();
        let entry = stores.entry(store.to_string()).or_default();
        if self.fail_provision.load(Ordering::SeqCst) {
            return Err(ProvostError::Database("injected provision failure".into()));
        }
        let value = serde_json::to_value(&metadata)
            .map_err(|e| ProvostError::Internal(e.to_string()))?;
        entry
            .entry("tenant_metadata".to_string())
            .or_default()
            .insert("main".to_string(), value);
        Ok(())
    }

    async fn deprovision(&self, store: &str) -> ProvostResult<()> {
        if self.fail_deprovision.load(Ordering::SeqCst) {
            return Err(ProvostError::Database("injected deprovision failure".into()));
        }
        self.stores.lock().unwrap().remove(store);
        Ok(())
    }

    async fn exists(&self, store: &str) -> ProvostResult<bool> {
        Ok(self.stores.lock().unwrap().contains_key(store))
    }

    async fn metadata(&self, store: &str) -> ProvostResult<Option<TenantMetadata>> {
        let stores = self.stores.lock().unwrap();
        let doc = stores
            .get(store)
            .and_then(|s| s.get("tenant_metadata"))
            .and_then(|c| c.get("main"));
        match doc {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ProvostError::Internal(e.to_string())),
            None => Ok(None),
        }
    }

    async fn collections(&self, store: &str) -> ProvostResult<Vec<String>> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .get(store)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn count(&self, store: &str, collection: &str) -> ProvostResult<u64> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .get(store)
            .and_then(|s| s.get(collection))
            .map(|c| c.len() as u64)
            .unwrap_or(0))
    }

    async fn list_ids(
        &self,
        store: &str,
        collection: &str,
        offset: u64,
        limit: u64,
    ) -> ProvostResult<Vec<String>> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .get(store)
            .and_then(|s| s.get(collection))
            .map(|c| {
                c.keys()
                    .skip(offset as usize)
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn contains(&self, store: &str, collection: &str, id: &str) -> ProvostResult<bool> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .get(store)
            .and_then(|s| s.get(collection))
            .is_some_and(|c| c.contains_key(id)))
    }

    async fn fetch(
        &self,
        store: &str,
        collection: &str,
        id: &str,
    ) -> ProvostResult<Option<Document>> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .get(store)
            .and_then(|s| s.get(collection))
            .and_then(|c| c.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn insert(
        &self,
        store: &str,
        collection: &str,
        documents: &[Document],
    ) -> ProvostResult<()> {
        let mut stores = self.stores.lock().unwrap();
        let coll = stores
            .entry(store.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default();
        for doc in documents {
            // The engine must have excluded existing ids already.
            if coll.contains_key(&doc.id) {
                return Err(ProvostError::Database(format!(
                    "document already exists: {collection}/{}",
                    doc.id
                )));
            }
            coll.insert(doc.id.clone(), doc.data.clone());
        }
        Ok(())
    }
}
