//! SurrealDB implementation of [`TenantStores`].
//!
//! Each tenant store is a database inside the shared namespace.
//! SurrealDB scopes database selection to the session, so every
//! operation takes the session lock, switches to the target store, and
//! runs its queries while holding the lock. The session is dedicated
//! to this store layer; catalog queries run on their own session.

use chrono::{DateTime, Utc};
use provost_core::error::{ProvostError, ProvostResult};
use provost_core::models::tenant::TenantMetadata;
use provost_core::repository::{Document, TenantStores};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;

/// Table holding the single bootstrap record of every tenant store.
const METADATA_TABLE: &str = "tenant_metadata";
/// Fixed record id of the bootstrap record.
const METADATA_ID: &str = "main";

#[derive(Debug, SurrealValue)]
struct TenantMetadataRow {
    organization_id: String,
    organization_name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the tenant store layer.
pub struct SurrealTenantStores<C: Connection> {
    db: Surreal<C>,
    /// Database the session parks on for namespace-level statements.
    home_db: String,
    /// Serializes database switching on the shared session.
    session: Mutex<()>,
}

impl<C: Connection> SurrealTenantStores<C> {
    pub fn new(db: Surreal<C>, home_db: impl Into<String>) -> Self {
        Self {
            db,
            home_db: home_db.into(),
            session: Mutex::new(()),
        }
    }

    /// Store names reach SQL as identifiers, not bind parameters, so
    /// only sanitized names are accepted. Anything else never left the
    /// sanitizer and indicates a caller bug.
    fn checked_name(store: &str) -> Result<&str, ProvostError> {
        let valid = !store.is_empty()
            && store
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if valid {
            Ok(store)
        } else {
            Err(ProvostError::Validation {
                message: format!("invalid tenant store name: {store}"),
            })
        }
    }

    /// List the databases currently defined in the namespace.
    async fn namespace_databases(&self) -> Result<Vec<String>, DbError> {
        let mut result = self.db.query("INFO FOR NS").await?;
        let info: Option<serde_json::Value> = result.take(0)?;
        Ok(info
            .as_ref()
            .and_then(|v| v.get("databases"))
            .and_then(|v| v.as_object())
            .map(|dbs| dbs.keys().cloned().collect())
            .unwrap_or_default())
    }
}

impl<C: Connection> TenantStores for SurrealTenantStores<C> {
    async fn provision(&self, store: &str, metadata: TenantMetadata) -> ProvostResult<()> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db
            .query(format!("DEFINE DATABASE IF NOT EXISTS `{store}`"))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        self.db.use_db(store).await.map_err(DbError::from)?;
        self.db
            .query(format!(
                "UPSERT {METADATA_TABLE}:{METADATA_ID} SET \
                 organization_id = $organization_id, \
                 organization_name = $organization_name, \
                 created_at = $created_at"
            ))
            .bind(("organization_id", metadata.organization_id.to_string()))
            .bind(("organization_name", metadata.organization_name))
            .bind(("created_at", metadata.created_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        info!(store = %store, "tenant store provisioned");
        Ok(())
    }

    async fn deprovision(&self, store: &str) -> ProvostResult<()> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        // Park off the target first; a session cannot sit on the
        // database it is removing.
        self.db.use_db(&self.home_db).await.map_err(DbError::from)?;
        self.db
            .query(format!("REMOVE DATABASE IF EXISTS `{store}`"))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        info!(store = %store, "tenant store dropped");
        Ok(())
    }

    async fn exists(&self, store: &str) -> ProvostResult<bool> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;
        Ok(self.namespace_databases().await?.contains(&store.to_string()))
    }

    async fn metadata(&self, store: &str) -> ProvostResult<Option<TenantMetadata>> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db.use_db(store).await.map_err(DbError::from)?;
        let mut result = self
            .db
            .query(format!(
                "SELECT * OMIT id FROM {METADATA_TABLE}:{METADATA_ID}"
            ))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantMetadataRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let organization_id = Uuid::parse_str(&row.organization_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Some(TenantMetadata {
            organization_id,
            organization_name: row.organization_name,
            created_at: row.created_at,
        }))
    }

    async fn collections(&self, store: &str) -> ProvostResult<Vec<String>> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db.use_db(store).await.map_err(DbError::from)?;
        let mut result = self.db.query("INFO FOR DB").await.map_err(DbError::from)?;
        let info: Option<serde_json::Value> = result.take(0).map_err(DbError::from)?;

        let mut tables: Vec<String> = info
            .as_ref()
            .and_then(|v| v.get("tables"))
            .and_then(|v| v.as_object())
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        tables.sort();
        Ok(tables)
    }

    async fn count(&self, store: &str, collection: &str) -> ProvostResult<u64> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db.use_db(store).await.map_err(DbError::from)?;
        let mut result = self
            .db
            .query("SELECT count() AS total FROM type::table($tb) GROUP ALL")
            .bind(("tb", collection.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn list_ids(
        &self,
        store: &str,
        collection: &str,
        offset: u64,
        limit: u64,
    ) -> ProvostResult<Vec<String>> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db.use_db(store).await.map_err(DbError::from)?;
        let mut result = self
            .db
            .query(
                "SELECT VALUE <string> meta::id(id) FROM type::table($tb) \
                 ORDER BY id ASC LIMIT $limit START $offset",
            )
            .bind(("tb", collection.to_string()))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await
            .map_err(DbError::from)?;

        let ids: Vec<String> = result.take(0).map_err(DbError::from)?;
        Ok(ids)
    }

    async fn contains(&self, store: &str, collection: &str, id: &str) -> ProvostResult<bool> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db.use_db(store).await.map_err(DbError::from)?;
        let mut result = self
            .db
            .query("SELECT VALUE <string> meta::id(id) FROM type::record($tb, $id)")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<String> = result.take(0).map_err(DbError::from)?;
        Ok(!rows.is_empty())
    }

    async fn fetch(
        &self,
        store: &str,
        collection: &str,
        id: &str,
    ) -> ProvostResult<Option<Document>> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db.use_db(store).await.map_err(DbError::from)?;
        let mut result = self
            .db
            .query("SELECT * OMIT id FROM type::record($tb, $id)")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<serde_json::Value> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|data| Document {
            id: id.to_string(),
            data,
        }))
    }

    async fn insert(
        &self,
        store: &str,
        collection: &str,
        documents: &[Document],
    ) -> ProvostResult<()> {
        let store = Self::checked_name(store)?;
        let _guard = self.session.lock().await;

        self.db.use_db(store).await.map_err(DbError::from)?;
        for doc in documents {
            self.db
                .query("CREATE type::record($tb, $id) CONTENT $data")
                .bind(("tb", collection.to_string()))
                .bind(("id", doc.id.clone()))
                .bind(("data", doc.data.clone()))
                .await
                .map_err(DbError::from)?
                .check()
                .map_err(|e| DbError::Query(e.to_string()))?;
        }
        Ok(())
    }
}
