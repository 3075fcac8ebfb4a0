//! SurrealDB connection management.
//!
//! Two sessions are held against the same server: one pinned to the
//! master catalog database, one for tenant stores. Database selection
//! is per-session state in SurrealDB, so catalog queries must never
//! share a session with the store layer's `USE DATABASE` switching.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace holding the catalog and all tenant stores.
    pub namespace: String,
    /// Name of the master catalog database.
    pub master_db: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "provost".into(),
            master_db: "master".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Manages the two SurrealDB sessions.
#[derive(Clone)]
pub struct DbManager {
    catalog: Surreal<Client>,
    tenants: Surreal<Client>,
    master_db: String,
}

impl DbManager {
    /// Connect to SurrealDB using the provided configuration.
    ///
    /// Opens both sessions, authenticates each as root, and parks both
    /// on the master database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            master_db = %config.master_db,
            "Connecting to SurrealDB"
        );

        let catalog = Self::open_session(config).await?;
        let tenants = Self::open_session(config).await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self {
            catalog,
            tenants,
            master_db: config.master_db.clone(),
        })
    }

    async fn open_session(config: &DbConfig) -> Result<Surreal<Client>, surrealdb::Error> {
        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace).use_db(&config.master_db).await?;

        Ok(db)
    }

    /// The session pinned to the master catalog database.
    pub fn catalog_client(&self) -> Surreal<Client> {
        self.catalog.clone()
    }

    /// The session reserved for tenant store operations.
    pub fn tenant_client(&self) -> Surreal<Client> {
        self.tenants.clone()
    }

    /// Name of the master database the tenant session parks on.
    pub fn master_db(&self) -> &str {
        &self.master_db
    }
}
