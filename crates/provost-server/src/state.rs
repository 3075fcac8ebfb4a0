//! Shared application state.

use provost_auth::config::AuthConfig;
use provost_db::{DbManager, SurrealCatalog, SurrealTenantStores};
use provost_tenancy::Lifecycle;
use surrealdb::engine::remote::ws::Client;

pub type ServerLifecycle = Lifecycle<SurrealCatalog<Client>, SurrealTenantStores<Client>>;

pub struct AppState {
    pub lifecycle: ServerLifecycle,
    pub env: String,
}

impl AppState {
    pub fn new(manager: &DbManager, auth: AuthConfig, env: String) -> Self {
        let catalog = SurrealCatalog::new(manager.catalog_client());
        let stores = SurrealTenantStores::new(manager.tenant_client(), manager.master_db());
        Self {
            lifecycle: Lifecycle::new(catalog, stores, auth),
            env,
        }
    }
}
