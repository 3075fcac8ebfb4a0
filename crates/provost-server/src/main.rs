//! PROVOST Server — application entry point.

use std::sync::Arc;

use provost_db::DbManager;
use provost_server::config::Config;
use provost_server::routes;
use provost_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("provost=info".parse().unwrap()),
        )
        .json()
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let manager = DbManager::connect(&config.db).await?;
    provost_db::run_migrations(&manager.catalog_client()).await?;

    let state = Arc::new(AppState::new(&manager, config.auth.clone(), config.env.clone()));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
