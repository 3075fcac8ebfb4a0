//! Copy a tenant store to the name of a renamed organization.
//!
//! Renaming an organization only updates the catalog; its data stays
//! in the old physical store. This tool copies every collection into
//! the store matching the new name, in batches, skipping documents the
//! target already holds — interrupt it and run it again, it resumes.
//! The source store is never modified or dropped.

use clap::Parser;
use provost_core::sanitize::sanitize;
use provost_db::{DbConfig, DbManager, SurrealTenantStores};
use provost_tenancy::MigrationEngine;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "migrate",
    about = "Copy a tenant store to the name of a renamed organization"
)]
struct Args {
    /// SurrealDB WebSocket URL.
    #[arg(long, default_value = "127.0.0.1:8000")]
    url: String,

    /// Root username.
    #[arg(long, default_value = "root")]
    username: String,

    /// Root password.
    #[arg(long, default_value = "root")]
    password: String,

    /// Namespace holding the tenant stores.
    #[arg(long, default_value = "provost")]
    namespace: String,

    /// Master catalog database name.
    #[arg(long, default_value = "master")]
    master_db: String,

    /// Old organization name (display or sanitized form).
    #[arg(long = "old")]
    old_name: String,

    /// New organization name (display or sanitized form).
    #[arg(long = "new")]
    new_name: String,

    /// Documents copied per batch.
    #[arg(long, default_value_t = 100)]
    batch: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("provost=info".parse().unwrap()),
        )
        .init();

    if let Err(e) = run(args).await {
        eprintln!("migration failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let old_sanitized = sanitize(&args.old_name);
    let new_sanitized = sanitize(&args.new_name);
    if old_sanitized.is_empty() || new_sanitized.is_empty() {
        return Err("organization names contain no usable characters".into());
    }

    let manager = DbManager::connect(&DbConfig {
        url: args.url,
        namespace: args.namespace,
        master_db: args.master_db,
        username: args.username,
        password: args.password,
    })
    .await?;

    let stores = SurrealTenantStores::new(manager.tenant_client(), manager.master_db());
    let engine = MigrationEngine::new(stores, args.batch);
    let report = engine.migrate(&old_sanitized, &new_sanitized).await?;

    println!("{} -> {}", report.source_store, report.target_store);
    for c in &report.collections {
        println!(
            "  {}: copied {}, skipped {}, source {}, target {}, counts {}, sample {}",
            c.collection,
            c.copied,
            c.skipped,
            c.source_count,
            c.target_count,
            if c.counts_match { "ok" } else { "MISMATCH" },
            if c.sample_match { "ok" } else { "MISMATCH" },
        );
    }

    if !report.verified() {
        eprintln!("verification failed; source store untouched, re-run after investigating");
        std::process::exit(1);
    }

    println!("verification passed; source store untouched");
    println!("manual cutover steps:");
    println!("  1. rename the organization in the catalog (PUT /org/update), if not already done");
    println!(
        "  2. confirm the application serves tenant data from {}",
        report.target_store
    );
    println!(
        "  3. once satisfied, drop the old store by hand: REMOVE DATABASE `{}`;",
        report.source_store
    );

    Ok(())
}
