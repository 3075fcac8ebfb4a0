//! Bootstrap an admin record in the master catalog.
//!
//! Intended for first-time setup, before any organization exists. The
//! created admin has no owning organization (nil organization id) and
//! can authenticate against `/admin/login` right away. Skips cleanly
//! if the email is already registered.

use clap::Parser;
use provost_auth::password;
use provost_core::models::admin::NewAdmin;
use provost_core::repository::Catalog;
use provost_db::{DbConfig, DbManager, SurrealCatalog};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "create-admin", about = "Bootstrap an admin in the master catalog")]
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

    /// Namespace holding the master catalog.
    #[arg(long, default_value = "provost")]
    namespace: String,

    /// Master catalog database name.
    #[arg(long, default_value = "master")]
    master_db: String,

    /// Admin email.
    #[arg(long)]
    email: String,

    /// Admin password (plaintext; hashed before storage).
    #[arg(long)]
    admin_password: String,
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
        eprintln!("create-admin failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if !args.email.contains('@') {
        return Err("invalid email address".into());
    }
    if args.admin_password.len() < 8 {
        return Err("password must be at least 8 characters".into());
    }

    let manager = DbManager::connect(&DbConfig {
        url: args.url,
        namespace: args.namespace,
        master_db: args.master_db,
        username: args.username,
        password: args.password,
    })
    .await?;

    let client = manager.catalog_client();
    provost_db::run_migrations(&client).await?;
    let catalog = SurrealCatalog::new(client);

    if catalog.find_admin(&args.email).await?.is_some() {
        println!("admin {} already exists; nothing to do", args.email);
        return Ok(());
    }

    let hashed_password = password::hash_password(&args.admin_password)?;
    let admin = catalog
        .insert_admin(NewAdmin {
            email: args.email,
            hashed_password,
            organization_id: Uuid::nil(),
        })
        .await?;

    println!("created admin {} ({})", admin.email, admin.id);
    Ok(())
}
