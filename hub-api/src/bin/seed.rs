//! Inserts the standard roles into the hub database.
//!
//! Existing roles are left untouched, so running it twice is harmless.

use anyhow::{Context, Result};
use clap::Parser;
use hub_logging::{init_subscriber, LogConfig};
use hub_service::{
    db::{create_pool, run_migrations},
    PermissionTable, RoleService,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hub-seed", about = "Seed the standard workspace roles", version)]
struct Args {
    /// SQLite database file (defaults to HUB_API_DB_PATH or ~/.hub/api/hub.db)
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_subscriber(&LogConfig::from_env(), &["hub_service=info"]);

    let db_path = args.db_path.unwrap_or_else(hub_api::config::default_db_path);
    info!("Seeding roles into {}", db_path.display());

    let pool = create_pool(&db_path)
        .await
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    run_migrations(&pool).await?;

    let report = RoleService::new(pool.clone())
        .seed_roles(&PermissionTable::standard())
        .await?;

    info!(
        "Seeding completed: {} added, {} skipped",
        report.added.len(),
        report.skipped.len()
    );

    pool.close().await;
    Ok(())
}
