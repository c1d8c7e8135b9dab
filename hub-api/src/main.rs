use anyhow::Result;
use hub_api::{create_app, Config};
use hub_logging::{init_subscriber, LogConfig};
use hub_service::{
    db::{backup_database, create_pool, run_migrations},
    PermissionTable, RoleService,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_subscriber(
        &LogConfig::from_env(),
        &["hub_api=debug", "hub_service=debug", "tower_http=debug"],
    );

    info!("Starting hub-api service...");

    let config = Config::from_env();
    info!(
        "Configuration loaded: bind_addr={}, db_path={}, max_page_size={}",
        config.bind_addr,
        config.db_path.display(),
        config.max_page_size
    );

    let db_path = &config.db_path;

    // Backup before migrations
    if db_path.exists() {
        let backup_path = backup_database(db_path)?;
        info!("Database backed up to: {}", backup_path.display());
    }

    let pool = create_pool(db_path).await?;
    info!("Running database migrations...");
    run_migrations(&pool).await?;
    info!("Migrations complete");

    let permissions = Arc::new(PermissionTable::standard());
    let report = RoleService::new(pool.clone())
        .seed_roles(&permissions)
        .await?;
    info!(
        "Roles seeded: {} added, {} already present",
        report.added.len(),
        report.skipped.len()
    );

    let app = create_app(pool, permissions, config.max_page_size).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
