//! Walk-in Queue Engine - Main Entry Point

mod logging;
mod settings;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use settings::Settings;
use walkin_api_rpc::{RpcServer, RpcServerConfig};
use walkin_core::application::{PositionReconciler, QueueService};
use walkin_core::port::time_provider::SystemTimeProvider;
use walkin_infra_sqlite::{create_pool, ping, run_migrations, SqliteCustomerRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load()?;

    // 2. Initialize logging
    let _log_guard = logging::init(settings.log_format, settings.log_dir.as_deref())?;

    info!("Walk-in Queue Engine v{} starting...", VERSION);

    // Location vocabulary is fixed from here on
    let locations = Arc::new(settings.location_set()?);
    info!(
        locations = ?locations.iter().collect::<Vec<_>>(),
        "Loaded location set"
    );

    // 3. Initialize database
    let db_path = settings.database_path();
    info!(db_path = %db_path, "Initializing database...");

    let pool = create_pool(&db_path)
        .await
        .context("DB pool creation failed")?;
    ping(&pool).await.context("Database is not reachable")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let customer_repo = Arc::new(SqliteCustomerRepository::new(pool.clone()));

    // 5. Repair any gap left in the pending queue
    info!("Running startup reconciliation...");
    match PositionReconciler::new(customer_repo.clone()).reconcile().await {
        Ok(moved) => info!(moved = moved, "Startup reconciliation completed"),
        Err(e) => error!(error = ?e, "Startup reconciliation failed"),
    }

    let service = Arc::new(QueueService::new(
        customer_repo.clone(),
        customer_repo,
        locations,
        time_provider,
    ));

    // 6. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: settings.rpc_host.clone(),
        port: settings.rpc_port,
    };
    let rpc_handle = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}
