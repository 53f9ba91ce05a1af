//! Retail service entry point.

use retail_core::observability::init_tracing;
use retail_service::config::Config;
use retail_service::console::{self, Console};
use retail_service::services::Database;
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        currency = %config.currency,
        "Starting retail-service"
    );

    // Connection failure is the one fatal error: abort before any menu.
    let db = Database::new(config.database.url.expose_secret())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            std::io::Error::other(format!("Database error: {}", e))
        })?;

    db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        std::io::Error::other(format!("Database error: {}", e))
    })?;

    db.run_migrations().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to run migrations");
        std::io::Error::other(format!("Database error: {}", e))
    })?;

    let mut console = Console::stdio();
    if let Err(e) = console::run(&mut console, &db, &config).await {
        tracing::error!(error = %e, "Console session ended with error");
        return Err(std::io::Error::other(e.to_string()));
    }

    // Dropping the pool closes the connection.
    db.pool().close().await;
    tracing::info!("Service shutdown complete");
    Ok(())
}
