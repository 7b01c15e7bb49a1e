use std::sync::Arc;
use std::time::Duration;

use ecomvideo_events::{EventBus, EventLogger};
use ecomvideo_freepik::{FreepikClient, FreepikConfig};
use ecomvideo_pipeline::{PgVideoStore, PollingScheduler, SchedulerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecomvideo_worker=debug,ecomvideo_pipeline=debug,ecomvideo_freepik=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = ecomvideo_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    ecomvideo_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Provider ---
    let freepik_config = FreepikConfig::from_env();
    tracing::info!(base_url = %freepik_config.base_url, "Loaded Freepik configuration");
    let provider = FreepikClient::new(&freepik_config).expect("Failed to build Freepik client");

    // --- Event bus ---
    let cancel = CancellationToken::new();
    let event_bus = Arc::new(EventBus::default());
    let logger_handle = tokio::spawn(EventLogger::new(event_bus.subscribe()).run(cancel.clone()));

    // --- Scheduler ---
    let scheduler = PollingScheduler::new(
        Arc::new(PgVideoStore::new(pool)),
        Arc::new(provider),
        Arc::clone(&event_bus),
        SchedulerConfig::from_env(),
    );
    let scheduler_cancel = cancel.clone();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(scheduler_cancel).await;
    });

    shutdown_signal().await;
    cancel.cancel();

    let _ = tokio::time::timeout(Duration::from_secs(10), scheduler_handle).await;
    tracing::info!("Scheduler stopped");
    let _ = tokio::time::timeout(Duration::from_secs(5), logger_handle).await;

    tracing::info!("Worker shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
