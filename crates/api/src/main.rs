use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pointcam_api::background::status_sweep;
use pointcam_api::config::ServerConfig;
use pointcam_api::monitor::HttpStatusProbe;
use pointcam_api::router::build_app_router;
use pointcam_api::state::AppState;
use pointcam_mediaserver::InventoryClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pointcam_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        media_server = %config.media.host,
        video_enabled = config.video_enabled,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = pointcam_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    pointcam_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    pointcam_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let inventory =
        InventoryClient::from_config(&config.media).expect("Failed to build inventory client");
    tracing::info!(api_url = inventory.api_url(), "Media server inventory client created");

    let probe: Arc<dyn pointcam_core::monitor::StatusProbe> =
        Arc::new(HttpStatusProbe::new().expect("Failed to build status probe client"));

    // --- Background status sweep ---
    let sweep_cancel = CancellationToken::new();
    let sweep_handle = (config.status_sweep_interval_secs > 0).then(|| {
        tokio::spawn(status_sweep::run(
            pool.clone(),
            Arc::clone(&probe),
            Duration::from_secs(config.status_sweep_interval_secs),
            sweep_cancel.clone(),
        ))
    });

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        inventory: Arc::new(inventory),
        probe,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    if let Some(handle) = sweep_handle {
        let _ = tokio::time::timeout(Duration::from_secs(30), handle).await;
        tracing::info!("Status sweep job stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
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
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
