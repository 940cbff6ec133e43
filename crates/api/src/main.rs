use std::net::SocketAddr;
use std::time::Duration;

use lungrisk_api::app::build_router;
use lungrisk_api::background::lock_sweep;
use lungrisk_api::config::ServerConfig;
use lungrisk_api::state::AppState;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "lungrisk_api=debug,lungrisk_db=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    tracing::info!(
        %addr,
        lock_scope = config.locks.scope.as_str(),
        lock_lease_secs = config.locks.lease_secs,
        sweep_interval_secs = config.locks.sweep_interval_secs,
        "Configuration loaded",
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = lungrisk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    lungrisk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    lungrisk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    let cancel = CancellationToken::new();
    let sweeper = match config.locks.sweep_interval_secs {
        0 => {
            tracing::info!("Lock sweeper disabled");
            None
        }
        secs => Some(tokio::spawn(lock_sweep::run(
            pool.clone(),
            Duration::from_secs(secs),
            cancel.clone(),
        ))),
    };

    let app = build_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    cancel.cancel();
    if let Some(handle) = sweeper {
        if tokio::time::timeout(Duration::from_secs(5), handle).await.is_err() {
            tracing::warn!("Lock sweeper did not stop within 5s");
        }
    }
    tracing::info!("Shutdown complete");
}

/// Resolves on SIGINT, or SIGTERM on unix.
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
        () = ctrl_c => tracing::info!("SIGINT received, draining"),
        () = terminate => tracing::info!("SIGTERM received, draining"),
    }
}
