//! RateIt server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{Router, extract::DefaultBodyLimit};
use rateit_api::{AppState, router as api_router};
use rateit_common::{Config, LocalStorage, StorageBackend};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Room for multipart framing and text fields on top of the largest upload.
const BODY_LIMIT_MARGIN: usize = 64 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rateit=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting RateIt server...");

    let config = Config::load().context("failed to load configuration")?;

    let db = rateit_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    rateit_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    tokio::fs::create_dir_all(&config.storage.base_path)
        .await
        .with_context(|| {
            format!(
                "failed to create storage directory {}",
                config.storage.base_path.display()
            )
        })?;
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.base_url.clone(),
    ));

    let state = AppState::new(Arc::clone(&db), storage, &config);

    if let Some(path) = &config.catalog.import_path {
        match state.catalog_service.import_file(path).await {
            Ok(summary) => info!(
                path = %path.display(),
                movies = summary.movies,
                tv_shows = summary.tv_shows,
                "Imported catalog"
            ),
            Err(e) => warn!(path = %path.display(), error = %e, "Catalog import failed"),
        }
    }

    let body_limit = config.storage.max_upload_bytes + BODY_LIMIT_MARGIN;
    let uploads_route = format!("/{}", config.storage.base_url.trim_matches('/'));

    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(&uploads_route, ServeDir::new(&config.storage.base_path))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state);

    let ip: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host {}", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
