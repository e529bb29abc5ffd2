//! `Atelier` server entry point.
//!
//! Loads the site content, builds the analytics batcher and its sink, then
//! starts the Axum HTTP server with graceful shutdown. A background flush
//! worker runs alongside the server and drains the queue on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use atelier_core::analytics::{AnalyticsSink, BatcherConfig, EventBatcher, LogSink};
use atelier_core::content::SiteContent;

use atelier_server::config::ServerConfig;
use atelier_server::routes;
use atelier_server::state::AppState;

/// How long the flush worker may take to drain after shutdown.
const WORKER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        base_url = %config.base_url,
        development = config.is_development,
        "Atelier starting"
    );

    let content = load_content(&config)?;
    let batcher = Arc::new(EventBatcher::new(
        BatcherConfig {
            batch_size: config.analytics.batch_size,
            max_queue: config.analytics.max_queue,
        },
        build_sink(&config)?,
    ));

    // Shutdown signal channel.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn analytics flush worker.
    let flush_worker_handle = {
        let worker = Arc::clone(&batcher);
        let interval = Duration::from_secs(config.analytics.flush_interval_secs.max(1));
        tokio::spawn(worker.run(shutdown_rx, interval))
    };

    let state = Arc::new(AppState::new(config.clone(), content, batcher));
    let app = build_router(state, &config);

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Atelier server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    // Wait for the flush worker to drain (with timeout).
    info!("waiting for analytics worker to stop");
    if tokio::time::timeout(WORKER_SHUTDOWN_TIMEOUT, flush_worker_handle)
        .await
        .is_err()
    {
        warn!("analytics worker did not stop in time, queued events dropped");
    }

    info!("Atelier server stopped");
    Ok(())
}

/// Load the content override if configured, else the built-in copy.
fn load_content(config: &ServerConfig) -> anyhow::Result<SiteContent> {
    match &config.content_path {
        Some(path) => {
            let content = SiteContent::from_json_file(path)
                .with_context(|| format!("failed to load content from {}", path.display()))?;
            info!(
                path = %path.display(),
                services = content.services.len(),
                projects = content.projects.len(),
                "site content loaded"
            );
            Ok(content)
        }
        None => {
            info!("using built-in site content");
            Ok(SiteContent::default())
        }
    }
}

/// Pick the analytics sink: forward to a collector if configured, else log.
fn build_sink(config: &ServerConfig) -> anyhow::Result<Arc<dyn AnalyticsSink>> {
    match &config.analytics.forward_url {
        #[cfg(feature = "analytics-forward")]
        Some(url) => {
            info!(url = %url, "forwarding analytics batches");
            let sink = atelier_server::sink::HttpSink::new(url.clone())
                .context("failed to build analytics HTTP client")?;
            Ok(Arc::new(sink))
        }
        #[cfg(not(feature = "analytics-forward"))]
        Some(_) => {
            anyhow::bail!(
                "analytics forward URL set but feature 'analytics-forward' is not enabled"
            );
        }
        None => {
            info!("analytics batches will be logged locally");
            Ok(Arc::new(LogSink))
        }
    }
}

/// Add tracing and CORS around the site router.
fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    // CORS: the API is same-origin; only the site's own origin is allowed.
    let cors = match HeaderValue::from_str(&config.base_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::HeaderName::from_static(atelier_core::csrf::CSRF_HEADER_NAME),
            ])
            .allow_credentials(true),
        Err(e) => {
            warn!(error = %e, "base URL is not a valid origin, CORS disabled");
            CorsLayer::new()
        }
    };

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
