//! Route definitions for the site.
//!
//! ## Routes
//!
//! - `GET /`, `/services`, `/services/{slug}`, `/portfolio`,
//!   `/portfolio/{slug}`, `/about`, `/contact` - Pages
//! - `GET /styles.css` - Site stylesheet
//! - `GET /sitemap.xml` - Sitemap
//! - `GET /robots.txt` - Crawler instructions
//! - `GET|POST /api/device-config` - Animation tuning
//! - `POST /api/analytics` - Event ingest
//! - `GET /api/analytics/stats` - Batcher counters
//! - `POST /api/contact` - Contact enquiries
//! - `GET /health` - Health check (JSON)
//! - `GET /assets/*` - Static files, when the assets directory exists

mod analytics;
mod contact;
mod device;
mod health;
mod pages;
mod seo;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::services::ServeDir;

use crate::middleware::{csrf_middleware, security_headers_middleware};
use crate::state::AppState;

/// Largest JSON body the API accepts.
const API_BODY_LIMIT: usize = 64 * 1024;

/// Concurrent in-flight API requests.
const API_CONCURRENCY: usize = 64;

/// Build the complete site router with security middleware applied.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/device-config",
            get(device::device_config).post(device::report_frames),
        )
        .route("/api/analytics", post(analytics::ingest))
        .route("/api/analytics/stats", get(analytics::stats))
        .route("/api/contact", post(contact::submit))
        .layer(DefaultBodyLimit::max(API_BODY_LIMIT))
        .layer(tower::limit::ConcurrencyLimitLayer::new(API_CONCURRENCY));

    let mut app = Router::new()
        .route("/", get(pages::home))
        .route("/services", get(pages::services))
        .route("/services/{slug}", get(pages::service_detail))
        .route("/portfolio", get(pages::portfolio))
        .route("/portfolio/{slug}", get(pages::project_detail))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route(crate::render::STYLESHEET_PATH, get(pages::stylesheet))
        .route("/sitemap.xml", get(seo::sitemap_xml))
        .route("/robots.txt", get(seo::robots_txt))
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .fallback(pages::not_found);

    let assets_dir = &state.config.assets_dir;
    if assets_dir.is_dir() {
        tracing::info!(path = %assets_dir.display(), "serving static assets at /assets");
        app = app.nest_service("/assets", ServeDir::new(assets_dir));
    } else {
        tracing::info!(
            path = %assets_dir.display(),
            "assets directory not found, /assets disabled"
        );
    }

    app.layer(axum_mw::from_fn_with_state(
        Arc::clone(&state),
        csrf_middleware,
    ))
    .layer(axum_mw::from_fn_with_state(
        Arc::clone(&state),
        security_headers_middleware,
    ))
    .with_state(state)
}
