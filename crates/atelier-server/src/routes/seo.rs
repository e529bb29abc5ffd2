//! Crawler-facing endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use atelier_core::meta::canonical_url;
use atelier_core::sitemap::Sitemap;

use crate::render::sitemap::sitemap_xml as render_sitemap;
use crate::state::AppState;

/// `GET /sitemap.xml`
pub async fn sitemap_xml(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sitemap = Sitemap::for_site(&state.config.base_url, &state.content, state.started_at);
    tracing::debug!(entries = sitemap.len(), "serving sitemap");
    (
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        render_sitemap(&sitemap),
    )
}

/// `GET /robots.txt`
///
/// Everything is crawlable except the API. Development builds disallow all.
pub async fn robots_txt(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = if state.config.is_development {
        "User-agent: *\nDisallow: /\n".to_owned()
    } else {
        format!(
            "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}\n",
            canonical_url(&state.config.base_url, "/sitemap.xml")
        )
    };
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}
