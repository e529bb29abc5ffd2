//! Page handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderName, Uri, header};
use axum::response::{IntoResponse, Response};
use maud::Markup;

use crate::error::PageError;
use crate::render::{ACCEPT_CH, PageContext, components, pages};
use crate::state::AppState;

/// Page responses embed a per-request nonce and CSRF token.
const PAGE_CACHE_CONTROL: &str = "no-cache";

const STYLESHEET_CACHE_CONTROL: &str = "public, max-age=3600";

fn page(markup: Markup) -> Response {
    (
        [
            (HeaderName::from_static("accept-ch"), ACCEPT_CH),
            (header::CACHE_CONTROL, PAGE_CACHE_CONTROL),
            (header::VARY, "Sec-CH-UA-Mobile, Device-Memory, ECT, Save-Data"),
        ],
        markup,
    )
        .into_response()
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    ctx: PageContext,
) -> Result<Response, PageError> {
    Ok(page(pages::home(&state.content, &state.config.base_url, &ctx)?))
}

pub async fn services(
    State(state): State<Arc<AppState>>,
    ctx: PageContext,
) -> Result<Response, PageError> {
    Ok(page(pages::services(&state.content, &state.config.base_url, &ctx)?))
}

pub async fn service_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    ctx: PageContext,
) -> Result<Response, PageError> {
    let service = state
        .content
        .service(&slug)
        .ok_or_else(|| PageError::NotFound(format!("/services/{slug}")))?;
    Ok(page(pages::service_detail(
        &state.content,
        service,
        &state.config.base_url,
        &ctx,
    )?))
}

pub async fn portfolio(
    State(state): State<Arc<AppState>>,
    ctx: PageContext,
) -> Result<Response, PageError> {
    Ok(page(pages::portfolio(&state.content, &state.config.base_url, &ctx)?))
}

pub async fn project_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    ctx: PageContext,
) -> Result<Response, PageError> {
    let project = state
        .content
        .project(&slug)
        .ok_or_else(|| PageError::NotFound(format!("/portfolio/{slug}")))?;
    Ok(page(pages::project_detail(
        &state.content,
        project,
        &state.config.base_url,
        &ctx,
    )?))
}

pub async fn about(
    State(state): State<Arc<AppState>>,
    ctx: PageContext,
) -> Result<Response, PageError> {
    Ok(page(pages::about(&state.content, &state.config.base_url, &ctx)?))
}

pub async fn contact(
    State(state): State<Arc<AppState>>,
    ctx: PageContext,
) -> Result<Response, PageError> {
    Ok(page(pages::contact(&state.content, &state.config.base_url, &ctx)?))
}

/// Shared stylesheet.
pub async fn stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, STYLESHEET_CACHE_CONTROL),
        ],
        components::PAGE_CSS,
    )
}

/// Fallback for unmatched paths.
pub async fn not_found(uri: Uri) -> PageError {
    PageError::NotFound(uri.path().to_owned())
}
