//! HTML and XML rendering.
//!
//! All markup is produced with [maud](https://maud.lambda.xyz/), so every
//! dynamic value is escaped. Inline `<style>` and `<script>` tags carry the
//! per-request CSP nonce from [`PageContext`].

pub mod components;
pub mod pages;
pub mod sitemap;

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use atelier_core::device::{AnimationConfig, DeviceHints, DeviceProfile};

use crate::middleware::{CsrfToken, RequestNonce};
use crate::state::AppState;

/// Path the shared stylesheet is served from.
pub const STYLESHEET_PATH: &str = "/styles.css";

/// Client hints the pages ask browsers to send on subsequent requests.
pub const ACCEPT_CH: &str =
    "Sec-CH-UA-Mobile, Device-Memory, ECT, Save-Data, Sec-CH-Prefers-Reduced-Motion";

/// Per-request inputs every page needs besides the content.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub nonce: String,
    pub csrf_token: String,
    pub animation: AnimationConfig,
}

impl PageContext {
    /// Context for a client described by `hints`.
    #[must_use]
    pub fn new(nonce: String, csrf_token: String, hints: &DeviceHints) -> Self {
        let profile = DeviceProfile::classify(hints);
        Self {
            nonce,
            csrf_token,
            animation: AnimationConfig::for_profile(&profile),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for PageContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let nonce = parts
            .extensions
            .get::<RequestNonce>()
            .map(|n| n.0.clone())
            .unwrap_or_default();
        let csrf_token = parts
            .extensions
            .get::<CsrfToken>()
            .map(|t| t.0.clone())
            .unwrap_or_default();
        let headers = &parts.headers;
        let hints = DeviceHints::from_lookup(|name| headers.get(name).and_then(|v| v.to_str().ok()));

        Ok(Self::new(nonce, csrf_token, &hints))
    }
}
