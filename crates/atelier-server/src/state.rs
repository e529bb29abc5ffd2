//! Shared application state for the `Atelier` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the configuration, the site content,
//! the CSP options derived from configuration, and the analytics batcher.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use chrono::{DateTime, Utc};

use atelier_core::analytics::EventBatcher;
use atelier_core::content::SiteContent;
use atelier_core::csp::CspOptions;

use crate::config::ServerConfig;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Content rendered by the pages and SEO generators.
    pub content: Arc<SiteContent>,
    /// Inputs to the per-request CSP.
    pub csp_options: CspOptions,
    /// Analytics queue, flushed by the background worker.
    pub batcher: Arc<EventBatcher>,
    /// Accepted contact enquiries since startup.
    pub contact_enquiries: AtomicU64,
    /// Used as `lastmod` for sitemap entries.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build state from its parts.
    #[must_use]
    pub fn new(config: ServerConfig, content: SiteContent, batcher: Arc<EventBatcher>) -> Self {
        let csp_options = CspOptions {
            is_development: config.is_development,
            report_uri: config.csp_report_uri.clone(),
            connect_src: Vec::new(),
            img_src: Vec::new(),
        };

        Self {
            config,
            content: Arc::new(content),
            csp_options,
            batcher,
            contact_enquiries: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
