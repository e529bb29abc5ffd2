//! `Atelier` HTTP server.
//!
//! Wires the core library into a running Axum server: server-rendered pages
//! behind per-request CSP nonces and CSRF protection, the sitemap and
//! robots endpoints, and the JSON API for device tuning, analytics ingest
//! and contact enquiries.

pub mod config;
pub mod error;
pub mod middleware;
pub mod render;
pub mod routes;
#[cfg(feature = "analytics-forward")]
pub mod sink;
pub mod state;
