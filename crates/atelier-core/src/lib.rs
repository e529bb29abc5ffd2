//! Core library for `Atelier`.
//!
//! Contains the security primitives (CSP builder, per-request nonces, CSRF
//! tokens, security response headers), the site content model, SEO
//! generation (page metadata, sitemap, schema.org JSON-LD), device-adaptive
//! animation tuning and the analytics event batcher. This crate knows
//! nothing about HTTP frameworks; `atelier-server` wires it into Axum.

pub mod analytics;
pub mod content;
pub mod csp;
pub mod csrf;
pub mod device;
pub mod error;
pub mod headers;
pub mod meta;
pub mod schema;
pub mod sitemap;
