//! Server configuration for `Atelier`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `ATELIER_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default CSRF-exempt paths. Analytics beacons are sent with
/// `navigator.sendBeacon`, which cannot set custom headers.
const DEFAULT_CSRF_EXEMPT: &str = "/api/analytics";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Public origin of the site, without a trailing slash.
    pub base_url: String,
    /// Development mode: relaxed CSP, no HSTS, non-`Secure` cookies.
    pub is_development: bool,
    /// Optional JSON file replacing the built-in site content.
    pub content_path: Option<PathBuf>,
    /// Directory served under `/assets`.
    pub assets_dir: PathBuf,
    /// Glob patterns of paths that skip the CSRF check.
    pub csrf_exempt: Vec<String>,
    /// CSP violation report endpoint.
    pub csp_report_uri: Option<String>,
    /// Analytics batching settings.
    pub analytics: AnalyticsConfig,
}

/// Analytics batching configuration.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Events per delivered batch.
    pub batch_size: usize,
    /// Seconds between periodic flushes.
    pub flush_interval_secs: u64,
    /// Queue bound before the oldest events are dropped.
    pub max_queue: usize,
    /// Collector URL batches are forwarded to (logged locally if unset).
    pub forward_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (platform convention, binds to `0.0.0.0`)
    /// - `ATELIER_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:3000`)
    /// - `ATELIER_LOG_LEVEL`: log filter (default: `info`)
    /// - `ATELIER_BASE_URL`: public origin (default: `http://localhost:3000`)
    /// - `ATELIER_ENV`: `development` or `production` (default: `production`)
    /// - `ATELIER_CONTENT_PATH`: JSON content override (optional)
    /// - `ATELIER_ASSETS_DIR`: static assets directory (default: `./assets`)
    /// - `ATELIER_CSRF_EXEMPT`: comma-separated glob patterns (default: `/api/analytics`)
    /// - `ATELIER_CSP_REPORT_URI`: CSP `report-uri` (optional)
    /// - `ATELIER_ANALYTICS_BATCH_SIZE`: events per batch (default: `20`)
    /// - `ATELIER_ANALYTICS_FLUSH_SECS`: seconds between flushes (default: `10`)
    /// - `ATELIER_ANALYTICS_MAX_QUEUE`: queued events before dropping (default: `1000`)
    /// - `ATELIER_ANALYTICS_FORWARD_URL`: collector to forward batches to (optional)
    #[must_use]
    pub fn from_env() -> Self {
        // Priority: ATELIER_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Ok(addr) = std::env::var("ATELIER_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3000)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(3000);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 3000))
        };

        let log_level = std::env::var("ATELIER_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        let base_url = std::env::var("ATELIER_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned())
            .trim_end_matches('/')
            .to_owned();

        let is_development = std::env::var("ATELIER_ENV")
            .map(|v| matches!(v.to_lowercase().as_str(), "development" | "dev"))
            .unwrap_or(false);

        let content_path = non_empty_var("ATELIER_CONTENT_PATH").map(PathBuf::from);

        let assets_dir = std::env::var("ATELIER_ASSETS_DIR")
            .map_or_else(|_| PathBuf::from("./assets"), PathBuf::from);

        let csrf_exempt = std::env::var("ATELIER_CSRF_EXEMPT")
            .unwrap_or_else(|_| DEFAULT_CSRF_EXEMPT.to_owned())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        let csp_report_uri = non_empty_var("ATELIER_CSP_REPORT_URI");

        let analytics = AnalyticsConfig {
            batch_size: parse_var("ATELIER_ANALYTICS_BATCH_SIZE").unwrap_or(20),
            flush_interval_secs: parse_var("ATELIER_ANALYTICS_FLUSH_SECS").unwrap_or(10),
            max_queue: parse_var("ATELIER_ANALYTICS_MAX_QUEUE").unwrap_or(1000),
            forward_url: non_empty_var("ATELIER_ANALYTICS_FORWARD_URL"),
        };

        Self {
            bind_addr,
            log_level,
            base_url,
            is_development,
            content_path,
            assets_dir,
            csrf_exempt,
            csp_report_uri,
            analytics,
        }
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        !self.is_development && self.base_url.starts_with("https://")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: "info".to_owned(),
            base_url: "http://localhost:3000".to_owned(),
            is_development: false,
            content_path: None,
            assets_dir: PathBuf::from("./assets"),
            csrf_exempt: vec![DEFAULT_CSRF_EXEMPT.to_owned()],
            csp_report_uri: None,
            analytics: AnalyticsConfig {
                batch_size: 20,
                flush_interval_secs: 10,
                max_queue: 1000,
                forward_url: None,
            },
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unsafe_code)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch process environment.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "PORT",
        "ATELIER_BIND_ADDR",
        "ATELIER_LOG_LEVEL",
        "ATELIER_BASE_URL",
        "ATELIER_ENV",
        "ATELIER_CONTENT_PATH",
        "ATELIER_ASSETS_DIR",
        "ATELIER_CSRF_EXEMPT",
        "ATELIER_CSP_REPORT_URI",
        "ATELIER_ANALYTICS_BATCH_SIZE",
        "ATELIER_ANALYTICS_FLUSH_SECS",
        "ATELIER_ANALYTICS_MAX_QUEUE",
        "ATELIER_ANALYTICS_FORWARD_URL",
    ];

    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: serialized by ENV_MUTEX; only these tests touch the vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: restoring the saved state under the same lock.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults() {
        with_env_vars(&[], || {
            let config = ServerConfig::from_env();
            assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
            assert_eq!(config.base_url, "http://localhost:3000");
            assert!(!config.is_development);
            assert_eq!(config.csrf_exempt, vec!["/api/analytics".to_owned()]);
            assert_eq!(config.analytics.batch_size, 20);
            assert_eq!(config.analytics.flush_interval_secs, 10);
            assert!(config.analytics.forward_url.is_none());
            assert!(config.content_path.is_none());
        });
    }

    #[test]
    fn port_binds_all_interfaces() {
        with_env_vars(&[("PORT", "8080")], || {
            let config = ServerConfig::from_env();
            assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        });
    }

    #[test]
    fn bind_addr_overrides_port() {
        with_env_vars(
            &[("PORT", "8080"), ("ATELIER_BIND_ADDR", "127.0.0.1:9000")],
            || {
                let config = ServerConfig::from_env();
                assert_eq!(config.bind_addr.port(), 9000);
            },
        );
    }

    #[test]
    fn custom_values() {
        with_env_vars(
            &[
                ("ATELIER_BASE_URL", "https://northlight.studio/"),
                ("ATELIER_ENV", "development"),
                ("ATELIER_CSRF_EXEMPT", "/api/analytics, /hooks/**,"),
                ("ATELIER_ANALYTICS_BATCH_SIZE", "5"),
                ("ATELIER_ANALYTICS_FORWARD_URL", "https://collect.example.com"),
                ("ATELIER_CONTENT_PATH", "/etc/atelier/content.json"),
            ],
            || {
                let config = ServerConfig::from_env();
                assert_eq!(config.base_url, "https://northlight.studio");
                assert!(config.is_development);
                assert_eq!(config.csrf_exempt, vec!["/api/analytics", "/hooks/**"]);
                assert_eq!(config.analytics.batch_size, 5);
                assert_eq!(
                    config.analytics.forward_url.as_deref(),
                    Some("https://collect.example.com")
                );
                assert_eq!(
                    config.content_path,
                    Some(PathBuf::from("/etc/atelier/content.json"))
                );
            },
        );
    }

    #[test]
    fn invalid_numbers_fall_back() {
        with_env_vars(&[("ATELIER_ANALYTICS_MAX_QUEUE", "lots")], || {
            assert_eq!(ServerConfig::from_env().analytics.max_queue, 1000);
        });
    }

    #[test]
    fn secure_cookies_only_for_https_production() {
        let mut config = ServerConfig::default();
        assert!(!config.secure_cookies());
        config.base_url = "https://northlight.studio".to_owned();
        assert!(config.secure_cookies());
        config.is_development = true;
        assert!(!config.secure_cookies());
    }
}
