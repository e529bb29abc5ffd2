//! Standard security response headers.
//!
//! Framework-agnostic: returns `(name, value)` pairs that the server layer
//! converts into real header types.

/// HSTS value: two years, subdomains, preload-list eligible.
pub const HSTS_VALUE: &str = "max-age=63072000; includeSubDomains; preload";

/// Browser features the site never needs.
pub const PERMISSIONS_POLICY: &str = "camera=(), microphone=(), geolocation=(), interest-cohort=()";

/// Assemble the security headers for one response.
///
/// HSTS is omitted in development, where the site is served over plain HTTP.
#[must_use]
pub fn security_headers(csp: &str, is_development: bool) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        ("content-security-policy", csp.to_owned()),
        ("x-frame-options", "DENY".to_owned()),
        ("x-content-type-options", "nosniff".to_owned()),
        ("permissions-policy", PERMISSIONS_POLICY.to_owned()),
        (
            "referrer-policy",
            "strict-origin-when-cross-origin".to_owned(),
        ),
        ("cross-origin-opener-policy", "same-origin".to_owned()),
        ("x-dns-prefetch-control", "on".to_owned()),
    ];
    if !is_development {
        headers.push(("strict-transport-security", HSTS_VALUE.to_owned()));
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(headers: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn production_headers() {
        let headers = security_headers("default-src 'self'", false);
        assert_eq!(
            value(&headers, "content-security-policy"),
            Some("default-src 'self'")
        );
        assert_eq!(value(&headers, "x-frame-options"), Some("DENY"));
        assert_eq!(value(&headers, "x-content-type-options"), Some("nosniff"));
        assert_eq!(value(&headers, "strict-transport-security"), Some(HSTS_VALUE));
        assert_eq!(value(&headers, "permissions-policy"), Some(PERMISSIONS_POLICY));
    }

    #[test]
    fn development_skips_hsts() {
        let headers = security_headers("default-src 'self'", true);
        assert!(value(&headers, "strict-transport-security").is_none());
        assert!(value(&headers, "x-frame-options").is_some());
    }

    #[test]
    fn header_names_are_lowercase() {
        for (name, _) in security_headers("x", false) {
            assert_eq!(name, name.to_ascii_lowercase());
        }
    }
}
