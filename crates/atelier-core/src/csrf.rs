//! CSRF token issuance and verification (double-submit cookie).
//!
//! The server stores one token in the `csrf-token` cookie and expects the
//! client to echo it back in the `x-csrf-token` request header. A request
//! whose header does not match its cookie is rejected.
//!
//! # Security model
//!
//! - Tokens are 256 bits from the OS CSPRNG, hex-encoded.
//! - If the OS source fails, a degraded SHA-256 derivation is used and a
//!   warning is logged. The site keeps serving rather than refusing requests.
//! - Comparison uses `subtle::ConstantTimeEq`.
//! - Verification never panics and returns `false` for malformed input.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Name of the cookie that carries the server-issued token.
pub const CSRF_COOKIE_NAME: &str = "csrf-token";

/// Name of the request header the client echoes the token in.
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// Number of random bytes in a token (hex doubles the length).
const TOKEN_BYTES: usize = 32;

/// Longest token accepted by [`verify_csrf_token`].
pub const MAX_TOKEN_LEN: usize = 256;

/// Cookie lifetime in seconds.
const COOKIE_MAX_AGE_SECS: u64 = 86_400;

/// Monotonic counter mixed into the degraded fallback.
static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new CSRF token.
///
/// Format: 64 lowercase hex characters (256 bits).
#[must_use]
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    fill_random(&mut bytes);
    hex::encode(bytes)
}

/// Check a client-provided token against the server-issued one.
///
/// Returns `true` iff both tokens are non-empty, no longer than
/// [`MAX_TOKEN_LEN`], of equal length and byte-equal. The byte comparison
/// runs in constant time.
#[must_use]
pub fn verify_csrf_token(expected: &str, provided: &str) -> bool {
    if expected.is_empty() || provided.is_empty() {
        return false;
    }
    if expected.len() > MAX_TOKEN_LEN || provided.len() > MAX_TOKEN_LEN {
        return false;
    }
    if expected.len() != provided.len() {
        return false;
    }
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Build the `Set-Cookie` value that stores `token`.
///
/// The cookie is deliberately not `HttpOnly`: the client script reads it to
/// echo the value in [`CSRF_HEADER_NAME`].
#[must_use]
pub fn csrf_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{CSRF_COOKIE_NAME}={token}; Path=/; SameSite=Strict; Max-Age={COOKIE_MAX_AGE_SECS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the value of cookie `name` from a `Cookie` request header.
#[must_use]
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
}

/// Whether a method is safe (no state change) and therefore exempt from
/// the token check.
#[must_use]
pub fn is_safe_method(method: &str) -> bool {
    matches!(
        method.to_ascii_uppercase().as_str(),
        "GET" | "HEAD" | "OPTIONS" | "TRACE"
    )
}

/// Whether `path` matches any of the exempt glob patterns.
#[must_use]
pub fn is_exempt_path(path: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| glob_match::glob_match(pattern, path))
}

/// Fill `buf` from the OS CSPRNG, falling back to a degraded derivation.
pub(crate) fn fill_random(buf: &mut [u8]) {
    if let Err(e) = OsRng.try_fill_bytes(buf) {
        tracing::warn!(
            error = %e,
            "secure random source unavailable, using degraded token derivation"
        );
        degraded_fill(buf);
    }
}

/// SHA-256 over wall-clock time, process id and a monotonic counter.
///
/// Unpredictable enough to keep tokens distinct, not a CSPRNG.
fn degraded_fill(buf: &mut [u8]) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut offset = 0;
    while offset < buf.len() {
        let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(nanos.to_le_bytes());
        hasher.update(std::process::id().to_le_bytes());
        hasher.update(counter.to_le_bytes());
        let digest = hasher.finalize();

        let n = digest.len().min(buf.len() - offset);
        buf[offset..offset + n].copy_from_slice(&digest[..n]);
        offset += n;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn token_has_expected_shape() {
        let token = generate_csrf_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn token_verifies_against_itself() {
        let token = generate_csrf_token();
        assert!(verify_csrf_token(&token, &token));
    }

    #[test]
    fn distinct_tokens_do_not_verify() {
        let a = generate_csrf_token();
        let b = generate_csrf_token();
        assert!(!verify_csrf_token(&a, &b));
    }

    #[test]
    fn length_mismatch_rejected() {
        let token = generate_csrf_token();
        assert!(!verify_csrf_token(&token, &token[..token.len() - 1]));
        assert!(!verify_csrf_token(&token[..10], &token));
    }

    #[test]
    fn empty_input_rejected() {
        assert!(!verify_csrf_token("", ""));
        assert!(!verify_csrf_token("abc", ""));
        assert!(!verify_csrf_token("", "abc"));
    }

    #[test]
    fn oversized_input_rejected() {
        let huge = "a".repeat(MAX_TOKEN_LEN + 1);
        assert!(!verify_csrf_token(&huge, &huge));
    }

    #[test]
    fn single_byte_difference_rejected() {
        let token = generate_csrf_token();
        let mut tampered = token.clone().into_bytes();
        tampered[0] = if tampered[0] == b'a' { b'b' } else { b'a' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(!verify_csrf_token(&token, &tampered));
    }

    #[test]
    fn thousand_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_csrf_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn degraded_fill_produces_distinct_output() {
        let mut a = [0u8; 48];
        let mut b = [0u8; 48];
        degraded_fill(&mut a);
        degraded_fill(&mut b);
        assert_ne!(a, b);
        assert!(a.iter().any(|&x| x != 0));
    }

    #[test]
    fn cookie_secure_flag() {
        let plain = csrf_cookie("abc", false);
        assert_eq!(
            plain,
            "csrf-token=abc; Path=/; SameSite=Strict; Max-Age=86400"
        );
        assert!(csrf_cookie("abc", true).ends_with("; Secure"));
        assert!(!plain.contains("HttpOnly"));
    }

    #[test]
    fn cookie_value_parsing() {
        let header = "theme=dark; csrf-token=deadbeef ; other=1";
        assert_eq!(cookie_value(header, "csrf-token"), Some("deadbeef"));
        assert_eq!(cookie_value(header, "theme"), Some("dark"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("", "csrf-token"), None);
        assert_eq!(cookie_value("garbage", "csrf-token"), None);
    }

    #[test]
    fn safe_methods() {
        assert!(is_safe_method("GET"));
        assert!(is_safe_method("head"));
        assert!(!is_safe_method("POST"));
        assert!(!is_safe_method("DELETE"));
    }

    #[test]
    fn exempt_paths_use_globs() {
        let patterns = vec!["/api/analytics".to_owned(), "/hooks/**".to_owned()];
        assert!(is_exempt_path("/api/analytics", &patterns));
        assert!(is_exempt_path("/hooks/deploy/42", &patterns));
        assert!(!is_exempt_path("/api/contact", &patterns));
    }
}
