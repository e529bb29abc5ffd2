//! Request middleware: per-request CSP nonce with security headers, and the
//! double-submit CSRF check.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use atelier_core::csp::{ContentSecurityPolicy, generate_nonce};
use atelier_core::csrf::{
    self, CSRF_COOKIE_NAME, CSRF_HEADER_NAME, MAX_TOKEN_LEN, generate_csrf_token,
    verify_csrf_token,
};
use atelier_core::headers::security_headers;

use crate::error::AppError;
use crate::state::AppState;

/// Nonce for inline `<script>`/`<style>` tags on this response.
#[derive(Debug, Clone)]
pub struct RequestNonce(pub String);

/// CSRF token the page should embed for its own requests.
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

/// Generate a nonce, expose it to handlers, and attach the security headers
/// (including a CSP bound to that nonce) to the response.
pub async fn security_headers_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let nonce = generate_nonce();
    req.extensions_mut().insert(RequestNonce(nonce.clone()));

    let mut response = next.run(req).await;

    let csp = ContentSecurityPolicy::for_site(&nonce, &state.csp_options).to_header_value();
    let headers = response.headers_mut();
    for (name, value) in security_headers(&csp, state.config.is_development) {
        match HeaderValue::from_str(&value) {
            Ok(v) => {
                headers.insert(HeaderName::from_static(name), v);
            }
            Err(e) => {
                tracing::warn!(header = name, error = %e, "skipping invalid security header");
            }
        }
    }

    response
}

/// Double-submit CSRF protection.
///
/// Safe methods pass through and are issued a token cookie if they lack a
/// usable one. Other methods must carry an `x-csrf-token` header equal to
/// the `csrf-token` cookie unless the path is exempt.
pub async fn csrf_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_token = request_cookie(req.headers(), CSRF_COOKIE_NAME)
        .filter(|t| is_reusable_token(t))
        .map(str::to_owned);

    if csrf::is_safe_method(req.method().as_str()) {
        let (token, issued) = match cookie_token {
            Some(token) => (token, false),
            None => (generate_csrf_token(), true),
        };
        req.extensions_mut().insert(CsrfToken(token.clone()));

        let mut response = next.run(req).await;
        if issued {
            let cookie = csrf::csrf_cookie(&token, state.config.secure_cookies());
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        return response;
    }

    let path = req.uri().path().to_owned();
    if csrf::is_exempt_path(&path, &state.config.csrf_exempt) {
        return next.run(req).await;
    }

    let provided = req
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let expected = cookie_token.as_deref().unwrap_or_default();

    if !verify_csrf_token(expected, provided) {
        tracing::warn!(
            method = %req.method(),
            path = %path,
            has_cookie = !expected.is_empty(),
            has_header = !provided.is_empty(),
            "csrf check failed"
        );
        return AppError::Forbidden("missing or invalid CSRF token".to_owned()).into_response();
    }

    if let Some(token) = cookie_token {
        req.extensions_mut().insert(CsrfToken(token));
    }
    next.run(req).await
}

/// Value of cookie `name` across all `Cookie` headers.
fn request_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| csrf::cookie_value(raw, name))
}

fn is_reusable_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LEN
        && token.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_lookup_spans_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("csrf-token=abc123; lang=pt"),
        );
        assert_eq!(request_cookie(&headers, "csrf-token"), Some("abc123"));
        assert_eq!(request_cookie(&headers, "lang"), Some("pt"));
        assert_eq!(request_cookie(&headers, "missing"), None);
    }

    #[test]
    fn reusable_tokens_are_hex() {
        assert!(is_reusable_token(&generate_csrf_token()));
        assert!(!is_reusable_token(""));
        assert!(!is_reusable_token("not hex!"));
        assert!(!is_reusable_token(&"a".repeat(MAX_TOKEN_LEN + 1)));
    }
}
