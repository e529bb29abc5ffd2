//! HTTP error types for the `Atelier` server.
//!
//! API handlers return [`AppError`], rendered as a JSON body with a
//! machine-readable `error` field and a human-readable `message`. Page
//! handlers return [`PageError`], rendered as a small HTML page that only
//! depends on the external stylesheet (it carries no nonce).

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};
use serde::Serialize;

use atelier_core::error::{AnalyticsError, SeoError};

/// Application-level error returned from API handlers.
#[derive(Debug)]
pub enum AppError {
    /// Client sent invalid input.
    BadRequest(String),
    /// Request rejected by a security check (e.g. CSRF).
    Forbidden(String),
    /// Requested resource not found.
    NotFound(String),
    /// Request body exceeds a limit.
    PayloadTooLarge(String),
    /// Request body is not `application/json`.
    UnsupportedMediaType(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg)
            }
            Self::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                msg,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_owned(),
                )
            }
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidEvent { .. } => Self::BadRequest(err.to_string()),
            AnalyticsError::BatchTooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            AnalyticsError::SinkFailure { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge(message),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::UnsupportedMediaType(message),
            _ => Self::BadRequest(message),
        }
    }
}

/// JSON body extractor whose rejections render as [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Error returned from page handlers.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No page at this path.
    #[error("page not found: {0}")]
    NotFound(String),

    /// Structured data for the page could not be produced.
    #[error("seo error: {0}")]
    Seo(#[from] SeoError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::NotFound(path) => {
                tracing::debug!(path = %path, "page not found");
                (
                    StatusCode::NOT_FOUND,
                    "Page not found",
                    "The page you were looking for has moved or never existed.",
                )
            }
            Self::Seo(err) => {
                tracing::error!(error = %err, "page rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "We could not render this page. Please try again shortly.",
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    meta name="robots" content="noindex, nofollow";
                    link rel="stylesheet" href=(crate::render::STYLESHEET_PATH);
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a class="button" href="/" { "Back to the homepage" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_statuses() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::PayloadTooLarge("x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                AppError::UnsupportedMediaType("x".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn analytics_errors_map_to_client_errors() {
        let invalid: AppError = AnalyticsError::InvalidEvent {
            reason: "bad".into(),
        }
        .into();
        assert!(matches!(invalid, AppError::BadRequest(_)));

        let big: AppError = AnalyticsError::BatchTooLarge {
            count: 500,
            limit: 100,
        }
        .into();
        assert!(matches!(big, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn page_error_display() {
        let err = PageError::NotFound("/nope".into());
        assert_eq!(err.to_string(), "page not found: /nope");
    }

    #[test]
    fn page_error_statuses() {
        assert_eq!(
            PageError::NotFound("/x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        let seo = PageError::Seo(SeoError::Serialization {
            schema_type: "Organization".into(),
            reason: "boom".into(),
        });
        assert_eq!(
            seo.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
