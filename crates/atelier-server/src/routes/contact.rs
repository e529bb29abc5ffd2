//! Contact form submissions.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_core::content::SiteContent;

use crate::error::{ApiJson, AppError};
use crate::state::AppState;

const MAX_NAME_CHARS: usize = 120;
const MAX_EMAIL_CHARS: usize = 254;
const MAX_COMPANY_CHARS: usize = 120;
const MIN_MESSAGE_CHARS: usize = 10;
const MAX_MESSAGE_CHARS: usize = 5000;

const THANK_YOU: &str = "Thanks, we will be in touch within two working days.";

/// Enquiry posted by the contact form.
#[derive(Debug, Deserialize)]
pub struct ContactEnquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    /// Service slug, empty when the visitor is unsure.
    #[serde(default)]
    pub service: Option<String>,
    pub message: String,
    /// Honeypot. Hidden from people, filled in by bots.
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub reference: Uuid,
    pub message: &'static str,
}

impl ContactEnquiry {
    fn is_bot(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.trim().is_empty())
    }

    /// Check field lengths, the email shape and the service slug.
    fn validate(&self, content: &SiteContent) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
            return Err(format!("name must be 1-{MAX_NAME_CHARS} characters"));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err("email address looks invalid".to_owned());
        }
        if self
            .company
            .as_deref()
            .is_some_and(|c| c.chars().count() > MAX_COMPANY_CHARS)
        {
            return Err(format!("company must be at most {MAX_COMPANY_CHARS} characters"));
        }
        if let Some(slug) = self.service.as_deref().filter(|s| !s.is_empty()) {
            if content.service(slug).is_none() {
                return Err(format!("unknown service '{slug}'"));
            }
        }
        let len = self.message.trim().chars().count();
        if !(MIN_MESSAGE_CHARS..=MAX_MESSAGE_CHARS).contains(&len) {
            return Err(format!(
                "message must be {MIN_MESSAGE_CHARS}-{MAX_MESSAGE_CHARS} characters"
            ));
        }
        Ok(())
    }
}

/// One `@`, non-empty local part, a dot inside the domain, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_CHARS || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// `POST /api/contact`
///
/// Honeypot submissions get the normal reply but are discarded.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    ApiJson(enquiry): ApiJson<ContactEnquiry>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let reference = Uuid::new_v4();
    let reply = (
        StatusCode::ACCEPTED,
        Json(ContactResponse {
            reference,
            message: THANK_YOU,
        }),
    );

    if enquiry.is_bot() {
        tracing::info!(%reference, "discarding contact submission with filled honeypot");
        return Ok(reply);
    }

    enquiry.validate(&state.content).map_err(AppError::BadRequest)?;

    let total = state
        .contact_enquiries
        .fetch_add(1, Ordering::Relaxed)
        .saturating_add(1);
    tracing::info!(
        %reference,
        service = enquiry.service.as_deref().unwrap_or("unspecified"),
        message_chars = enquiry.message.chars().count(),
        total,
        "contact enquiry received"
    );

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enquiry() -> ContactEnquiry {
        ContactEnquiry {
            name: "Ana Silva".to_owned(),
            email: "ana@example.pt".to_owned(),
            company: Some("Tidewater".to_owned()),
            service: Some("web-design".to_owned()),
            message: "We need a new site for the spring launch.".to_owned(),
            website: None,
        }
    }

    #[test]
    fn valid_enquiry_passes() {
        assert_eq!(enquiry().validate(&SiteContent::default()), Ok(()));
    }

    #[test]
    fn empty_service_is_allowed() {
        let mut e = enquiry();
        e.service = Some(String::new());
        assert!(e.validate(&SiteContent::default()).is_ok());
    }

    #[test]
    fn rejects_bad_fields() {
        let content = SiteContent::default();

        let mut e = enquiry();
        e.name = "   ".to_owned();
        assert!(e.validate(&content).is_err());

        let mut e = enquiry();
        e.service = Some("plumbing".to_owned());
        assert!(e.validate(&content).is_err());

        let mut e = enquiry();
        e.message = "hi".to_owned();
        assert!(e.validate(&content).is_err());

        let mut e = enquiry();
        e.message = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(e.validate(&content).is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b.co"));
        assert!(!is_plausible_email("a@@b.co"));
        assert!(!is_plausible_email("a b@c.co"));
        assert!(!is_plausible_email("a@.co"));
    }

    #[test]
    fn honeypot_detects_bots() {
        let mut e = enquiry();
        assert!(!e.is_bot());
        e.website = Some("http://spam.example".to_owned());
        assert!(e.is_bot());
    }
}
