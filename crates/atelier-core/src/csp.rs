//! Content-Security-Policy construction.
//!
//! Every response gets a fresh nonce. Inline `<script>` and `<style>` tags
//! rendered by the page layer carry that nonce; nothing else inline runs.
//! Development builds relax `script-src` with `'unsafe-eval'` and allow
//! websocket connections for live reload. Production builds never do.

use base64::Engine;

use crate::csrf::fill_random;

/// Raw nonce length in bytes (128 bits).
const NONCE_BYTES: usize = 16;

/// Generate a per-request CSP nonce, standard base64 encoded.
#[must_use]
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    fill_random(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Site-level knobs that shape the policy.
#[derive(Debug, Clone, Default)]
pub struct CspOptions {
    /// Relax the policy for local development.
    pub is_development: bool,
    /// Endpoint for violation reports.
    pub report_uri: Option<String>,
    /// Extra `connect-src` origins (e.g. an analytics collector).
    pub connect_src: Vec<String>,
    /// Extra `img-src` origins (e.g. an image CDN).
    pub img_src: Vec<String>,
}

/// An ordered list of CSP directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    directives: Vec<(String, Vec<String>)>,
}

impl ContentSecurityPolicy {
    /// Empty policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The site's policy for a request carrying `nonce`.
    #[must_use]
    pub fn for_site(nonce: &str, options: &CspOptions) -> Self {
        let nonce_src = format!("'nonce-{nonce}'");

        let mut script_src = vec!["'self'", nonce_src.as_str(), "'strict-dynamic'"];
        if options.is_development {
            script_src.push("'unsafe-eval'");
        }

        let mut connect_src = vec!["'self'".to_owned()];
        connect_src.extend(options.connect_src.iter().cloned());
        if options.is_development {
            connect_src.push("ws:".to_owned());
        }

        let mut img_src = vec!["'self'".to_owned(), "data:".to_owned(), "blob:".to_owned()];
        img_src.extend(options.img_src.iter().cloned());

        let mut policy = Self::new()
            .directive("default-src", ["'self'"])
            .directive("script-src", script_src)
            .directive("style-src", ["'self'", nonce_src.as_str()])
            .directive("img-src", img_src)
            .directive("font-src", ["'self'", "data:"])
            .directive("connect-src", connect_src)
            .directive("media-src", ["'self'"])
            .directive("object-src", ["'none'"])
            .directive("base-uri", ["'self'"])
            .directive("form-action", ["'self'"])
            .directive("frame-ancestors", ["'none'"]);

        if !options.is_development {
            policy = policy.directive("upgrade-insecure-requests", Vec::<String>::new());
        }
        if let Some(uri) = &options.report_uri {
            policy = policy.directive("report-uri", [uri.as_str()]);
        }
        policy
    }

    /// Append sources to `name`, creating the directive if needed.
    ///
    /// Duplicate sources are skipped.
    #[must_use]
    pub fn directive<I, S>(mut self, name: &str, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let idx = match self.directives.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.directives.push((name.to_owned(), Vec::new()));
                self.directives.len() - 1
            }
        };
        let existing = &mut self.directives[idx].1;
        for source in sources {
            let source = source.into();
            if !existing.contains(&source) {
                existing.push(source);
            }
        }
        self
    }

    /// Sources configured for `name`, if the directive exists.
    #[must_use]
    pub fn sources(&self, name: &str) -> Option<&[String]> {
        self.directives
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_slice())
    }

    /// Render the `Content-Security-Policy` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.directives
            .iter()
            .map(|(name, sources)| {
                if sources.is_empty() {
                    name.clone()
                } else {
                    format!("{name} {}", sources.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
