//! Sitemap entries following the sitemaps.org protocol.
//!
//! Rendering to XML happens in the server crate; this module owns the
//! entry list and its invariants: priorities lie in `[0, 1]`, frequencies
//! come from the protocol's enumerated set, and entries are ordered by
//! descending priority.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::SiteContent;
use crate::meta::canonical_url;

/// Priority used when a caller passes NaN.
const DEFAULT_PRIORITY: f32 = 0.5;

/// `<changefreq>` values defined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// All protocol values.
    pub const ALL: [Self; 7] = [
        Self::Always,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Never,
    ];

    /// Protocol string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// A collection of sitemap entries for one site.
#[derive(Debug, Clone)]
pub struct Sitemap {
    base_url: String,
    entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Empty sitemap rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            entries: Vec::new(),
        }
    }

    /// Add a page. `priority` is clamped into `[0, 1]`.
    pub fn add(
        &mut self,
        path: &str,
        change_frequency: ChangeFrequency,
        priority: f32,
        last_modified: DateTime<Utc>,
    ) {
        let priority = if priority.is_nan() {
            DEFAULT_PRIORITY
        } else {
            priority.clamp(0.0, 1.0)
        };
        self.entries.push(SitemapEntry {
            url: canonical_url(&self.base_url, path),
            last_modified,
            change_frequency,
            priority,
        });
    }

    /// Entries ordered by descending priority, ties broken by URL.
    #[must_use]
    pub fn entries(&self) -> Vec<SitemapEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then_with(|| a.url.cmp(&b.url))
        });
        entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the sitemap has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full site: home, services, portfolio, about and contact.
    #[must_use]
    pub fn for_site(base_url: &str, content: &SiteContent, last_modified: DateTime<Utc>) -> Self {
        let mut sitemap = Self::new(base_url);
        sitemap.add("/", ChangeFrequency::Weekly, 1.0, last_modified);
        sitemap.add("/services", ChangeFrequency::Monthly, 0.9, last_modified);
        for service in &content.services {
            sitemap.add(
                &format!("/services/{}", service.slug),
                ChangeFrequency::Monthly,
                0.8,
                last_modified,
            );
        }
        sitemap.add("/portfolio", ChangeFrequency::Weekly, 0.8, last_modified);
        for project in &content.projects {
            sitemap.add(
                &format!("/portfolio/{}", project.slug),
                ChangeFrequency::Monthly,
                if project.featured { 0.7 } else { 0.6 },
                last_modified,
            );
        }
        sitemap.add("/about", ChangeFrequency::Monthly, 0.7, last_modified);
        sitemap.add("/contact", ChangeFrequency::Yearly, 0.7, last_modified);
        sitemap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
    }

    #[test]
    fn site_sitemap_sorted_descending() {
        let sitemap = Sitemap::for_site("https://s.io", &SiteContent::default(), now());
        let entries = sitemap.entries();
        assert!(!entries.is_empty());
        assert!(entries.windows(2).all(|w| w[0].priority >= w[1].priority));
        assert_eq!(entries[0].url, "https://s.io/");
    }

    #[test]
    fn site_sitemap_invariants() {
        let content = SiteContent::default();
        let sitemap = Sitemap::for_site("https://s.io/", &content, now());
        assert_eq!(
            sitemap.len(),
            5 + content.services.len() + content.projects.len()
        );
        for entry in sitemap.entries() {
            assert!((0.0..=1.0).contains(&entry.priority));
            assert!(ChangeFrequency::ALL.contains(&entry.change_frequency));
            assert!(entry.url.starts_with("https://s.io/"));
        }
    }

    #[test]
    fn priorities_clamped() {
        let mut sitemap = Sitemap::new("https://s.io");
        sitemap.add("/a", ChangeFrequency::Daily, 7.0, now());
        sitemap.add("/b", ChangeFrequency::Daily, -1.0, now());
        sitemap.add("/c", ChangeFrequency::Daily, f32::NAN, now());
        let entries = sitemap.entries();
        assert!((entries[0].priority - 1.0).abs() < f32::EPSILON);
        assert!((entries[1].priority - DEFAULT_PRIORITY).abs() < f32::EPSILON);
        assert!(entries[2].priority.abs() < f32::EPSILON);
    }

    #[test]
    fn ties_ordered_by_url() {
        let mut sitemap = Sitemap::new("https://s.io");
        sitemap.add("/zeta", ChangeFrequency::Monthly, 0.5, now());
        sitemap.add("/alpha", ChangeFrequency::Monthly, 0.5, now());
        let urls: Vec<_> = sitemap.entries().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["https://s.io/alpha", "https://s.io/zeta"]);
    }

    #[test]
    fn frequency_strings() {
        let names: Vec<_> = ChangeFrequency::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec!["always", "hourly", "daily", "weekly", "monthly", "yearly", "never"]
        );
        assert_eq!(
            serde_json::to_string(&ChangeFrequency::Weekly).unwrap_or_default(),
            "\"weekly\""
        );
    }
}
