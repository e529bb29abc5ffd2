//! Canonical per-page metadata (title, description, Open Graph).

use serde::Serialize;

/// Longest `<title>` search engines display without truncation.
pub const MAX_TITLE_CHARS: usize = 60;

/// Longest meta description search engines display without truncation.
pub const MAX_DESCRIPTION_CHARS: usize = 160;

/// Metadata rendered into a page's `<head>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    /// Open Graph type: `website` for the home page, `article` otherwise.
    pub og_type: &'static str,
    pub og_image: Option<String>,
    pub robots: &'static str,
}

impl PageMeta {
    /// Build metadata for the page at `path`.
    ///
    /// Titles become `"<title> | <site>"`; the home page (`/`) uses the
    /// site name alone.
    #[must_use]
    pub fn new(site_name: &str, base_url: &str, path: &str, title: &str, description: &str) -> Self {
        let path = normalize_path(path);
        let is_home = path == "/";

        let full_title = if is_home {
            site_name.to_owned()
        } else {
            format!("{title} | {site_name}")
        };

        Self {
            title: truncate_chars(&full_title, MAX_TITLE_CHARS),
            description: truncate_chars(description.trim(), MAX_DESCRIPTION_CHARS),
            canonical_url: canonical_url(base_url, &path),
            og_type: if is_home { "website" } else { "article" },
            og_image: None,
            robots: "index, follow",
        }
    }

    /// Attach an Open Graph image, resolving site-relative paths.
    #[must_use]
    pub fn with_image(mut self, base_url: &str, image: &str) -> Self {
        self.og_image = Some(absolute_url(base_url, image));
        self
    }

    /// Mark the page as excluded from search indexes.
    #[must_use]
    pub fn noindex(mut self) -> Self {
        self.robots = "noindex, nofollow";
        self
    }
}

/// Join `base_url` and a normalized `path`.
#[must_use]
pub fn canonical_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = normalize_path(path);
    if path == "/" {
        format!("{base}/")
    } else {
        format!("{base}{path}")
    }
}

/// Resolve `target` against the site unless it is already absolute.
#[must_use]
pub fn absolute_url(base_url: &str, target: &str) -> String {
    if target.starts_with("https://") || target.starts_with("http://") {
        target.to_owned()
    } else {
        canonical_url(base_url, target)
    }
}

/// Leading slash, no trailing slash (except root), no query or fragment.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Truncate to at most `max` chars, ending with `…` when cut.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_page_title_and_type() {
        let meta = PageMeta::new(
            "Northlight",
            "https://northlight.studio",
            "/",
            "Creative studio",
            "desc",
        );
        assert_eq!(meta.title, "Northlight");
        assert_eq!(meta.og_type, "website");
        assert_eq!(meta.canonical_url, "https://northlight.studio/");
    }

    #[test]
    fn inner_page_title_and_canonical() {
        let meta = PageMeta::new(
            "Northlight",
            "https://northlight.studio/",
            "/services/web-design/",
            "Web Design",
            "desc",
        );
        assert_eq!(meta.title, "Web Design | Northlight");
        assert_eq!(meta.og_type, "article");
        assert_eq!(
            meta.canonical_url,
            "https://northlight.studio/services/web-design"
        );
    }

    #[test]
    fn long_title_truncated() {
        let long = "x".repeat(100);
        let meta = PageMeta::new("Site", "https://a.b", "/p", &long, "d");
        assert_eq!(meta.title.chars().count(), MAX_TITLE_CHARS);
        assert!(meta.title.ends_with('…'));
    }

    #[test]
    fn description_truncation_respects_char_boundaries() {
        let long = "ção ".repeat(80);
        let out = truncate_chars(&long, MAX_DESCRIPTION_CHARS);
        assert!(out.chars().count() <= MAX_DESCRIPTION_CHARS);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn short_strings_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn path_normalization() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("about"), "/about");
        assert_eq!(normalize_path("/about/?ref=x"), "/about");
        assert_eq!(normalize_path("/a/b#top"), "/a/b");
    }

    #[test]
    fn images_resolved_against_base() {
        let meta = PageMeta::new("S", "https://s.io", "/x", "X", "d")
            .with_image("https://s.io", "/assets/og.jpg");
        assert_eq!(meta.og_image.as_deref(), Some("https://s.io/assets/og.jpg"));
        assert_eq!(
            absolute_url("https://s.io", "https://cdn.io/a.png"),
            "https://cdn.io/a.png"
        );
    }

    #[test]
    fn noindex_sets_robots() {
        let meta = PageMeta::new("S", "https://s.io", "/404", "Not found", "d").noindex();
        assert_eq!(meta.robots, "noindex, nofollow");
    }
}
