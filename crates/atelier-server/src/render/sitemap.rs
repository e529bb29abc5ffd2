//! `sitemap.xml` rendering.

use maud::{Markup, PreEscaped, html};

use atelier_core::sitemap::Sitemap;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render `sitemap` as a sitemaps.org `urlset`, highest priority first.
pub fn sitemap_xml(sitemap: &Sitemap) -> Markup {
    html! {
        (PreEscaped(XML_DECLARATION))
        urlset xmlns=(SITEMAP_NS) {
            @for entry in sitemap.entries() {
                url {
                    loc { (entry.url) }
                    lastmod { (entry.last_modified.format("%Y-%m-%d")) }
                    changefreq { (entry.change_frequency.as_str()) }
                    priority { (format!("{:.1}", entry.priority)) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::sitemap::ChangeFrequency;
    use chrono::{TimeZone, Utc};

    #[test]
    fn renders_urlset() {
        let Some(when) = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).single() else {
            return;
        };
        let mut sitemap = Sitemap::new("https://northlight.studio");
        sitemap.add("/about", ChangeFrequency::Monthly, 0.7, when);
        sitemap.add("/", ChangeFrequency::Weekly, 1.0, when);

        let xml = sitemap_xml(&sitemap).into_string();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains(
            "<url><loc>https://northlight.studio/</loc><lastmod>2026-03-14</lastmod><changefreq>weekly</changefreq><priority>1.0</priority></url>"
        ));

        let home = xml.find("<loc>https://northlight.studio/</loc>");
        let about = xml.find("<loc>https://northlight.studio/about</loc>");
        assert!(home < about);
    }

    #[test]
    fn escapes_urls() {
        let mut sitemap = Sitemap::new("https://northlight.studio");
        sitemap.add("/work/r&d", ChangeFrequency::Never, 0.1, Utc::now());
        let xml = sitemap_xml(&sitemap).into_string();
        assert!(xml.contains("<loc>https://northlight.studio/work/r&amp;d</loc>"));
    }
}
