//! Site content model.
//!
//! Plain content records consumed directly by the page templates and the
//! SEO generators. The studio's own copy ships as [`SiteContent::default`];
//! a JSON file with the same shape can replace it at startup.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Everything the site renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub company: CompanyInfo,
    pub hero: Hero,
    pub services: Vec<ServiceOffering>,
    pub projects: Vec<Project>,
    pub about: About,
    #[serde(default)]
    pub faqs: Vec<Faq>,
}

/// Company identity, used for the footer and for structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub legal_name: String,
    pub tagline: String,
    pub description: String,
    pub email: String,
    pub telephone: String,
    pub address: Address,
    #[serde(default)]
    pub geo: Option<Geo>,
    /// schema.org `openingHours` strings, e.g. `Mo-Fr 09:00-18:00`.
    #[serde(default)]
    pub opening_hours: Vec<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    /// Profile URLs (`sameAs`).
    #[serde(default)]
    pub social: Vec<String>,
    /// Site-relative logo path.
    pub logo: String,
    pub founding_year: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub locality: String,
    pub region: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2.
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub eyebrow: String,
    pub headline: String,
    pub subheadline: String,
    pub primary_cta: String,
    pub secondary_cta: String,
}

/// A service line offered by the studio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub slug: String,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub deliverables: Vec<String>,
    /// Display string, e.g. `From €8,000`.
    #[serde(default)]
    pub starting_price: Option<String>,
}

/// A portfolio case study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub client: String,
    pub year: u16,
    pub category: String,
    pub summary: String,
    pub body: Vec<String>,
    pub image: String,
    /// Slugs of the services involved.
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub headline: String,
    pub story: Vec<String>,
    pub values: Vec<StudioValue>,
    pub team: Vec<TeamMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioValue {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl SiteContent {
    /// Load content from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the file cannot be read, parsed, or
    /// fails [`SiteContent::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io {
            path: shown.clone(),
            reason: e.to_string(),
        })?;

        let content: Self = serde_json::from_str(&raw).map_err(|e| ContentError::Parse {
            path: shown.clone(),
            reason: e.to_string(),
        })?;

        content.validate()?;
        tracing::info!(
            path = %shown,
            services = content.services.len(),
            projects = content.projects.len(),
            "site content loaded"
        );
        Ok(content)
    }

    /// Check content invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Invalid`] for an empty company name, empty or
    /// duplicate slugs, or a project referencing an unknown service.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.company.name.trim().is_empty() {
            return Err(invalid("company name is empty"));
        }

        let mut service_slugs = HashSet::new();
        for service in &self.services {
            check_slug(&service.slug)?;
            if !service_slugs.insert(service.slug.as_str()) {
                return Err(invalid(&format!("duplicate service slug '{}'", service.slug)));
            }
        }

        let mut project_slugs = HashSet::new();
        for project in &self.projects {
            check_slug(&project.slug)?;
            if !project_slugs.insert(project.slug.as_str()) {
                return Err(invalid(&format!("duplicate project slug '{}'", project.slug)));
            }
            if let Some(unknown) = project
                .services
                .iter()
                .find(|s| !service_slugs.contains(s.as_str()))
            {
                return Err(invalid(&format!(
                    "project '{}' references unknown service '{unknown}'",
                    project.slug
                )));
            }
        }
        Ok(())
    }

    /// Look up a service by slug.
    #[must_use]
    pub fn service(&self, slug: &str) -> Option<&ServiceOffering> {
        self.services.iter().find(|s| s.slug == slug)
    }

    /// Look up a project by slug.
    #[must_use]
    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// Up to `n` projects for the home page, featured ones first, newest first.
    #[must_use]
    pub fn featured_projects(&self, n: usize) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.iter().collect();
        projects.sort_by(|a, b| b.featured.cmp(&a.featured).then(b.year.cmp(&a.year)));
        projects.truncate(n);
        projects
    }

    /// Projects that used the service `slug`.
    #[must_use]
    pub fn projects_for_service(&self, slug: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.services.iter().any(|s| s == slug))
            .collect()
    }
}

fn invalid(reason: &str) -> ContentError {
    ContentError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Slugs become URL path segments: lowercase ASCII, digits and dashes.
fn check_slug(slug: &str) -> Result<(), ContentError> {
    let ok = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(invalid(&format!("invalid slug '{slug}'")))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            company: CompanyInfo {
                name: "Northlight Studio".to_owned(),
                legal_name: "Northlight Studio Lda.".to_owned(),
                tagline: "Brand, digital and motion for companies that want to be remembered."
                    .to_owned(),
                description: "Northlight is an independent creative studio crafting brand identities, websites and motion design for ambitious companies.".to_owned(),
                email: "hello@northlight.studio".to_owned(),
                telephone: "+351 21 000 0000".to_owned(),
                address: Address {
                    street: "Rua da Boavista 72".to_owned(),
                    locality: "Lisboa".to_owned(),
                    region: "Lisboa".to_owned(),
                    postal_code: "1200-066".to_owned(),
                    country: "PT".to_owned(),
                },
                geo: Some(Geo {
                    latitude: 38.7077,
                    longitude: -9.1497,
                }),
                opening_hours: strings(&["Mo-Fr 09:30-18:30"]),
                price_range: Some("€€€".to_owned()),
                social: strings(&[
                    "https://www.instagram.com/northlight.studio",
                    "https://www.linkedin.com/company/northlight-studio",
                    "https://dribbble.com/northlight",
                ]),
                logo: "/assets/logo.svg".to_owned(),
                founding_year: 2016,
            },
            hero: Hero {
                eyebrow: "Independent creative studio".to_owned(),
                headline: "We build brands people feel.".to_owned(),
                subheadline: "Strategy, identity, websites and motion, designed and engineered under one roof.".to_owned(),
                primary_cta: "Start a project".to_owned(),
                secondary_cta: "See our work".to_owned(),
            },
            services: vec![
                ServiceOffering {
                    slug: "brand-identity".to_owned(),
                    name: "Brand Identity".to_owned(),
                    summary: "Positioning, naming and visual systems that scale.".to_owned(),
                    description: "We start with research and strategy, then craft a visual language: logo, typography, colour, art direction and guidelines your team can actually use.".to_owned(),
                    deliverables: strings(&[
                        "Brand strategy workshop",
                        "Logo and identity system",
                        "Typography and colour palette",
                        "Brand guidelines",
                    ]),
                    starting_price: Some("From €12,000".to_owned()),
                },
                ServiceOffering {
                    slug: "web-design".to_owned(),
                    name: "Web Design & Development".to_owned(),
                    summary: "Fast, accessible marketing sites with character.".to_owned(),
                    description: "From information architecture to production code, we design and build websites that load fast, rank well and are a joy to use on every device.".to_owned(),
                    deliverables: strings(&[
                        "UX and content architecture",
                        "Visual and interaction design",
                        "Front-end development",
                        "SEO and performance audit",
                    ]),
                    starting_price: Some("From €18,000".to_owned()),
                },
                ServiceOffering {
                    slug: "motion-design".to_owned(),
                    name: "Motion Design".to_owned(),
                    summary: "Animation that explains, delights and sells.".to_owned(),
                    description: "Logo animations, product explainers and interface motion systems, built to feel consistent across film, social and the web.".to_owned(),
                    deliverables: strings(&[
                        "Storyboards and styleframes",
                        "2D and 3D animation",
                        "UI motion guidelines",
                    ]),
                    starting_price: Some("From €6,000".to_owned()),
                },
            ],
            projects: vec![
                Project {
                    slug: "tidewater-coffee".to_owned(),
                    title: "Tidewater Coffee".to_owned(),
                    client: "Tidewater Coffee Roasters".to_owned(),
                    year: 2024,
                    category: "Brand Identity".to_owned(),
                    summary: "A coastal roastery rebrand rooted in hand-drawn maps.".to_owned(),
                    body: strings(&[
                        "Tidewater had outgrown its farmers-market look. We mapped the coastline where the founders surf and turned it into a flexible pattern system.",
                        "The new identity rolled out across packaging, three cafés and a subscription site in under four months.",
                    ]),
                    image: "/assets/work/tidewater.jpg".to_owned(),
                    services: strings(&["brand-identity", "web-design"]),
                    featured: true,
                },
                Project {
                    slug: "orbital-labs".to_owned(),
                    title: "Orbital Labs".to_owned(),
                    client: "Orbital Labs".to_owned(),
                    year: 2023,
                    category: "Web Design & Development".to_owned(),
                    summary: "A launch site for a satellite-imaging startup.".to_owned(),
                    body: strings(&[
                        "Orbital needed to explain complex imaging technology to investors and procurement teams alike.",
                        "We built a scroll-driven narrative with real orbital data, served as a static site with a perfect performance score.",
                    ]),
                    image: "/assets/work/orbital.jpg".to_owned(),
                    services: strings(&["web-design", "motion-design"]),
                    featured: true,
                },
                Project {
                    slug: "fado-festival".to_owned(),
                    title: "Fado Nights Festival".to_owned(),
                    client: "Associação Fado Vivo".to_owned(),
                    year: 2022,
                    category: "Motion Design".to_owned(),
                    summary: "Title sequences and social motion for a music festival.".to_owned(),
                    body: strings(&[
                        "A motion identity built from hand-lettered tile patterns, animated for stage screens, trailers and social cut-downs.",
                    ]),
                    image: "/assets/work/fado.jpg".to_owned(),
                    services: strings(&["motion-design"]),
                    featured: false,
                },
            ],
            about: About {
                headline: "A small team with a long attention span.".to_owned(),
                story: strings(&[
                    "Northlight started in 2016 as two designers sharing a desk in Príncipe Real.",
                    "Today we are a team of twelve strategists, designers, engineers and animators working with clients across Europe and North America.",
                ]),
                values: vec![
                    StudioValue {
                        title: "Craft over volume".to_owned(),
                        text: "We take on a handful of projects at a time so each one gets our full attention.".to_owned(),
                    },
                    StudioValue {
                        title: "Design that ships".to_owned(),
                        text: "Designers and engineers work side by side from day one.".to_owned(),
                    },
                    StudioValue {
                        title: "Honest partnerships".to_owned(),
                        text: "Clear scopes, fixed prices and no surprises.".to_owned(),
                    },
                ],
                team: vec![
                    TeamMember {
                        name: "Inês Carvalho".to_owned(),
                        role: "Founder & Creative Director".to_owned(),
                    },
                    TeamMember {
                        name: "Tomás Reis".to_owned(),
                        role: "Technical Director".to_owned(),
                    },
                    TeamMember {
                        name: "Maya Okafor".to_owned(),
                        role: "Head of Motion".to_owned(),
                    },
                ],
            },
            faqs: vec![
                Faq {
                    question: "How long does a typical project take?".to_owned(),
                    answer: "Brand identities usually take eight to twelve weeks; websites ten to sixteen weeks depending on scope.".to_owned(),
                },
                Faq {
                    question: "Do you work with clients outside Portugal?".to_owned(),
                    answer: "Yes. Most of our clients are elsewhere in Europe or in North America, and we work remotely with regular video check-ins.".to_owned(),
                },
                Faq {
                    question: "How is pricing structured?".to_owned(),
                    answer: "We quote a fixed price per phase after a short discovery call, so you always know the total before work begins.".to_owned(),
                },
            ],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_content_is_valid() {
        SiteContent::default().validate().unwrap();
    }

    #[test]
    fn lookups_by_slug() {
        let content = SiteContent::default();
        assert_eq!(content.service("web-design").unwrap().name, "Web Design & Development");
        assert!(content.service("nope").is_none());
        assert_eq!(content.project("orbital-labs").unwrap().year, 2023);
    }

    #[test]
    fn featured_projects_ordering() {
        let content = SiteContent::default();
        let featured = content.featured_projects(2);
        assert_eq!(featured.len(), 2);
        assert!(featured.iter().all(|p| p.featured));
        assert_eq!(featured[0].slug, "tidewater-coffee");
    }

    #[test]
    fn projects_for_service_filters() {
        let content = SiteContent::default();
        let motion: Vec<_> = content
            .projects_for_service("motion-design")
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(motion, vec!["orbital-labs", "fado-festival"]);
    }

    #[test]
    fn duplicate_slug_rejected() {
        let mut content = SiteContent::default();
        let dup = content.services[0].clone();
        content.services.push(dup);
        let err = content.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate service slug"));
    }

    #[test]
    fn bad_slug_rejected() {
        let mut content = SiteContent::default();
        content.projects[0].slug = "Has Spaces".to_owned();
        assert!(matches!(
            content.validate(),
            Err(ContentError::Invalid { .. })
        ));
    }

    #[test]
    fn unknown_service_reference_rejected() {
        let mut content = SiteContent::default();
        content.projects[0].services.push("illustration".to_owned());
        let err = content.validate().unwrap_err();
        assert!(err.to_string().contains("unknown service 'illustration'"));
    }

    #[test]
    fn empty_company_name_rejected() {
        let mut content = SiteContent::default();
        content.company.name = "  ".to_owned();
        assert!(content.validate().is_err());
    }

    #[test]
    fn json_file_round_trip() {
        let mut content = SiteContent::default();
        content.company.name = "Other Studio".to_owned();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&content).unwrap().as_bytes())
            .unwrap();

        let loaded = SiteContent::from_json_file(file.path()).unwrap();
        assert_eq!(loaded.company.name, "Other Studio");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SiteContent::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(
            matches!(&err, ContentError::Io { path, .. } if path == "/definitely/not/here.json"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"company\": 42}").unwrap();
        let err = SiteContent::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }
}
