//! Full-page renderers, one per route.

use maud::{Markup, html};

use atelier_core::content::{Project, ServiceOffering, SiteContent};
use atelier_core::error::SeoError;
use atelier_core::meta::PageMeta;
use atelier_core::schema::{self, to_json_ld};

use super::PageContext;
use super::components::{breadcrumb_nav, page_shell, project_card, service_card};

/// Featured projects shown on the home page.
const HOME_FEATURED: usize = 3;

/// Wrap `body` in the page shell with the device config and JSON-LD blocks.
fn layout(
    content: &SiteContent,
    path: &str,
    meta: &PageMeta,
    ctx: &PageContext,
    json_ld: &[String],
    body: Markup,
) -> Result<Markup, SeoError> {
    let device_json = to_json_ld(&ctx.animation)?;
    Ok(page_shell(
        meta,
        &content.company,
        path,
        ctx,
        &device_json,
        json_ld,
        body,
    ))
}

/// `/`
pub fn home(content: &SiteContent, base_url: &str, ctx: &PageContext) -> Result<Markup, SeoError> {
    let company = &content.company;
    let meta = PageMeta::new(&company.name, base_url, "/", &company.tagline, &company.description)
        .with_image(base_url, &company.logo);

    let mut json_ld = vec![
        to_json_ld(&schema::organization(content, base_url))?,
        to_json_ld(&schema::local_business(content, base_url))?,
    ];
    if !content.faqs.is_empty() {
        json_ld.push(to_json_ld(&schema::faq_page(&content.faqs))?);
    }

    let hero = &content.hero;
    let body = html! {
        section class="hero" {
            div class="wrap parallax" {
                p class="eyebrow" { (hero.eyebrow) }
                h1 { (hero.headline) }
                p class="lead" { (hero.subheadline) }
                div class="actions" {
                    a class="button magnetic" href="/contact" data-track="hero_primary_cta" { (hero.primary_cta) }
                    a class="button ghost magnetic" href="/portfolio" data-track="hero_secondary_cta" { (hero.secondary_cta) }
                }
            }
        }
        section {
            div class="wrap" {
                p class="eyebrow" { "What we do" }
                h2 { "Services" }
                div class="grid" {
                    @for service in &content.services {
                        (service_card(service))
                    }
                }
            }
        }
        section {
            div class="wrap" {
                p class="eyebrow" { "Selected work" }
                h2 { "Recent projects" }
                div class="grid" {
                    @for project in content.featured_projects(HOME_FEATURED) {
                        (project_card(project))
                    }
                }
                div class="actions" {
                    a class="button ghost" href="/portfolio" data-track="home_all_work" { "See all work" }
                }
            }
        }
        @if !content.faqs.is_empty() {
            section class="faq" {
                div class="wrap" {
                    h2 { "Questions" }
                    @for faq in &content.faqs {
                        details {
                            summary { (faq.question) }
                            p { (faq.answer) }
                        }
                    }
                }
            }
        }
    };

    layout(content, "/", &meta, ctx, &json_ld, body)
}

/// `/services`
pub fn services(content: &SiteContent, base_url: &str, ctx: &PageContext) -> Result<Markup, SeoError> {
    let meta = PageMeta::new(
        &content.company.name,
        base_url,
        "/services",
        "Services",
        &format!(
            "{} services: {}.",
            content.company.name,
            content
                .services
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    );
    let trail = [("Home", "/"), ("Services", "/services")];
    let json_ld = vec![to_json_ld(&schema::breadcrumbs(base_url, &trail))?];

    let body = html! {
        section {
            div class="wrap" {
                (breadcrumb_nav(&trail))
                h1 { "Services" }
                p class="lead" { (content.company.description) }
                div class="grid" {
                    @for service in &content.services {
                        (service_card(service))
                    }
                }
            }
        }
    };

    layout(content, "/services", &meta, ctx, &json_ld, body)
}

/// `/services/{slug}`
pub fn service_detail(
    content: &SiteContent,
    service: &ServiceOffering,
    base_url: &str,
    ctx: &PageContext,
) -> Result<Markup, SeoError> {
    let path = format!("/services/{}", service.slug);
    let meta = PageMeta::new(&content.company.name, base_url, &path, &service.name, &service.summary);
    let trail = [("Home", "/"), ("Services", "/services"), (service.name.as_str(), path.as_str())];
    let json_ld = vec![
        to_json_ld(&schema::service(service, content, base_url))?,
        to_json_ld(&schema::breadcrumbs(base_url, &trail))?,
    ];
    let related = content.projects_for_service(&service.slug);

    let body = html! {
        section {
            div class="wrap" {
                (breadcrumb_nav(&trail))
                h1 { (service.name) }
                p class="lead" { (service.summary) }
                div class="prose" {
                    p { (service.description) }
                }
                h3 { "What you get" }
                ul class="deliverables" {
                    @for item in &service.deliverables {
                        li { (item) }
                    }
                }
                @if let Some(price) = &service.starting_price {
                    p class="price" { (price) }
                }
                div class="actions" {
                    a class="button magnetic" href="/contact" data-track="service_enquiry" { "Start a project" }
                }
            }
        }
        @if !related.is_empty() {
            section {
                div class="wrap" {
                    h2 { "Related work" }
                    div class="grid" {
                        @for project in related {
                            (project_card(project))
                        }
                    }
                }
            }
        }
    };

    layout(content, &path, &meta, ctx, &json_ld, body)
}

/// `/portfolio`
pub fn portfolio(content: &SiteContent, base_url: &str, ctx: &PageContext) -> Result<Markup, SeoError> {
    let meta = PageMeta::new(
        &content.company.name,
        base_url,
        "/portfolio",
        "Work",
        &format!("Selected projects by {}.", content.company.name),
    );
    let trail = [("Home", "/"), ("Work", "/portfolio")];
    let json_ld = vec![to_json_ld(&schema::breadcrumbs(base_url, &trail))?];

    let mut projects: Vec<&Project> = content.projects.iter().collect();
    projects.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.title.cmp(&b.title)));

    let body = html! {
        section {
            div class="wrap" {
                (breadcrumb_nav(&trail))
                h1 { "Work" }
                div class="grid" {
                    @for project in projects {
                        (project_card(project))
                    }
                }
            }
        }
    };

    layout(content, "/portfolio", &meta, ctx, &json_ld, body)
}

/// `/portfolio/{slug}`
pub fn project_detail(
    content: &SiteContent,
    project: &Project,
    base_url: &str,
    ctx: &PageContext,
) -> Result<Markup, SeoError> {
    let path = format!("/portfolio/{}", project.slug);
    let meta = PageMeta::new(&content.company.name, base_url, &path, &project.title, &project.summary)
        .with_image(base_url, &project.image);
    let trail = [("Home", "/"), ("Work", "/portfolio"), (project.title.as_str(), path.as_str())];
    let json_ld = vec![to_json_ld(&schema::breadcrumbs(base_url, &trail))?];

    let services: Vec<&ServiceOffering> = project
        .services
        .iter()
        .filter_map(|slug| content.service(slug))
        .collect();

    let body = html! {
        article {
            section {
                div class="wrap" {
                    (breadcrumb_nav(&trail))
                    p class="eyebrow" { (project.client) " · " (project.year) " · " (project.category) }
                    h1 { (project.title) }
                    p class="lead" { (project.summary) }
                }
            }
            div class="wrap parallax" {
                img src=(project.image) alt=(project.title) width="1600" height="1000";
            }
            section {
                div class="wrap prose" {
                    @for paragraph in &project.body {
                        p { (paragraph) }
                    }
                    @if !services.is_empty() {
                        h3 { "Services" }
                        ul class="deliverables" {
                            @for service in services {
                                li { a href={ "/services/" (service.slug) } { (service.name) } }
                            }
                        }
                    }
                    div class="actions" {
                        a class="button magnetic" href="/contact" data-track="project_enquiry" { "Work with us" }
                    }
                }
            }
        }
    };

    layout(content, &path, &meta, ctx, &json_ld, body)
}

/// `/about`
pub fn about(content: &SiteContent, base_url: &str, ctx: &PageContext) -> Result<Markup, SeoError> {
    let about = &content.about;
    let meta = PageMeta::new(
        &content.company.name,
        base_url,
        "/about",
        "Studio",
        about.story.first().map_or(&content.company.description, |s| s),
    );
    let trail = [("Home", "/"), ("Studio", "/about")];
    let json_ld = vec![
        to_json_ld(&schema::organization(content, base_url))?,
        to_json_ld(&schema::breadcrumbs(base_url, &trail))?,
    ];

    let body = html! {
        section {
            div class="wrap" {
                (breadcrumb_nav(&trail))
                h1 { (about.headline) }
                div class="prose" {
                    @for paragraph in &about.story {
                        p { (paragraph) }
                    }
                }
            }
        }
        section {
            div class="wrap" {
                h2 { "What we value" }
                div class="grid" {
                    @for value in &about.values {
                        div class="card" {
                            h3 { (value.title) }
                            p { (value.text) }
                        }
                    }
                }
            }
        }
        @if !about.team.is_empty() {
            section {
                div class="wrap" {
                    h2 { "Team" }
                    ul class="team" {
                        @for member in &about.team {
                            li { strong { (member.name) } span { (member.role) } }
                        }
                    }
                }
            }
        }
    };

    layout(content, "/about", &meta, ctx, &json_ld, body)
}

/// `/contact`
pub fn contact(content: &SiteContent, base_url: &str, ctx: &PageContext) -> Result<Markup, SeoError> {
    let company = &content.company;
    let meta = PageMeta::new(
        &company.name,
        base_url,
        "/contact",
        "Contact",
        &format!("Start a project with {}. Write to {}.", company.name, company.email),
    );
    let trail = [("Home", "/"), ("Contact", "/contact")];
    let json_ld = vec![
        to_json_ld(&schema::local_business(content, base_url))?,
        to_json_ld(&schema::breadcrumbs(base_url, &trail))?,
    ];

    let body = html! {
        section {
            div class="wrap" {
                (breadcrumb_nav(&trail))
                h1 { "Tell us about your project" }
                p class="lead" {
                    "Write to "
                    a href={ "mailto:" (company.email) } data-track="email_click" { (company.email) }
                    " or use the form below. We reply within two working days."
                }
                form id="contact-form" class="contact-form" method="post" action="/api/contact" {
                    label { "Name" input name="name" autocomplete="name" required maxlength="120"; }
                    label { "Email" input name="email" type="email" autocomplete="email" required maxlength="254"; }
                    label { "Company" input name="company" autocomplete="organization" maxlength="120"; }
                    label {
                        "Service"
                        select name="service" {
                            option value="" { "Not sure yet" }
                            @for service in &content.services {
                                option value=(service.slug) { (service.name) }
                            }
                        }
                    }
                    label { "Message" textarea name="message" required maxlength="5000" {} }
                    div class="hp" aria-hidden="true" {
                        label { "Website" input name="website" tabindex="-1" autocomplete="off"; }
                    }
                    button class="button magnetic" type="submit" { "Send enquiry" }
                    p class="form-status" role="status" {}
                }
            }
        }
    };

    layout(content, "/contact", &meta, ctx, &json_ld, body)
}
