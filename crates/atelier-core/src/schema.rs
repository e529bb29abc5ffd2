//! schema.org structured data (JSON-LD).
//!
//! Each top-level type serializes with `@context` and `@type` so it can be
//! dropped straight into a `<script type="application/ld+json">` block via
//! [`to_json_ld`].

use serde::Serialize;

use crate::content::{CompanyInfo, Faq, ServiceOffering, SiteContent};
use crate::error::SeoError;
use crate::meta::{absolute_url, canonical_url};

const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub legal_name: String,
    pub url: String,
    pub logo: String,
    pub description: String,
    pub email: String,
    pub telephone: String,
    pub founding_date: String,
    pub address: PostalAddress,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalBusiness {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub url: String,
    pub image: String,
    pub telephone: String,
    pub email: String,
    pub address: PostalAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoCoordinates>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub opening_hours: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub street_address: String,
    pub address_locality: String,
    pub address_region: String,
    pub postal_code: String,
    pub address_country: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoCoordinates {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub service_type: String,
    pub description: String,
    pub url: String,
    pub provider: OrganizationRef,
    pub area_served: String,
}

/// Reference to the [`Organization`] node by `@id`.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationRef {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

/// `@id` of the organization node for `base_url`.
fn organization_id(base_url: &str) -> String {
    format!("{}#organization", canonical_url(base_url, "/"))
}

fn postal_address(company: &CompanyInfo) -> PostalAddress {
    PostalAddress {
        schema_type: "PostalAddress",
        street_address: company.address.street.clone(),
        address_locality: company.address.locality.clone(),
        address_region: company.address.region.clone(),
        postal_code: company.address.postal_code.clone(),
        address_country: company.address.country.clone(),
    }
}

#[must_use]
pub fn organization(content: &SiteContent, base_url: &str) -> Organization {
    let company = &content.company;
    Organization {
        context: SCHEMA_CONTEXT,
        schema_type: "Organization",
        id: organization_id(base_url),
        name: company.name.clone(),
        legal_name: company.legal_name.clone(),
        url: canonical_url(base_url, "/"),
        logo: absolute_url(base_url, &company.logo),
        description: company.description.clone(),
        email: company.email.clone(),
        telephone: company.telephone.clone(),
        founding_date: company.founding_year.to_string(),
        address: postal_address(company),
        same_as: company.social.clone(),
    }
}

#[must_use]
pub fn local_business(content: &SiteContent, base_url: &str) -> LocalBusiness {
    let company = &content.company;
    LocalBusiness {
        context: SCHEMA_CONTEXT,
        schema_type: "LocalBusiness",
        name: company.name.clone(),
        url: canonical_url(base_url, "/"),
        image: absolute_url(base_url, &company.logo),
        telephone: company.telephone.clone(),
        email: company.email.clone(),
        address: postal_address(company),
        geo: company.geo.map(|g| GeoCoordinates {
            schema_type: "GeoCoordinates",
            latitude: g.latitude,
            longitude: g.longitude,
        }),
        opening_hours: company.opening_hours.clone(),
        price_range: company.price_range.clone(),
    }
}

#[must_use]
pub fn faq_page(faqs: &[Faq]) -> FaqPage {
    FaqPage {
        context: SCHEMA_CONTEXT,
        schema_type: "FAQPage",
        main_entity: faqs
            .iter()
            .map(|faq| Question {
                schema_type: "Question",
                name: faq.question.clone(),
                accepted_answer: Answer {
                    schema_type: "Answer",
                    text: faq.answer.clone(),
                },
            })
            .collect(),
    }
}

#[must_use]
pub fn service(offering: &ServiceOffering, content: &SiteContent, base_url: &str) -> Service {
    Service {
        context: SCHEMA_CONTEXT,
        schema_type: "Service",
        name: offering.name.clone(),
        service_type: offering.name.clone(),
        description: offering.description.clone(),
        url: canonical_url(base_url, &format!("/services/{}", offering.slug)),
        provider: OrganizationRef {
            schema_type: "Organization",
            id: organization_id(base_url),
            name: content.company.name.clone(),
        },
        area_served: "Worldwide".to_owned(),
    }
}

/// Breadcrumb trail from `(name, path)` pairs, positions starting at 1.
#[must_use]
pub fn breadcrumbs(base_url: &str, trail: &[(&str, &str)]) -> BreadcrumbList {
    BreadcrumbList {
        context: SCHEMA_CONTEXT,
        schema_type: "BreadcrumbList",
        item_list_element: trail
            .iter()
            .enumerate()
            .map(|(i, (name, path))| ListItem {
                schema_type: "ListItem",
                position: i + 1,
                name: (*name).to_owned(),
                item: canonical_url(base_url, path),
            })
            .collect(),
    }
}

/// Serialize `value` for embedding inside a `<script>` element.
///
/// `</` is escaped as `<\/` so content cannot close the script early.
///
/// # Errors
///
/// Returns [`SeoError::Serialization`] if serde fails.
pub fn to_json_ld<T: Serialize>(value: &T) -> Result<String, SeoError> {
    let json = serde_json::to_string(value).map_err(|e| SeoError::Serialization {
        schema_type: std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("unknown")
            .to_owned(),
        reason: e.to_string(),
    })?;
    Ok(json.replace("</", "<\\/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;

    const BASE: &str = "https://northlight.studio";

    fn parse<T: Serialize>(value: &T) -> Value {
        serde_json::from_str(&to_json_ld(value).unwrap()).unwrap()
    }

    #[test]
    fn organization_fields() {
        let json = parse(&organization(&SiteContent::default(), BASE));
        assert_eq!(json["@context"], "https://schema.org");
        assert_eq!(json["@type"], "Organization");
        assert_eq!(json["@id"], "https://northlight.studio/#organization");
        assert_eq!(json["logo"], "https://northlight.studio/assets/logo.svg");
        assert_eq!(json["address"]["@type"], "PostalAddress");
        assert_eq!(json["foundingDate"], "2016");
        assert_eq!(json["sameAs"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn local_business_includes_geo_and_hours() {
        let json = parse(&local_business(&SiteContent::default(), BASE));
        assert_eq!(json["@type"], "LocalBusiness");
        assert_eq!(json["geo"]["@type"], "GeoCoordinates");
        assert_eq!(json["openingHours"][0], "Mo-Fr 09:30-18:30");
    }

    #[test]
    fn local_business_omits_missing_optional_fields() {
        let mut content = SiteContent::default();
        content.company.geo = None;
        content.company.price_range = None;
        let json = parse(&local_business(&content, BASE));
        assert!(json.get("geo").is_none());
        assert!(json.get("priceRange").is_none());
    }

    #[test]
    fn faq_page_structure() {
        let content = SiteContent::default();
        let json = parse(&faq_page(&content.faqs));
        assert_eq!(json["@type"], "FAQPage");
        let entities = json["mainEntity"].as_array().unwrap();
        assert_eq!(entities.len(), content.faqs.len());
        assert_eq!(entities[0]["@type"], "Question");
        assert_eq!(entities[0]["acceptedAnswer"]["@type"], "Answer");
    }

    #[test]
    fn service_references_organization() {
        let content = SiteContent::default();
        let json = parse(&service(&content.services[0], &content, BASE));
        assert_eq!(json["@type"], "Service");
        assert_eq!(json["url"], "https://northlight.studio/services/brand-identity");
        assert_eq!(json["provider"]["@id"], "https://northlight.studio/#organization");
    }

    #[test]
    fn breadcrumb_positions_start_at_one() {
        let list = breadcrumbs(BASE, &[("Home", "/"), ("Services", "/services")]);
        let json = parse(&list);
        let items = json["itemListElement"].as_array().unwrap();
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[1]["position"], 2);
        assert_eq!(items[1]["item"], "https://northlight.studio/services");
    }

    #[test]
    fn script_breakout_escaped() {
        let faqs = vec![Faq {
            question: "</script><script>alert(1)</script>".to_owned(),
            answer: "a".to_owned(),
        }];
        let out = to_json_ld(&faq_page(&faqs)).unwrap();
        assert!(!out.contains("</script>"));
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            json["mainEntity"][0]["name"],
            "</script><script>alert(1)</script>"
        );
    }
}
