//! Shared HTML components used across all site pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use atelier_core::content::{CompanyInfo, Project, ServiceOffering};
use atelier_core::meta::PageMeta;

use super::{PageContext, STYLESHEET_PATH};

/// Site stylesheet, served at [`STYLESHEET_PATH`].
///
/// Editorial layout, generous whitespace. Effects only switch on when the
/// bootstrap script adds the matching class to `<html>`.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#f6f4ef;--fg:#141414;--fg2:#4a4a4a;--fg3:#8a8a8a;--accent:#e4572e;--accent-hover:#c2431f;--surface:#fff;--line:rgba(20,20,20,.12);--serif:"Fraunces",Georgia,serif}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column}
a{color:inherit}
img{max-width:100%;height:auto;display:block}
.wrap{width:100%;max-width:1120px;margin:0 auto;padding:0 1.5rem}

.site-header{padding:1.25rem 0;border-bottom:1px solid var(--line)}
.site-header .wrap{display:flex;align-items:center;justify-content:space-between;gap:1rem}
.brand{font-family:var(--serif);font-size:1.35rem;font-weight:600;text-decoration:none}
.nav{display:flex;gap:1.5rem;list-style:none;font-size:.95rem}
.nav a{text-decoration:none;color:var(--fg2)}
.nav a[aria-current=page],.nav a:hover{color:var(--fg)}

main{flex:1}
section{padding:4.5rem 0}
.eyebrow{text-transform:uppercase;letter-spacing:.12em;font-size:.78rem;color:var(--accent);font-weight:600}
h1,h2,h3{font-family:var(--serif);font-weight:600;letter-spacing:-.02em;line-height:1.15}
h1{font-size:clamp(2.4rem,6vw,4.5rem);margin:.5rem 0 1rem}
h2{font-size:clamp(1.8rem,4vw,2.6rem);margin-bottom:1.5rem}
h3{font-size:1.35rem;margin-bottom:.5rem}
.lead{font-size:1.2rem;color:var(--fg2);max-width:40rem}
.prose p{margin:1rem 0;max-width:42rem;color:var(--fg2)}

.button{display:inline-flex;align-items:center;gap:.5rem;padding:.8rem 1.4rem;border-radius:999px;background:var(--fg);color:var(--bg);text-decoration:none;font-weight:500;border:none;cursor:pointer;font-size:1rem;transition:background .15s,transform .2s}
.button:hover{background:var(--accent)}
.button.ghost{background:transparent;color:var(--fg);border:1px solid var(--line)}
.actions{display:flex;gap:1rem;flex-wrap:wrap;margin-top:2rem}

.grid{display:grid;gap:1.5rem;grid-template-columns:repeat(auto-fill,minmax(280px,1fr))}
.card{background:var(--surface);border-radius:16px;padding:1.75rem;text-decoration:none;display:block;transition:transform .2s}
.card:hover{transform:translateY(-3px)}
.card p{color:var(--fg2)}
.card .meta{font-size:.85rem;color:var(--fg3);margin-bottom:.5rem}
.card img{border-radius:10px;margin-bottom:1rem;aspect-ratio:4/3;object-fit:cover;width:100%}
.price{margin-top:1rem;font-weight:600}
.deliverables{margin:1rem 0 0 1.2rem;color:var(--fg2)}

.crumbs{font-size:.85rem;color:var(--fg3);margin-bottom:1rem}
.crumbs a{color:var(--fg3)}

.faq details{border-top:1px solid var(--line);padding:1.1rem 0}
.faq summary{cursor:pointer;font-weight:600;font-size:1.05rem}
.faq details p{margin-top:.75rem;color:var(--fg2);max-width:42rem}

.team{list-style:none;display:grid;gap:1rem;grid-template-columns:repeat(auto-fill,minmax(200px,1fr))}
.team li span{display:block;color:var(--fg3);font-size:.9rem}

.contact-form{display:grid;gap:1rem;max-width:36rem}
.contact-form label{display:grid;gap:.35rem;font-weight:500}
.contact-form input,.contact-form textarea,.contact-form select{font:inherit;padding:.7rem .9rem;border:1px solid var(--line);border-radius:10px;background:var(--surface)}
.contact-form textarea{min-height:9rem;resize:vertical}
.contact-form .hp{position:absolute;left:-10000px;width:1px;height:1px;overflow:hidden}
.form-status{min-height:1.5rem;color:var(--fg2)}

.site-footer{padding:2.5rem 0;border-top:1px solid var(--line);font-size:.9rem;color:var(--fg3)}
.site-footer .wrap{display:flex;justify-content:space-between;gap:1rem;flex-wrap:wrap}
.site-footer a{color:var(--fg2)}

.error-page{max-width:32rem;margin:18vh auto;padding:0 1.5rem;text-align:center}
.error-page p{color:var(--fg2);margin:1rem 0 2rem}

.fx-parallax .parallax{will-change:transform}
.magnetic{transition:transform .25s ease-out}
@media(prefers-reduced-motion:reduce){*{transition:none!important;animation:none!important}}
@media(max-width:720px){.nav{gap:.9rem;font-size:.85rem}section{padding:3rem 0}}
@media(prefers-color-scheme:dark){
:root{--bg:#111110;--fg:#f1efe9;--fg2:#b9b6ad;--fg3:#7d7a73;--surface:#1b1b19;--line:rgba(241,239,233,.14)}
.button{background:var(--fg);color:var(--bg)}
}
"#;

/// Critical above-the-fold rules inlined into every page.
const CRITICAL_CSS: &str = "html{background:#f6f4ef}@media(prefers-color-scheme:dark){html{background:#111110}}";

/// Client bootstrap: applies the device config, samples frame timings,
/// batches analytics events and drives the contact form.
const BOOTSTRAP_JS: &str = r#"
(function(){
"use strict";
var el=document.getElementById("device-config");
var cfg={};try{cfg=JSON.parse(el?el.textContent:"{}");}catch(e){}
var root=document.documentElement;
var csrfMeta=document.querySelector('meta[name="csrf-token"]');
var csrf=csrfMeta?csrfMeta.getAttribute("content"):"";
function apply(c){root.dataset.tier=c.tier||"low";root.classList.toggle("fx-parallax",!!c.parallax);}
apply(cfg);

var queue=[],session=Math.random().toString(36).slice(2);
function flush(){
 if(!queue.length)return;
 var body=JSON.stringify({events:queue.splice(0,queue.length)});
 if(navigator.sendBeacon&&navigator.sendBeacon("/api/analytics",new Blob([body],{type:"application/json"})))return;
 fetch("/api/analytics",{method:"POST",headers:{"content-type":"application/json"},body:body,keepalive:true}).catch(function(){});
}
function track(name,props){
 queue.push({name:name,path:location.pathname,session_id:session,properties:props||{}});
 if(queue.length>=(cfg.analyticsBatchSize||10))flush();
}
setInterval(flush,cfg.analyticsFlushIntervalMs||15000);
document.addEventListener("visibilitychange",function(){if(document.visibilityState==="hidden")flush();});
document.addEventListener("click",function(e){
 var t=e.target.closest("[data-track]");
 if(t)track(t.dataset.track,{href:t.getAttribute("href")||""});
});
track("page_view",{tier:cfg.tier||"low"});

var frames=[],last=0,want=cfg.frameSampleSize||120;
function sample(ts){
 if(last)frames.push(ts-last);
 last=ts;
 if(frames.length<want){requestAnimationFrame(sample);return;}
 fetch("/api/device-config",{method:"POST",headers:{"content-type":"application/json","x-csrf-token":csrf},body:JSON.stringify({tier:cfg.tier,frameTimesMs:frames})})
  .then(function(r){return r.ok?r.json():null;})
  .then(function(next){if(next&&next.tier!==cfg.tier){cfg=next;apply(next);track("tier_downgrade",{tier:next.tier});}})
  .catch(function(){});
}
if(cfg.tier&&cfg.tier!=="low"&&!window.matchMedia("(prefers-reduced-motion: reduce)").matches)requestAnimationFrame(sample);

if(cfg.magneticCursor){
 document.querySelectorAll(".magnetic").forEach(function(m){
  m.addEventListener("mousemove",function(e){
   if(!cfg.magneticCursor)return;
   var r=m.getBoundingClientRect();
   m.style.transform="translate("+((e.clientX-r.left-r.width/2)*.25)+"px,"+((e.clientY-r.top-r.height/2)*.25)+"px)";
  });
  m.addEventListener("mouseleave",function(){m.style.transform="";});
 });
}
if(cfg.parallax){
 var layers=document.querySelectorAll(".parallax");
 window.addEventListener("scroll",function(){
  if(!root.classList.contains("fx-parallax"))return;
  var y=window.scrollY;
  layers.forEach(function(l){l.style.transform="translateY("+(y*.15)+"px)";});
 },{passive:true});
}

var form=document.getElementById("contact-form");
if(form){
 form.addEventListener("submit",function(e){
  e.preventDefault();
  var status=form.querySelector(".form-status");
  var data={};new FormData(form).forEach(function(v,k){data[k]=v;});
  fetch("/api/contact",{method:"POST",headers:{"content-type":"application/json","x-csrf-token":csrf},body:JSON.stringify(data)})
   .then(function(r){return r.json().then(function(b){return{ok:r.ok,body:b};});})
   .then(function(res){status.textContent=res.body.message||"";if(res.ok){form.reset();track("contact_submitted",{});}})
   .catch(function(){status.textContent="Something went wrong. Please email us instead.";});
 });
}
})();
"#;

/// Render the full HTML page shell with `<head>`, OG tags, structured data
/// and body content.
pub fn page_shell(
    meta: &PageMeta,
    company: &CompanyInfo,
    active_path: &str,
    ctx: &PageContext,
    device_json: &str,
    json_ld: &[String],
    body_content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" data-tier=(tier_name(ctx)) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                meta name="robots" content=(meta.robots);
                link rel="canonical" href=(meta.canonical_url);
                meta name="csrf-token" content=(ctx.csrf_token);

                // Open Graph
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                meta property="og:url" content=(meta.canonical_url);
                meta property="og:site_name" content=(company.name);
                meta property="og:type" content=(meta.og_type);
                @if let Some(image) = &meta.og_image {
                    meta property="og:image" content=(image);
                }

                // Twitter Card
                meta name="twitter:card" content=(if meta.og_image.is_some() { "summary_large_image" } else { "summary" });
                meta name="twitter:title" content=(meta.title);
                meta name="twitter:description" content=(meta.description);

                link rel="stylesheet" href=(STYLESHEET_PATH);
                style nonce=(ctx.nonce) { (PreEscaped(CRITICAL_CSS)) }

                @for block in json_ld {
                    script type="application/ld+json" nonce=(ctx.nonce) { (PreEscaped(block)) }
                }
                script id="device-config" type="application/json" nonce=(ctx.nonce) { (PreEscaped(device_json)) }
            }
            body {
                (site_header(company, active_path))
                main { (body_content) }
                (site_footer(company))
                script nonce=(ctx.nonce) { (PreEscaped(BOOTSTRAP_JS)) }
            }
        }
    }
}

fn tier_name(ctx: &PageContext) -> &'static str {
    match ctx.animation.tier {
        atelier_core::device::DeviceTier::Low => "low",
        atelier_core::device::DeviceTier::Mid => "mid",
        atelier_core::device::DeviceTier::High => "high",
    }
}

const NAV: [(&str, &str); 4] = [
    ("/services", "Services"),
    ("/portfolio", "Work"),
    ("/about", "Studio"),
    ("/contact", "Contact"),
];

/// Site header with primary navigation.
pub fn site_header(company: &CompanyInfo, active_path: &str) -> Markup {
    html! {
        header class="site-header" {
            div class="wrap" {
                a class="brand" href="/" { (company.name) }
                nav aria-label="Primary" {
                    ul class="nav" {
                        @for (href, label) in NAV {
                            li {
                                @if active_path == href || active_path.starts_with(&format!("{href}/")) {
                                    a href=(href) aria-current="page" { (label) }
                                } @else {
                                    a href=(href) { (label) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Site footer with contact details.
pub fn site_footer(company: &CompanyInfo) -> Markup {
    html! {
        footer class="site-footer" {
            div class="wrap" {
                div {
                    strong { (company.name) }
                    " · " (company.tagline)
                    br;
                    (company.address.street) ", " (company.address.postal_code) " " (company.address.locality)
                }
                div {
                    a href={ "mailto:" (company.email) } data-track="email_click" { (company.email) }
                    br;
                    a href={ "tel:" (company.telephone.replace(' ', "")) } data-track="phone_click" { (company.telephone) }
                    @for link in &company.social {
                        " · "
                        a href=(link) rel="me noopener" { (social_label(link)) }
                    }
                }
            }
        }
    }
}

/// Short display name for a social profile URL.
fn social_label(url: &str) -> &str {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .split(['.', '/'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
}

/// Visible breadcrumb trail; the last entry is the current page.
pub fn breadcrumb_nav(trail: &[(&str, &str)]) -> Markup {
    html! {
        nav class="crumbs" aria-label="Breadcrumb" {
            @for (i, (name, path)) in trail.iter().enumerate() {
                @if i > 0 { " / " }
                @if i + 1 == trail.len() {
                    span aria-current="page" { (name) }
                } @else {
                    a href=(path) { (name) }
                }
            }
        }
    }
}

/// Card linking to a service page.
pub fn service_card(service: &ServiceOffering) -> Markup {
    html! {
        a class="card" href={ "/services/" (service.slug) } data-track="service_card_click" {
            h3 { (service.name) }
            p { (service.summary) }
            @if let Some(price) = &service.starting_price {
                p class="price" { (price) }
            }
        }
    }
}

/// Card linking to a case study.
pub fn project_card(project: &Project) -> Markup {
    html! {
        a class="card" href={ "/portfolio/" (project.slug) } data-track="project_card_click" {
            img src=(project.image) alt=(project.title) loading="lazy" width="800" height="600";
            p class="meta" { (project.client) " · " (project.year) " · " (project.category) }
            h3 { (project.title) }
            p { (project.summary) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn social_labels() {
        assert_eq!(social_label("https://www.instagram.com/northlight"), "instagram");
        assert_eq!(social_label("https://dribbble.com/northlight"), "dribbble");
        assert_eq!(social_label(""), "");
    }

    #[test]
    fn breadcrumbs_mark_current_page() {
        let html = breadcrumb_nav(&[("Home", "/"), ("Work", "/portfolio")]).into_string();
        assert!(html.contains(r#"<a href="/">Home</a>"#));
        assert!(html.contains(r#"<span aria-current="page">Work</span>"#));
    }

    #[test]
    fn header_marks_active_section() {
        let company = atelier_core::content::SiteContent::default().company;
        let html = site_header(&company, "/services/web-design").into_string();
        assert!(html.contains(r#"<a href="/services" aria-current="page">Services</a>"#));
        assert!(!html.contains(r#"<a href="/portfolio" aria-current="page">"#));
    }
}
