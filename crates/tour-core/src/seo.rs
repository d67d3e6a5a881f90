//! robots.txt and sitemap.xml documents served per tour domain.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{TourLandingPage, TOUR_LANDING_PAGES_TABLE};
use crate::table::{Filter, TableClient};

/// Paths crawlers are asked to stay out of.
pub const DISALLOWED_PATHS: &[&str] = &[
    "/admin",
    "/auth",
    "/checkout",
    "/payment-success",
    "/api/",
];

pub const CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SitemapRoute {
    pub path: &'static str,
    pub priority: f32,
    pub changefreq: ChangeFreq,
}

pub const SITEMAP_ROUTES: &[SitemapRoute] = &[
    SitemapRoute {
        path: "/",
        priority: 1.0,
        changefreq: ChangeFreq::Daily,
    },
    SitemapRoute {
        path: "/tours",
        priority: 0.9,
        changefreq: ChangeFreq::Daily,
    },
    SitemapRoute {
        path: "/booking",
        priority: 0.8,
        changefreq: ChangeFreq::Weekly,
    },
    SitemapRoute {
        path: "/about",
        priority: 0.7,
        changefreq: ChangeFreq::Monthly,
    },
    SitemapRoute {
        path: "/contact",
        priority: 0.7,
        changefreq: ChangeFreq::Monthly,
    },
    SitemapRoute {
        path: "/faq",
        priority: 0.5,
        changefreq: ChangeFreq::Monthly,
    },
];

pub fn robots_txt(hostname: &str) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n\n");
    for path in DISALLOWED_PATHS {
        out.push_str(&format!("Disallow: {path}\n"));
    }
    out.push_str(&format!("\nSitemap: https://{hostname}/sitemap.xml\n"));
    out
}

pub fn sitemap_xml(hostname: &str, lastmod: NaiveDate) -> String {
    let lastmod = lastmod.format("%Y-%m-%d");
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for route in SITEMAP_ROUTES {
        out.push_str(&format!(
            "  <url>\n    <loc>https://{}{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            xml_escape(hostname),
            route.path,
            lastmod,
            route.changefreq.as_str(),
            route.priority,
        ));
    }
    out.push_str("</urlset>\n");
    out
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// The active landing page registered for `domain`, if there is one.
pub async fn find_active_landing_page(
    table: &dyn TableClient,
    domain: &str,
) -> Result<Option<TourLandingPage>> {
    let row = table
        .maybe_single(
            TOUR_LANDING_PAGES_TABLE,
            "id,domain,is_active",
            &[Filter::eq("domain", domain), Filter::eq("is_active", true)],
        )
        .await?;
    Ok(row
        .map(|r| serde_json::from_value(serde_json::Value::Object(r)))
        .transpose()?)
}
