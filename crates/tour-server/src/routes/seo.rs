use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tour_core::seo;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct DomainParams {
    pub domain: Option<String>,
}

/// Hostname the document is generated for: explicit `domain` parameter, then
/// the first `x-forwarded-host` entry, then the request's own host. Ports are
/// dropped from header-derived hosts.
pub fn resolve_hostname(params: &DomainParams, headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    if let Some(domain) = params.domain.as_deref().and_then(non_empty) {
        return Some(domain);
    }

    let forwarded = headers
        .get("x-forwarded-host")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(without_port)
        .and_then(non_empty);
    if forwarded.is_some() {
        return forwarded;
    }

    let host = uri.host().map(str::to_string).or_else(|| {
        headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(|v| without_port(v).to_string())
    });
    host.as_deref().and_then(non_empty)
}

fn without_port(host: &str) -> &str {
    let host = host.trim();
    match host.rsplit_once(':') {
        Some((name, port))
            if port.bytes().all(|b| b.is_ascii_digit())
                && (name.ends_with(']') || !name.contains(':')) =>
        {
            name
        }
        _ => host,
    }
}

fn require_hostname(
    params: &DomainParams,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<String, AppError> {
    resolve_hostname(params, headers, uri)
        .ok_or_else(|| AppError::bad_request("Unable to determine domain"))
}

/// GET /robots.txt: crawler policy for the requesting domain.
pub async fn robots_txt(
    Query(params): Query<DomainParams>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, AppError> {
    let hostname = require_hostname(&params, &headers, &uri)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, seo::CACHE_CONTROL),
        ],
        seo::robots_txt(&hostname),
    )
        .into_response())
}

/// GET /sitemap.xml: sitemap for a domain with an active landing page.
pub async fn sitemap_xml(
    State(app): State<AppState>,
    Query(params): Query<DomainParams>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, AppError> {
    let hostname = require_hostname(&params, &headers, &uri)?;
    let table = app.table()?;

    if seo::find_active_landing_page(table.as_ref(), &hostname)
        .await?
        .is_none()
    {
        tracing::warn!(%hostname, "sitemap requested for unknown domain");
        return Ok((
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("No active tour found for domain: {hostname}"),
        )
            .into_response());
    }

    let today = chrono::Utc::now().date_naive();
    Ok((
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (header::CACHE_CONTROL, seo::CACHE_CONTROL),
        ],
        seo::sitemap_xml(&hostname, today),
    )
        .into_response())
}
