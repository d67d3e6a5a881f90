pub mod credentials;
pub mod email;
pub mod health;
pub mod orders;
pub mod seo;
pub mod stripe;

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tour_core::envelope;

use crate::error::AppError;

/// OPTIONS on any route answers a bare `ok`, keeping the CORS headers the
/// inner layers attached.
pub async fn options_ok(req: Request, next: Next) -> Response {
    if req.method() != Method::OPTIONS {
        return next.run(req).await;
    }
    let (mut parts, _) = next.run(req).await.into_parts();
    parts.status = StatusCode::OK;
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    Response::from_parts(parts, Body::from("ok"))
}

/// Wrap a serializable report in the `{ "success": true, ... }` envelope.
pub(crate) fn success<T: Serialize>(report: &T) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(envelope::success(report)?))
}
