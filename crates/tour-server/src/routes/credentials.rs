use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use tour_core::legacy::LEGACY_SITES;

use crate::auth::GateOutcome;
use crate::error::AppError;
use crate::routes::success;
use crate::state::AppState;

/// POST /migrate-woocommerce-credentials: one-time import of legacy
/// storefront credentials. Admin only.
pub async fn migrate_credentials(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let admin = match app.gate.authorize(&headers).await {
        GateOutcome::Authorized(identity) => identity,
        GateOutcome::Denied(response) => return Ok(response),
    };
    tracing::info!(user_id = %admin.user_id, "credential migration requested");

    let table = app.table()?;
    let report =
        tour_core::credentials::migrate(table.as_ref(), &app.config, LEGACY_SITES).await?;
    Ok(success(&report)?.into_response())
}
