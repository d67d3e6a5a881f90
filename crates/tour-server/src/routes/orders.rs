use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::routes::success;
use crate::state::AppState;

/// POST /fix-order-status: rewrite legacy `complete` order statuses.
pub async fn fix_order_status(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let table = app.table()?;
    let report = tour_core::orders::normalize_statuses(table.as_ref()).await?;
    success(&report)
}
