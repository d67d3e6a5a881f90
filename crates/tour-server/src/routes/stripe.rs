use axum::extract::State;
use axum::Json;
use tour_core::error::TourError;

use crate::error::AppError;
use crate::state::AppState;

/// GET /get-stripe-key: hand the publishable key to the browser.
pub async fn get_stripe_key(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let key = app
        .config
        .stripe_publishable_key
        .as_deref()
        .ok_or(TourError::MissingConfig("Stripe publishable key"))?;
    Ok(Json(serde_json::json!({
        "success": true,
        "publishable_key": key,
    })))
}
