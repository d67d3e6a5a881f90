use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tour_core::error::TourError;
use tour_core::mail::{EmailPayload, Sender, MISSING_FIELDS_MESSAGE};

use crate::error::AppError;
use crate::state::AppState;

/// POST /send-email: relay a transactional message through SendGrid.
///
/// A rejected send is answered with the provider's own status code and its
/// raw response body under `details`. There is no retry.
pub async fn send_email(State(app): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let payload: EmailPayload = serde_json::from_slice(&body)
        .map_err(|_| AppError::bad_request(MISSING_FIELDS_MESSAGE))?;
    let email = payload.validate()?;

    let sendgrid = &app.config.sendgrid;
    let api_key = sendgrid
        .api_key
        .as_deref()
        .ok_or(TourError::MissingConfig("SendGrid API key"))?;
    let from = Sender {
        email: sendgrid
            .from_email
            .clone()
            .ok_or(TourError::MissingConfig("SendGrid from email"))?,
        name: sendgrid.from_name.clone(),
    };

    let reply = app
        .mailer
        .send(api_key, &email, &from)
        .await
        .map_err(TourError::from)?;

    if !reply.is_success() {
        tracing::error!(status = reply.status, "email provider rejected message");
        let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
        return Ok((
            status,
            Json(serde_json::json!({
                "success": false,
                "error": "Failed to send email",
                "details": reply.body,
            })),
        )
            .into_response());
    }

    tracing::info!("email sent");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Email sent successfully",
    }))
    .into_response())
}
