use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tour_core::error::TourError;

/// JSON failure envelope shared by every handler.
pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "success": false, "error": message.into() });
    (status, axum::Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(TourError::InvalidPayload(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<TourError>() {
            Some(TourError::InvalidPayload(_)) => StatusCode::BAD_REQUEST,
            Some(
                TourError::MissingConfig(_)
                | TourError::Table(_)
                | TourError::Mail(_)
                | TourError::Json(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        failure(status, self.0.to_string())
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Turns a handler panic into the usual 500 envelope.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };
    tracing::error!(%message, "handler panicked");
    failure(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tour_core::table::TableError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn invalid_payload_maps_to_400() {
        let err = AppError(TourError::InvalidPayload("nope".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_config_maps_to_500() {
        let err = AppError(TourError::MissingConfig("Database").into());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_tour_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn table_error_message_is_carried_verbatim() {
        let err: AppError = TourError::from(TableError::Upstream {
            status: 400,
            message: "relation \"orders\" does not exist".into(),
        })
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "relation \"orders\" does not exist");
    }

    #[tokio::test]
    async fn bad_request_constructor_uses_envelope() {
        let response = AppError::bad_request("Missing required fields").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn panic_payload_message_is_extracted() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "boom");

        let response = panic_response(Box::new(42_u8));
        assert_eq!(body_json(response).await["error"], "Unknown error");
    }
}
