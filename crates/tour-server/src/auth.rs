//! Admin authorization for maintenance endpoints.
//!
//! A gate inspects the request headers and either yields the caller's
//! identity or a ready-made denial response that the handler returns as-is.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::Response;
use serde::Deserialize;
use tour_core::config::DatabaseConfig;
use tour_core::models::USER_ROLES_TABLE;
use tour_core::table::{Filter, TableClient};

use crate::error::failure;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminIdentity {
    #[serde(rename = "id")]
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

pub enum GateOutcome {
    Authorized(AdminIdentity),
    Denied(Response),
}

#[async_trait]
pub trait AdminGate: Send + Sync {
    async fn authorize(&self, headers: &HeaderMap) -> GateOutcome;
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// ---------------------------------------------------------------------------
// SupabaseAdminGate
// ---------------------------------------------------------------------------

/// Resolves the bearer token against the auth service, then requires an
/// `admin` row for that user in the roles table.
pub struct SupabaseAdminGate {
    http: reqwest::Client,
    database: Option<DatabaseConfig>,
    table: Option<Arc<dyn TableClient>>,
}

impl SupabaseAdminGate {
    pub fn new(
        http: reqwest::Client,
        database: Option<&DatabaseConfig>,
        table: Option<Arc<dyn TableClient>>,
    ) -> Self {
        Self {
            http,
            database: database.cloned(),
            table,
        }
    }

    async fn lookup_user(
        &self,
        db: &DatabaseConfig,
        token: &str,
    ) -> Result<AdminIdentity, Response> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", db.url))
            .header("apikey", &db.service_role_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "auth service unreachable");
                failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "token rejected by auth service");
            return Err(failure(StatusCode::UNAUTHORIZED, "Invalid or expired token"));
        }

        response
            .json::<AdminIdentity>()
            .await
            .map_err(|_| failure(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

#[async_trait]
impl AdminGate for SupabaseAdminGate {
    async fn authorize(&self, headers: &HeaderMap) -> GateOutcome {
        let (Some(db), Some(table)) = (&self.database, &self.table) else {
            return GateOutcome::Denied(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database not configured",
            ));
        };

        let Some(token) = bearer_token(headers) else {
            return GateOutcome::Denied(failure(
                StatusCode::UNAUTHORIZED,
                "Missing authorization header",
            ));
        };

        let identity = match self.lookup_user(db, token).await {
            Ok(identity) => identity,
            Err(denied) => return GateOutcome::Denied(denied),
        };

        let role = table
            .maybe_single(
                USER_ROLES_TABLE,
                "role",
                &[
                    Filter::eq("user_id", identity.user_id.as_str()),
                    Filter::eq("role", "admin"),
                ],
            )
            .await;

        match role {
            Ok(Some(_)) => GateOutcome::Authorized(identity),
            Ok(None) => {
                tracing::warn!(user_id = %identity.user_id, "non-admin attempted admin action");
                GateOutcome::Denied(failure(StatusCode::FORBIDDEN, "Admin access required"))
            }
            Err(e) => {
                GateOutcome::Denied(failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;
    use tour_core::table::MemoryTableClient;

    fn headers(auth: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        h
    }

    fn gate(url: &str, table: MemoryTableClient) -> SupabaseAdminGate {
        let db = DatabaseConfig {
            url: url.to_string(),
            service_role_key: "service".to_string(),
        };
        SupabaseAdminGate::new(reqwest::Client::new(), Some(&db), Some(Arc::new(table)))
    }

    fn status(outcome: GateOutcome) -> StatusCode {
        match outcome {
            GateOutcome::Authorized(_) => StatusCode::OK,
            GateOutcome::Denied(r) => r.status(),
        }
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer  abc ")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn unconfigured_gate_denies_with_500() {
        let gate = SupabaseAdminGate::new(reqwest::Client::new(), None, None);
        assert_eq!(
            status(gate.authorize(&headers("Bearer t")).await),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let gate = gate("http://127.0.0.1:1", MemoryTableClient::new());
        assert_eq!(
            status(gate.authorize(&HeaderMap::new()).await),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn rejected_token_is_401() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/auth/v1/user")
            .with_status(401)
            .create_async()
            .await;
        let gate = gate(&server.url(), MemoryTableClient::new());
        assert_eq!(
            status(gate.authorize(&headers("Bearer expired")).await),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn user_without_admin_role_is_403() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/auth/v1/user")
            .match_header("authorization", "Bearer good")
            .with_status(200)
            .with_body(r#"{"id":"u-1","email":"guide@tours.example"}"#)
            .create_async()
            .await;
        let table = MemoryTableClient::new().with_rows(
            USER_ROLES_TABLE,
            vec![json!({ "user_id": "u-1", "role": "guide" })],
        );
        let gate = gate(&server.url(), table);
        assert_eq!(
            status(gate.authorize(&headers("Bearer good")).await),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn admin_is_authorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/auth/v1/user")
            .match_header("apikey", "service")
            .with_status(200)
            .with_body(r#"{"id":"u-9","email":"ops@tours.example"}"#)
            .create_async()
            .await;
        let table = MemoryTableClient::new().with_rows(
            USER_ROLES_TABLE,
            vec![json!({ "user_id": "u-9", "role": "admin" })],
        );
        match gate(&server.url(), table)
            .authorize(&headers("Bearer good"))
            .await
        {
            GateOutcome::Authorized(identity) => {
                assert_eq!(identity.user_id, "u-9");
                assert_eq!(identity.email.as_deref(), Some("ops@tours.example"));
            }
            GateOutcome::Denied(r) => panic!("denied with {}", r.status()),
        }
    }
}
