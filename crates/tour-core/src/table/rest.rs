use async_trait::async_trait;
use serde_json::Value;

use super::{Filter, Row, TableClient, TableError};
use crate::config::DatabaseConfig;

/// PostgREST client authenticated with the service-role key.
#[derive(Clone)]
pub struct RestTableClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl RestTableClient {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &DatabaseConfig) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_role_key.clone(),
        }
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, TableError> {
        let response = req
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|source| TableError::Transport { source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TableError::Upstream {
            status: status.as_u16(),
            message: upstream_message(status.as_u16(), &body),
        })
    }
}

/// PostgREST errors are `{ "message": ... }`; anything else is passed on raw.
fn upstream_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    if body.trim().is_empty() {
        format!("database request failed with HTTP {status}")
    } else {
        body.to_string()
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn list_item(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        other => other.to_string(),
    }
}

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| match f {
            Filter::Eq(col, Value::Null) => (col.clone(), "is.null".to_string()),
            Filter::Eq(col, v) => (col.clone(), format!("eq.{}", scalar(v))),
            Filter::In(col, vs) => {
                let items: Vec<String> = vs.iter().map(list_item).collect();
                (col.clone(), format!("in.({})", items.join(",")))
            }
        })
        .collect()
}

#[async_trait]
impl TableClient for RestTableClient {
    async fn select(
        &self,
        table: &str,
        columns: &str,
        filters: &[Filter],
    ) -> Result<Vec<Row>, TableError> {
        let mut params = vec![("select".to_string(), columns.to_string())];
        params.extend(filter_params(filters));

        let response = self
            .send(self.http.get(self.endpoint(table)).query(&params))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TableError::Transport { source })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, TableError> {
        let response = self
            .send(
                self.http
                    .patch(self.endpoint(table))
                    .query(&filter_params(filters))
                    .header("Prefer", "return=representation")
                    .json(&patch),
            )
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TableError::Transport { source })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), TableError> {
        self.send(
            self.http
                .post(self.endpoint(table))
                .header("Prefer", "return=minimal")
                .json(&row),
        )
        .await?;
        Ok(())
    }
}
