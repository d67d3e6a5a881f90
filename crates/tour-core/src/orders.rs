use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::{OrderStatus, ORDERS_TABLE};
use crate::table::{Filter, Row, TableClient};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub message: String,
    pub total_fixed: usize,
}

/// Rewrite every order still carrying the legacy `complete` status to
/// `completed`. The update is one batched call over the matched ids, so a
/// second run finds nothing to do.
pub async fn normalize_statuses(table: &dyn TableClient) -> Result<NormalizeReport> {
    let stale = table
        .select(
            ORDERS_TABLE,
            "id",
            &[Filter::eq("status", OrderStatus::Complete.as_str())],
        )
        .await?;

    let ids: Vec<Value> = stale
        .into_iter()
        .filter_map(|mut row| row.remove("id"))
        .collect();

    if ids.is_empty() {
        tracing::info!("no orders with legacy status found");
        return Ok(NormalizeReport {
            message: "No orders to fix".to_string(),
            total_fixed: 0,
        });
    }

    let mut patch = Row::new();
    patch.insert(
        "status".to_string(),
        Value::from(OrderStatus::Completed.as_str()),
    );
    table
        .update(ORDERS_TABLE, &[Filter::In("id".to_string(), ids.clone())], patch)
        .await?;

    let total_fixed = ids.len();
    tracing::info!(total_fixed, "normalized legacy order statuses");
    Ok(NormalizeReport {
        message: format!("Fixed {total_fixed} orders with status 'complete' to 'completed'"),
        total_fixed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TourError;
    use crate::table::{MemoryTableClient, TableOp};
    use serde_json::json;

    fn orders() -> MemoryTableClient {
        MemoryTableClient::new().with_rows(
            ORDERS_TABLE,
            vec![
                json!({ "id": "o-1", "status": "complete" }),
                json!({ "id": "o-2", "status": "pending" }),
                json!({ "id": "o-3", "status": "complete" }),
                json!({ "id": "o-4", "status": "completed" }),
            ],
        )
    }

    #[tokio::test]
    async fn nothing_to_fix_reports_zero() {
        let table = MemoryTableClient::new()
            .with_rows(ORDERS_TABLE, vec![json!({ "id": "o-1", "status": "pending" })]);
        let report = normalize_statuses(&table).await.unwrap();
        assert_eq!(report.total_fixed, 0);
        assert_eq!(report.message, "No orders to fix");
    }

    #[tokio::test]
    async fn legacy_rows_become_completed() {
        let table = orders();
        let report = normalize_statuses(&table).await.unwrap();
        assert_eq!(report.total_fixed, 2);

        let statuses: Vec<_> = table
            .rows(ORDERS_TABLE)
            .iter()
            .map(|r| r["status"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(statuses, ["completed", "pending", "completed", "completed"]);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let table = orders();
        normalize_statuses(&table).await.unwrap();
        let again = normalize_statuses(&table).await.unwrap();
        assert_eq!(again.total_fixed, 0);
    }

    #[tokio::test]
    async fn update_failure_is_surfaced() {
        let table = orders();
        table.fail(ORDERS_TABLE, TableOp::Update, "update blocked by policy");
        let err = normalize_statuses(&table).await.unwrap_err();
        assert!(matches!(err, TourError::Table(_)));
        assert_eq!(err.to_string(), "update blocked by policy");
    }
}
