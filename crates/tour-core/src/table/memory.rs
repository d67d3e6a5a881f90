use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::{Filter, Row, TableClient, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOp {
    Select,
    Update,
    Insert,
}

/// Table client backed by process memory. Failures can be injected per table
/// and operation to exercise upstream error paths.
#[derive(Debug, Default)]
pub struct MemoryTableClient {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    failures: Mutex<HashMap<(String, TableOp), String>>,
}

impl MemoryTableClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `table` with rows. Non-object values are ignored.
    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        {
            let mut tables = lock(&self.tables);
            let entry = tables.entry(table.to_string()).or_default();
            entry.extend(rows.into_iter().filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            }));
        }
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        lock(&self.tables).get(table).cloned().unwrap_or_default()
    }

    /// Make every subsequent `op` on `table` fail with `message`.
    pub fn fail(&self, table: &str, op: TableOp, message: impl Into<String>) {
        lock(&self.failures).insert((table.to_string(), op), message.into());
    }

    fn check(&self, table: &str, op: TableOp) -> Result<(), TableError> {
        match lock(&self.failures).get(&(table.to_string(), op)) {
            Some(message) => Err(TableError::Upstream {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn project(row: &Row, columns: &str) -> Row {
    if columns.trim() == "*" {
        return row.clone();
    }
    columns
        .split(',')
        .map(str::trim)
        .filter_map(|c| row.get(c).map(|v| (c.to_string(), v.clone())))
        .collect()
}

#[async_trait]
impl TableClient for MemoryTableClient {
    async fn select(
        &self,
        table: &str,
        columns: &str,
        filters: &[Filter],
    ) -> Result<Vec<Row>, TableError> {
        self.check(table, TableOp::Select)?;
        let tables = lock(&self.tables);
        Ok(tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| filters.iter().all(|f| f.matches(r)))
                    .map(|r| project(r, columns))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, TableError> {
        self.check(table, TableOp::Update)?;
        let mut tables = lock(&self.tables);
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut() {
                if filters.iter().all(|f| f.matches(row)) {
                    for (k, v) in &patch {
                        row.insert(k.clone(), v.clone());
                    }
                    updated.push(row.clone());
                }
            }
        }
        Ok(updated)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), TableError> {
        self.check(table, TableOp::Insert)?;
        lock(&self.tables)
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }
}
