//! Narrow interface over the hosted relational database.
//!
//! Operations speak in JSON rows and simple column filters, which is all the
//! handlers need. [`RestTableClient`] talks to the PostgREST endpoint of the
//! database; [`MemoryTableClient`] keeps rows in process for tests and local
//! runs.

mod memory;
mod rest;

pub use memory::{MemoryTableClient, TableOp};
pub use rest::RestTableClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type Row = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("{source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The database answered with an error; `message` is its own wording.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("expected at most one row from '{table}', found {found}")]
    MultipleRows { table: String, found: usize },

    #[error("unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(c, _) | Filter::In(c, _) => c,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(self.column()).unwrap_or(&Value::Null);
        match self {
            Filter::Eq(_, v) => cell == v,
            Filter::In(_, vs) => vs.iter().any(|v| v == cell),
        }
    }
}

// ---------------------------------------------------------------------------
// TableClient
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TableClient: Send + Sync {
    /// Rows of `table` matching every filter. `columns` is a comma-separated
    /// projection, or `*` for whole rows.
    async fn select(
        &self,
        table: &str,
        columns: &str,
        filters: &[Filter],
    ) -> Result<Vec<Row>, TableError>;

    /// Merge `patch` into every matching row and return the updated rows.
    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, TableError>;

    async fn insert(&self, table: &str, row: Row) -> Result<(), TableError>;

    async fn maybe_single(
        &self,
        table: &str,
        columns: &str,
        filters: &[Filter],
    ) -> Result<Option<Row>, TableError> {
        let mut rows = self.select(table, columns, filters).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            found => Err(TableError::MultipleRows {
                table: table.to_string(),
                found,
            }),
        }
    }
}

/// Convert a serializable record into a [`Row`].
pub fn to_row<T: serde::Serialize>(record: &T) -> Result<Row, TableError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(TableError::Decode(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        )))),
    }
}
