use std::sync::Arc;

use tour_core::config::Config;
use tour_core::error::TourError;
use tour_core::mail::SendGridClient;
use tour_core::table::{RestTableClient, TableClient};

use crate::auth::{AdminGate, SupabaseAdminGate};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub table: Option<Arc<dyn TableClient>>,
    pub mailer: SendGridClient,
    pub gate: Arc<dyn AdminGate>,
}

impl AppState {
    /// Wire production collaborators from configuration. Without database
    /// settings the table is absent and table-backed handlers answer 500.
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let table: Option<Arc<dyn TableClient>> = config
            .database
            .as_ref()
            .map(|db| {
                Arc::new(RestTableClient::with_client(http.clone(), db)) as Arc<dyn TableClient>
            });
        let gate = SupabaseAdminGate::new(http.clone(), config.database.as_ref(), table.clone());
        let mailer = SendGridClient::with_client(http, config.sendgrid.api_url.clone());

        Self {
            config: Arc::new(config),
            table,
            mailer,
            gate: Arc::new(gate),
        }
    }

    /// Replace the table used by handlers. The admin gate keeps its own.
    pub fn with_table(mut self, table: Arc<dyn TableClient>) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_gate(mut self, gate: Arc<dyn AdminGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn table(&self) -> Result<Arc<dyn TableClient>, TourError> {
        self.table.clone().ok_or(TourError::MissingConfig("Database"))
    }
}
