use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::legacy::LegacySite;
use crate::models::{WooCommerceCredential, WOOCOMMERCE_CREDENTIALS_TABLE};
use crate::table::{to_row, Filter, TableClient};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationReport {
    pub message: String,
    pub imported: usize,
    pub skipped: usize,
    pub total_sites: usize,
    /// Per-site failures; `None` when every site went through cleanly.
    pub errors: Option<Vec<String>>,
}

enum SiteOutcome {
    Imported,
    Skipped,
    Failed(String),
}

/// Copy each legacy site's WooCommerce credentials from configuration into
/// the credentials table. Sites without both halves of their credential pair
/// and sites already present (by `site_name`) are skipped, so the migration
/// can be re-run safely. Per-site failures are collected, never fatal.
pub async fn migrate(
    table: &dyn TableClient,
    config: &Config,
    sites: &[LegacySite],
) -> Result<MigrationReport> {
    let mut imported = 0;
    let mut skipped = 0;
    let mut errors = Vec::new();

    for site in sites {
        match migrate_site(table, config, site).await {
            SiteOutcome::Imported => imported += 1,
            SiteOutcome::Skipped => skipped += 1,
            SiteOutcome::Failed(e) => errors.push(e),
        }
    }

    tracing::info!(
        imported,
        skipped,
        failed = errors.len(),
        total_sites = sites.len(),
        "credential migration finished"
    );

    Ok(MigrationReport {
        message: "Migration complete".to_string(),
        imported,
        skipped,
        total_sites: sites.len(),
        errors: if errors.is_empty() { None } else { Some(errors) },
    })
}

async fn migrate_site(table: &dyn TableClient, config: &Config, site: &LegacySite) -> SiteOutcome {
    let Some((consumer_key, consumer_secret)) = config.credential_pair(site) else {
        tracing::warn!(site = site.site_name, "credentials not configured, skipping");
        return SiteOutcome::Skipped;
    };

    let existing = table
        .maybe_single(
            WOOCOMMERCE_CREDENTIALS_TABLE,
            "site_name",
            &[Filter::eq("site_name", site.site_name)],
        )
        .await;
    match existing {
        Err(e) => {
            tracing::error!(site = site.site_name, error = %e, "existence check failed");
            return SiteOutcome::Failed(format!("{}: lookup failed: {e}", site.site_name));
        }
        Ok(Some(_)) => {
            tracing::info!(site = site.site_name, "already migrated, skipping");
            return SiteOutcome::Skipped;
        }
        Ok(None) => {}
    }

    let record = WooCommerceCredential {
        site_name: site.site_name.to_string(),
        tour_name: site.tour_name.to_string(),
        website_url: site.website_url.to_string(),
        api_url: site.api_url.to_string(),
        consumer_key: consumer_key.to_string(),
        consumer_secret: consumer_secret.to_string(),
        profit_margin: site.profit_margin,
        is_active: true,
    };
    let inserted = match to_row(&record) {
        Ok(row) => table.insert(WOOCOMMERCE_CREDENTIALS_TABLE, row).await,
        Err(e) => Err(e),
    };

    match inserted {
        Ok(()) => {
            tracing::info!(site = site.site_name, "imported credentials");
            SiteOutcome::Imported
        }
        Err(e) => {
            tracing::error!(site = site.site_name, error = %e, "insert failed");
            SiteOutcome::Failed(format!("{}: insert failed: {e}", site.site_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::LEGACY_SITES;
    use crate::table::{MemoryTableClient, TableOp};
    use serde_json::json;
    use std::collections::HashMap;

    fn config_with(sites: &[LegacySite]) -> Config {
        let mut vars = HashMap::new();
        for (i, site) in sites.iter().enumerate() {
            vars.insert(site.key_env.to_string(), format!("ck_{i}"));
            vars.insert(site.secret_env.to_string(), format!("cs_{i}"));
        }
        Config::from_lookup(move |name| vars.get(name).cloned())
    }

    #[tokio::test]
    async fn first_run_imports_second_run_skips() {
        let table = MemoryTableClient::new();
        let config = config_with(LEGACY_SITES);

        let first = migrate(&table, &config, LEGACY_SITES).await.unwrap();
        assert_eq!(first.imported, LEGACY_SITES.len());
        assert_eq!(first.skipped, 0);
        assert_eq!(first.total_sites, LEGACY_SITES.len());
        assert!(first.errors.is_none());

        let second = migrate(&table, &config, LEGACY_SITES).await.unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.skipped, LEGACY_SITES.len());
        assert_eq!(
            table.rows(WOOCOMMERCE_CREDENTIALS_TABLE).len(),
            LEGACY_SITES.len()
        );
    }

    #[tokio::test]
    async fn inserted_row_carries_site_details() {
        let table = MemoryTableClient::new();
        let site = LEGACY_SITES[0];
        migrate(&table, &config_with(&[site]), &[site]).await.unwrap();

        let rows = table.rows(WOOCOMMERCE_CREDENTIALS_TABLE);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["site_name"], site.site_name);
        assert_eq!(rows[0]["consumer_key"], "ck_0");
        assert_eq!(rows[0]["consumer_secret"], "cs_0");
        assert_eq!(rows[0]["is_active"], true);
        assert_eq!(rows[0]["profit_margin"], json!(site.profit_margin));
    }

    #[tokio::test]
    async fn sites_without_credentials_are_skipped() {
        let table = MemoryTableClient::new();
        let config = config_with(&LEGACY_SITES[..1]);
        let report = migrate(&table, &config, LEGACY_SITES).await.unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, LEGACY_SITES.len() - 1);
    }

    #[tokio::test]
    async fn existing_rows_are_not_duplicated() {
        let site = LEGACY_SITES[1];
        let table = MemoryTableClient::new().with_rows(
            WOOCOMMERCE_CREDENTIALS_TABLE,
            vec![json!({ "site_name": site.site_name })],
        );
        let report = migrate(&table, &config_with(&[site]), &[site]).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(table.rows(WOOCOMMERCE_CREDENTIALS_TABLE).len(), 1);
    }

    #[tokio::test]
    async fn per_site_errors_are_reported_in_band() {
        let table = MemoryTableClient::new();
        table.fail(WOOCOMMERCE_CREDENTIALS_TABLE, TableOp::Insert, "insert denied");
        let sites = &LEGACY_SITES[..2];
        let report = migrate(&table, &config_with(sites), sites).await.unwrap();

        assert_eq!(report.imported, 0);
        let errors = report.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            format!("{}: insert failed: insert denied", sites[0].site_name)
        );
    }

    #[tokio::test]
    async fn lookup_error_moves_on_to_next_site() {
        let table = MemoryTableClient::new();
        table.fail(WOOCOMMERCE_CREDENTIALS_TABLE, TableOp::Select, "timeout");
        let site = LEGACY_SITES[0];
        let report = migrate(&table, &config_with(&[site]), &[site]).await.unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 0);
        assert_eq!(
            report.errors.unwrap(),
            vec![format!("{}: lookup failed: timeout", site.site_name)]
        );
    }
}
