//! One-shot runs of the maintenance functions. Shell access to the
//! environment stands in for the admin gate.

use anyhow::Result;
use tour_core::config::Config;
use tour_core::legacy::LEGACY_SITES;
use tour_core::table::RestTableClient;

use crate::output::print_envelope;

fn table(config: &Config) -> Result<RestTableClient> {
    Ok(RestTableClient::new(config.database()?))
}

pub fn fix_order_status(config: &Config) -> Result<()> {
    let table = table(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(tour_core::orders::normalize_statuses(&table))?;
    print_envelope(&report)
}

pub fn migrate_credentials(config: &Config) -> Result<()> {
    let table = table(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(tour_core::credentials::migrate(&table, config, LEGACY_SITES))?;
    print_envelope(&report)
}
