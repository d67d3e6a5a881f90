use std::collections::HashMap;

use crate::error::{Result, TourError};
use crate::legacy::{LegacySite, LEGACY_SITES};

pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com";

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub service_role_key: String,
}

// ---------------------------------------------------------------------------
// SendGridConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
    pub api_url: String,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: None,
            from_name: None,
            api_url: DEFAULT_SENDGRID_API_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Environment-derived settings, built once per process and handed to every
/// handler. Absent and empty variables are both treated as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    pub stripe_publishable_key: Option<String>,
    pub sendgrid: SendGridConfig,
    /// Values of the per-site credential variables named in [`LEGACY_SITES`],
    /// keyed by variable name.
    pub legacy_credentials: HashMap<String, String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database = match (get("SUPABASE_URL"), get("SUPABASE_SERVICE_ROLE_KEY")) {
            (Some(url), Some(service_role_key)) => Some(DatabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                service_role_key,
            }),
            _ => None,
        };

        let sendgrid = SendGridConfig {
            api_key: get("SENDGRID_API_KEY"),
            from_email: get("SENDGRID_FROM_EMAIL"),
            from_name: get("SENDGRID_FROM_NAME"),
            api_url: get("SENDGRID_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SENDGRID_API_URL.to_string()),
        };

        let mut legacy_credentials = HashMap::new();
        for site in LEGACY_SITES {
            for var in [site.key_env, site.secret_env] {
                if let Some(value) = get(var) {
                    legacy_credentials.insert(var.to_string(), value);
                }
            }
        }

        Self {
            database,
            stripe_publishable_key: get("STRIPE_PUBLISHABLE_KEY"),
            sendgrid,
            legacy_credentials,
        }
    }

    pub fn database(&self) -> Result<&DatabaseConfig> {
        self.database
            .as_ref()
            .ok_or(TourError::MissingConfig("Database"))
    }

    /// Consumer key and secret for a legacy site, only when both are set.
    pub fn credential_pair(&self, site: &LegacySite) -> Option<(&str, &str)> {
        let key = self.legacy_credentials.get(site.key_env)?;
        let secret = self.legacy_credentials.get(site.secret_env)?;
        Some((key.as_str(), secret.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = Config::from_lookup(|_| None);
        assert!(config.database.is_none());
        assert!(config.stripe_publishable_key.is_none());
        assert_eq!(config.sendgrid.api_url, DEFAULT_SENDGRID_API_URL);
        assert!(config.legacy_credentials.is_empty());
    }

    #[test]
    fn database_requires_url_and_key() {
        let config = Config::from_lookup(lookup_from(&[("SUPABASE_URL", "https://db.test")]));
        assert!(config.database.is_none());
        assert!(matches!(
            config.database(),
            Err(TourError::MissingConfig("Database"))
        ));

        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://db.test/"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ]));
        let db = config.database().unwrap();
        assert_eq!(db.url, "https://db.test");
        assert_eq!(db.service_role_key, "service");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = Config::from_lookup(lookup_from(&[("STRIPE_PUBLISHABLE_KEY", "  ")]));
        assert!(config.stripe_publishable_key.is_none());
    }

    #[test]
    fn credential_pair_needs_both_halves() {
        let site = &LEGACY_SITES[0];
        let config = Config::from_lookup(lookup_from(&[(site.key_env, "ck_1")]));
        assert!(config.credential_pair(site).is_none());

        let config = Config::from_lookup(lookup_from(&[
            (site.key_env, "ck_1"),
            (site.secret_env, "cs_1"),
        ]));
        assert_eq!(config.credential_pair(site), Some(("ck_1", "cs_1")));
    }

    #[test]
    fn sendgrid_url_override_is_normalised() {
        let config = Config::from_lookup(lookup_from(&[(
            "SENDGRID_API_URL",
            "http://127.0.0.1:9000/",
        )]));
        assert_eq!(config.sendgrid.api_url, "http://127.0.0.1:9000");
    }
}
