//! Storefront configuration.
//!
//! Read from the JSON file named by `FURNMART_CONFIG`; every section is
//! optional and falls back to the built-in storefront defaults.

use anyhow::Context;
use furnmart_cart::PromoTable;
use furnmart_catalog::{CatalogConfig, SearchConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "FURNMART_CONFIG";

/// Configuration for one storefront session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Filter taxonomy, sort keys and paging
    pub catalog: CatalogConfig,
    /// Promo code table
    pub promos: PromoTable,
    /// Search debounce
    pub search: SearchConfig,
}

impl StorefrontConfig {
    /// Loads from `FURNMART_CONFIG` if set, defaults otherwise
    ///
    /// # Errors
    ///
    /// Fails if the named file cannot be read or is not a valid configuration.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                tracing::debug!("{CONFIG_ENV} not set, using defaults");
                Ok(Self::default())
            },
        }
    }

    /// Loads a JSON configuration file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config
            .catalog
            .validate()
            .with_context(|| format!("validating catalog in {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded storefront configuration");
        Ok(config)
    }
}
