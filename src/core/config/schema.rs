//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$HATS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/hats/config.toml`
//! 3. `~/.hats/config.toml` (canonical location)
//!
//! # Project Config
//!
//! Located at `.hats/config.toml` in the project directory.
//!
//! # Validation
//!
//! Files are parsed permissively for values and strictly for keys, then
//! validated: page sizes must be positive, filter tables must name known
//! object types, endpoint keys must be chain ids and URLs must not be
//! empty.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::subgraph::filters::Filters;
use crate::subgraph::schema::ObjectType;

/// Filter tables as written in a file: `[filters.<type>] <relation> = N`.
pub type FilterTables = BTreeMap<String, BTreeMap<String, u32>>;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// default_chain = 10
/// page_size = 500
///
/// [endpoints]
/// 10 = "https://api.example.com/subgraphs/hats-v1-optimism"
///
/// [filters.hat]
/// wearers = 50
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Chain used when a command does not name one
    pub default_chain: Option<u64>,

    /// Default page size for relations
    pub page_size: Option<u32>,

    /// Graph index endpoint per chain id
    pub endpoints: BTreeMap<String, String>,

    /// Per-relation page size overrides
    pub filters: FilterTables,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_page_size(self.page_size)?;

        for (chain, url) in &self.endpoints {
            chain.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(format!("endpoint key '{}' is not a chain id", chain))
            })?;
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "endpoint for chain {} cannot be empty",
                    chain
                )));
            }
        }

        filters_from_tables(&self.filters).map(|_| ())
    }

    /// Configured endpoint for `chain`.
    pub fn endpoint(&self, chain: u64) -> Option<&str> {
        self.endpoints.get(&chain.to_string()).map(String::as_str)
    }
}

/// Project configuration.
///
/// # Example
///
/// ```toml
/// default_chain = 1
///
/// [filters.tree]
/// hats = 200
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Overrides the global default chain
    pub default_chain: Option<u64>,

    /// Overrides the global page size
    pub page_size: Option<u32>,

    /// Overlaid on the global filters, per relation
    pub filters: FilterTables,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_page_size(self.page_size)?;
        filters_from_tables(&self.filters).map(|_| ())
    }
}

fn validate_page_size(page_size: Option<u32>) -> Result<(), ConfigError> {
    if page_size == Some(0) {
        return Err(ConfigError::InvalidValue(
            "page_size must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Convert file filter tables into [`Filters`].
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for unknown object types and zero
/// page sizes.
pub fn filters_from_tables(tables: &FilterTables) -> Result<Filters, ConfigError> {
    let mut filters = Filters::new();
    for (object, relations) in tables {
        let object: ObjectType = object.parse().map_err(|e| {
            ConfigError::InvalidValue(format!("invalid filter table: {}", e))
        })?;
        for (relation, size) in relations {
            let size = NonZeroU32::new(*size).ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "filter {}.{} must be greater than 0",
                    object.name(),
                    relation
                ))
            })?;
            filters.set(object, relation.clone(), size);
        }
    }
    Ok(filters)
}
