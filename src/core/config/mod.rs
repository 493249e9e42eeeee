//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! There are two configuration scopes:
//! - **Global**: User-level settings, including graph index endpoints
//! - **Project**: Directory-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$HATS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/hats/config.toml`
//! 3. `~/.hats/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use hatwork::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! println!("Page size: {}", config.page_size());
//! if let Some(chain) = config.default_chain() {
//!     println!("Endpoint: {}", config.endpoint(chain).unwrap());
//! }
//! ```

pub mod schema;

pub use schema::{GlobalConfig, ProjectConfig};

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::core::constants::DEFAULT_PAGE_SIZE;
use crate::subgraph::filters::Filters;
use crate::subgraph::schema::{next_type, ObjectType};

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no graph index endpoint configured for chain {0}")]
    UnsupportedNetwork(u64),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence: project config overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: GlobalConfig,
    pub project: Option<ProjectConfig>,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Config {
    /// Build a configuration from already-parsed scopes.
    pub fn from_parts(global: GlobalConfig, project: Option<ProjectConfig>) -> Self {
        Self {
            global,
            project,
            ..Default::default()
        }
    }

    /// Load configuration from the default locations.
    ///
    /// If `project_dir` is provided, also loads its project config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be read, parsed
    /// or validated. Missing files are not an error.
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(None, project_dir)
    }

    /// Load configuration, reading the global file from `global_override`
    /// instead of the default locations when given.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load). An override path that does not exist
    /// is a `ReadError`.
    pub fn load_with(
        global_override: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let global_path = match global_override {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_global(),
        };
        let global = match &global_path {
            Some(path) => read_config::<GlobalConfig>(path)?,
            None => GlobalConfig::default(),
        };

        let project_path = project_dir
            .map(Self::project_config_path)
            .filter(|path| path.exists());
        let project = match &project_path {
            Some(path) => Some(read_config::<ProjectConfig>(path)?),
            None => None,
        };

        global.validate()?;
        if let Some(p) = &project {
            p.validate()?;
        }

        if let Some(path) = &global_path {
            warn_unknown_relations(&global.filters, path, &mut warnings)?;
        }
        if let (Some(p), Some(path)) = (&project, &project_path) {
            warn_unknown_relations(&p.filters, path, &mut warnings)?;
        }

        debug!(
            global = ?global_path,
            project = ?project_path,
            warnings = warnings.len(),
            "loaded configuration"
        );

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                global_path,
                project_path,
            },
            warnings,
        })
    }

    /// First existing global config file, if any.
    fn find_global() -> Option<PathBuf> {
        global_candidates(
            std::env::var_os("HATS_CONFIG").map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        )
        .into_iter()
        .find(|path| path.exists())
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.hats/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".hats/config.toml"))
    }

    /// Get the path for project config under `project_dir`.
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".hats/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Default page size for relations.
    ///
    /// Defaults to 1000 if not configured. A zero in a config built by
    /// hand (loading rejects it) reads as unset.
    pub fn page_size(&self) -> NonZeroU32 {
        self.project
            .as_ref()
            .and_then(|p| p.page_size)
            .and_then(NonZeroU32::new)
            .or_else(|| self.global.page_size.and_then(NonZeroU32::new))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Chain used when none is given.
    pub fn default_chain(&self) -> Option<u64> {
        self.project
            .as_ref()
            .and_then(|p| p.default_chain)
            .or(self.global.default_chain)
    }

    /// Graph index endpoint for `chain`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedNetwork` if none is configured.
    pub fn endpoint(&self, chain: u64) -> Result<&str, ConfigError> {
        self.global
            .endpoint(chain)
            .ok_or(ConfigError::UnsupportedNetwork(chain))
    }

    /// Merged filters; project entries override global ones per relation.
    ///
    /// Loaded configs are validated. In a config built by hand, a scope
    /// whose tables fail validation contributes no filters.
    pub fn filters(&self) -> Filters {
        let global = schema::filters_from_tables(&self.global.filters).unwrap_or_default();
        match &self.project {
            Some(p) => {
                let project = schema::filters_from_tables(&p.filters).unwrap_or_default();
                global.merged(&project)
            }
            None => global,
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

/// Global config locations in search order.
fn global_candidates(
    env_config: Option<PathBuf>,
    xdg_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    candidates.extend(env_config);
    candidates.extend(xdg_home.map(|xdg| xdg.join("hats/config.toml")));
    candidates.extend(home.map(|home| home.join(".hats/config.toml")));
    candidates
}

/// Read and parse a config file.
fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Filters naming relations the schema lacks are kept but never apply.
fn warn_unknown_relations(
    tables: &schema::FilterTables,
    path: &Path,
    warnings: &mut Vec<ConfigWarning>,
) -> Result<(), ConfigError> {
    for (object, relations) in tables {
        let object: ObjectType = object
            .parse()
            .map_err(|e| ConfigError::InvalidValue(format!("invalid filter table: {}", e)))?;
        for relation in relations.keys() {
            if next_type(object, relation).is_err() {
                warnings.push(ConfigWarning {
                    message: format!(
                        "filter for unknown relation '{}' on {} has no effect",
                        relation,
                        object.name()
                    ),
                    path: path.to_path_buf(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn candidates_in_order() {
        let candidates = global_candidates(
            Some(PathBuf::from("/etc/hats.toml")),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/etc/hats.toml"),
                PathBuf::from("/xdg/hats/config.toml"),
                PathBuf::from("/home/u/.hats/config.toml"),
            ]
        );
        assert!(global_candidates(None, None, None).is_empty());
    }

    #[test]
    fn defaults_without_files() {
        let config = Config::default();
        assert_eq!(config.page_size().get(), 1000);
        assert!(config.default_chain().is_none());
        assert!(config.filters().is_empty());
        assert!(matches!(
            config.endpoint(1),
            Err(ConfigError::UnsupportedNetwork(1))
        ));
    }

    #[test]
    fn zero_page_size_in_built_config_reads_as_unset() {
        let global = GlobalConfig {
            page_size: Some(500),
            ..Default::default()
        };
        let project = ProjectConfig {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(Config::from_parts(global, Some(project)).page_size().get(), 500);

        let global = GlobalConfig {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(Config::from_parts(global, None).page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn load_global_override() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        write(
            &global,
            r#"
            default_chain = 100
            [endpoints]
            100 = "https://example.com/gnosis"
            "#,
        );

        let result = Config::load_with(Some(&global), None).unwrap();
        let config = result.config;
        assert_eq!(config.default_chain(), Some(100));
        assert_eq!(config.endpoint(100).unwrap(), "https://example.com/gnosis");
        assert_eq!(config.global_config_loaded_from(), Some(global.as_path()));
    }

    #[test]
    fn missing_override_is_read_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(matches!(
            Config::load_with(Some(&missing), None),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn project_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        write(
            &global,
            r#"
            page_size = 500
            default_chain = 1
            [filters.hat]
            wearers = 10
            subHats = 20
            "#,
        );
        write(
            &Config::project_config_path(temp.path()),
            r#"
            page_size = 50
            [filters.hat]
            wearers = 3
            "#,
        );

        let config = Config::load_with(Some(&global), Some(temp.path()))
            .unwrap()
            .config;
        assert_eq!(config.page_size().get(), 50);
        assert_eq!(config.default_chain(), Some(1));

        let filters = config.filters();
        assert_eq!(filters.page_size(ObjectType::Hat, "wearers"), Some(3));
        assert_eq!(filters.page_size(ObjectType::Hat, "subHats"), Some(20));
        assert!(config.project_config_loaded_from().is_some());
    }

    #[test]
    fn unknown_relation_warns() {
        let temp = TempDir::new().unwrap();
        write(
            &Config::project_config_path(temp.path()),
            r#"
            [filters.wearer]
            currentHats = 5
            pastHats = 5
            "#,
        );
        let empty = temp.path().join("global.toml");
        write(&empty, "");

        let result = Config::load_with(Some(&empty), Some(temp.path())).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("pastHats"));
    }

    #[test]
    fn invalid_project_rejected() {
        let temp = TempDir::new().unwrap();
        write(&Config::project_config_path(temp.path()), "page_size = 0");
        let empty = temp.path().join("global.toml");
        write(&empty, "");

        assert!(matches!(
            Config::load_with(Some(&empty), Some(temp.path())),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        write(&global, "trunk = \"main\"");
        assert!(matches!(
            Config::load_with(Some(&global), None),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
