//! Core configuration types for the repair service
//!
//! `ServiceConfig` is the validated runtime configuration; `ConfigFile` is the
//! optional TOML file it can be seeded from.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::ConfigError;
use crate::html_validator::ValidatorLimits;
use crate::link_inserter::LinkerLimits;

/// Main configuration struct for the service and CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// SQLite file holding the articles
    pub(crate) database_path: PathBuf,
    pub(crate) bind_addr: String,
    pub(crate) port: u16,
    /// Largest accepted HTTP request body
    pub(crate) max_body_bytes: usize,
    /// Batch size used when a repair request does not give one
    pub(crate) default_batch_size: usize,
    pub(crate) max_batch_size: usize,
    pub(crate) validator: ValidatorLimits,
    pub(crate) linker: LinkerLimits,
}

/// TOML configuration file. Every key is optional.
///
/// ```toml
/// database_path = "articles.sqlite"
/// port = 8080
///
/// [validator]
/// max_nesting_depth = 30
///
/// [linker]
/// max_inline_links = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub database_path: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub max_body_bytes: Option<usize>,
    pub default_batch_size: Option<usize>,
    pub max_batch_size: Option<usize>,
    pub validator: Option<ValidatorLimits>,
    pub linker: Option<LinkerLimits>,
}

impl ConfigFile {
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source, path)
    }
}
