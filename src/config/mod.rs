//! Configuration module for the repair service
//!
//! This module provides the `ServiceConfig` struct, its type-safe builder,
//! and TOML file loading. Precedence is CLI/env over file over defaults.

// Sub-modules
pub mod builder;
pub mod errors;
pub mod getters;
pub mod methods;
pub mod types;

use std::path::{Path, PathBuf};

// Re-exports for public API
pub use builder::{ServiceConfigBuilder, WithDatabase};
pub use errors::ConfigError;
pub use types::{ConfigFile, ServiceConfig};

use crate::utils::DEFAULT_DATABASE_PATH;

/// Start a builder from an optional config file and database override.
///
/// The database path is taken from `database_override`, then the file, then
/// [`DEFAULT_DATABASE_PATH`]. Callers can still apply overrides before
/// calling `build()`.
pub fn load_builder(
    config_file: Option<&Path>,
    database_override: Option<PathBuf>,
) -> Result<ServiceConfigBuilder<WithDatabase>, ConfigError> {
    let file = match config_file {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            ConfigFile::from_path(path)?
        }
        None => ConfigFile::default(),
    };

    let database = database_override
        .or_else(|| file.database_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

    Ok(ServiceConfig::builder().with_file(&file).database_path(database))
}
