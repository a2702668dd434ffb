//! Type-safe builder for `ServiceConfig` using the typestate pattern
//!
//! The database path is the only required value; `build()` exists only once
//! it has been set.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::errors::ConfigError;
use super::types::ServiceConfig;
use crate::html_validator::ValidatorLimits;
use crate::link_inserter::LinkerLimits;
use crate::utils::{
    DEFAULT_BATCH_SIZE, DEFAULT_BIND_ADDR, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, MAX_BATCH_SIZE,
};

// Type states for the builder
pub struct WithDatabase;

pub struct ServiceConfigBuilder<State = ()> {
    pub(crate) database_path: Option<PathBuf>,
    pub(crate) bind_addr: String,
    pub(crate) port: u16,
    pub(crate) max_body_bytes: usize,
    pub(crate) default_batch_size: usize,
    pub(crate) max_batch_size: usize,
    pub(crate) validator: ValidatorLimits,
    pub(crate) linker: LinkerLimits,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ServiceConfigBuilder<()> {
    fn default() -> Self {
        Self {
            database_path: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            default_batch_size: DEFAULT_BATCH_SIZE,
            max_batch_size: MAX_BATCH_SIZE,
            validator: ValidatorLimits::default(),
            linker: LinkerLimits::default(),
            _phantom: PhantomData,
        }
    }
}

impl ServiceConfig {
    /// Create a builder for configuring a `ServiceConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ServiceConfigBuilder<()> {
        ServiceConfigBuilder::default()
    }
}

impl ServiceConfigBuilder<()> {
    pub fn database_path(self, path: impl Into<PathBuf>) -> ServiceConfigBuilder<WithDatabase> {
        ServiceConfigBuilder {
            database_path: Some(path.into()),
            bind_addr: self.bind_addr,
            port: self.port,
            max_body_bytes: self.max_body_bytes,
            default_batch_size: self.default_batch_size,
            max_batch_size: self.max_batch_size,
            validator: self.validator,
            linker: self.linker,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl ServiceConfigBuilder<WithDatabase> {
    pub fn build(self) -> Result<ServiceConfig, ConfigError> {
        let database_path = self
            .database_path
            .ok_or_else(|| ConfigError::invalid("database_path", "must be set"))?;
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("database_path", "must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::invalid("max_body_bytes", "must be greater than zero"));
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::invalid("max_batch_size", "must be greater than zero"));
        }
        if !(1..=self.max_batch_size).contains(&self.default_batch_size) {
            return Err(ConfigError::invalid(
                "default_batch_size",
                format!("must be between 1 and {}", self.max_batch_size),
            ));
        }
        if self.linker.words_per_link == 0 {
            return Err(ConfigError::invalid("linker.words_per_link", "must be greater than zero"));
        }

        Ok(ServiceConfig {
            database_path,
            bind_addr: self.bind_addr,
            port: self.port,
            max_body_bytes: self.max_body_bytes,
            default_batch_size: self.default_batch_size,
            max_batch_size: self.max_batch_size,
            validator: self.validator,
            linker: self.linker,
        })
    }
}
