//! Builder methods available for all states

use super::builder::ServiceConfigBuilder;
use super::types::ConfigFile;
use crate::html_validator::ValidatorLimits;
use crate::link_inserter::LinkerLimits;

impl<State> ServiceConfigBuilder<State> {
    #[must_use]
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Batch size used when a repair request omits `batchSize`.
    #[must_use]
    pub fn default_batch_size(mut self, size: usize) -> Self {
        self.default_batch_size = size;
        self
    }

    /// Upper clamp for requested batch sizes.
    #[must_use]
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    #[must_use]
    pub fn validator_limits(mut self, limits: ValidatorLimits) -> Self {
        self.validator = limits;
        self
    }

    #[must_use]
    pub fn linker_limits(mut self, limits: LinkerLimits) -> Self {
        self.linker = limits;
        self
    }

    /// Take every value the config file sets, except the database path.
    ///
    /// The database path changes the builder state, so callers pass it to
    /// `database_path()` themselves, usually after CLI overrides.
    #[must_use]
    pub fn with_file(mut self, file: &ConfigFile) -> Self {
        if let Some(addr) = &file.bind_addr {
            self.bind_addr.clone_from(addr);
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(bytes) = file.max_body_bytes {
            self.max_body_bytes = bytes;
        }
        if let Some(size) = file.default_batch_size {
            self.default_batch_size = size;
        }
        if let Some(size) = file.max_batch_size {
            self.max_batch_size = size;
        }
        if let Some(limits) = file.validator {
            self.validator = limits;
        }
        if let Some(limits) = file.linker {
            self.linker = limits;
        }
        self
    }
}
