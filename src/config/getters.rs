//! Getter methods for `ServiceConfig`

use std::path::Path;

use super::types::ServiceConfig;
use crate::html_validator::ValidatorLimits;
use crate::link_inserter::LinkerLimits;

impl ServiceConfig {
    #[must_use]
    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    #[must_use]
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `bind_addr:port`, ready for a listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    #[must_use]
    pub fn default_batch_size(&self) -> usize {
        self.default_batch_size
    }

    #[must_use]
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    #[must_use]
    pub fn validator_limits(&self) -> &ValidatorLimits {
        &self.validator
    }

    #[must_use]
    pub fn linker_limits(&self) -> &LinkerLimits {
        &self.linker
    }
}
