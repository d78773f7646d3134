//! Offline configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! offline_enabled = true
//! start_online = false
//! symmetric_lookup_override = false
//! log_profile = "production"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::Deserialize;

use crate::errors::{DualStoreError, ExError, ExErrorKind, Result};
use crate::logging_facility::{self, Profile};
use crate::routing::LookupPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OfflineConfig {
    /// Enables routing to the local repository and sync bookkeeping
    pub offline_enabled: bool,
    /// Initial connectivity state
    pub start_online: bool,
    /// Make `adapter_for` / `serializer_for` honor an explicit `false`
    pub symmetric_lookup_override: bool,
    pub log_profile: Profile,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            offline_enabled: true,
            start_online: true,
            symmetric_lookup_override: false,
            log_profile: Profile::Development,
        }
    }
}

impl OfflineConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Config` on malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| {
            DualStoreError::InvalidConfig {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Io` if the file cannot be read, or
    /// `ExErrorKind::Config` if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("config_load")
                .with_message(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// Install the global subscriber for `log_profile`
    ///
    /// One-shot, like [`logging_facility::init`]: the first profile installed
    /// in the process stays.
    pub fn init_logging(&self) {
        logging_facility::init(self.log_profile);
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        if self.symmetric_lookup_override {
            LookupPolicy::Symmetric
        } else {
            LookupPolicy::RemoteOverrideOnly
        }
    }
}
