//! Group configuration.
//!
//! Decides how many groups predicates are spread over and which predicates are
//! pinned to a fixed group. Loaded once, then handed to a
//! [`FingerprintOracle`](crate::group::FingerprintOracle).
//!
//! # Example Configuration
//!
//! ```toml
//! num_groups = 10
//! offset = 1
//!
//! [pinned]
//! "quiver.type" = 1
//! name = 3
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::group::GroupId;

/// Errors raised while loading or validating a [`GroupConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for a group configuration.
    #[error("failed to parse group configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values do not describe a usable group assignment.
    #[error("invalid group configuration: {0}")]
    Invalid(String),
}

/// How predicates are assigned to groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Number of groups the fingerprint is reduced modulo.
    pub num_groups: u32,

    /// Added to every computed group id.
    #[serde(default)]
    pub offset: u32,

    /// Predicates that always belong to a fixed group.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pinned: BTreeMap<String, GroupId>,
}

impl GroupConfig {
    /// A configuration of `num_groups` groups numbered from 0, with no pins.
    #[must_use]
    pub fn new(num_groups: u32) -> Self {
        Self { num_groups, offset: 0, pinned: BTreeMap::new() }
    }

    /// Number groups from `offset` instead of 0.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Pin `attr` to `group`.
    #[must_use]
    pub fn pin(mut self, attr: impl Into<String>, group: GroupId) -> Self {
        self.pinned.insert(attr.into(), group);
        self
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a usable assignment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero groups, a group range that
    /// overflows `u32`, or an empty pinned predicate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_groups == 0 {
            return Err(ConfigError::Invalid("num_groups must be at least 1".to_owned()));
        }
        if self.offset.checked_add(self.num_groups - 1).is_none() {
            return Err(ConfigError::Invalid(format!(
                "offset {} plus {} groups overflows the group id range",
                self.offset, self.num_groups
            )));
        }
        if self.pinned.keys().any(String::is_empty) {
            return Err(ConfigError::Invalid("pinned predicate must not be empty".to_owned()));
        }
        Ok(())
    }

    /// Every group id this configuration can assign, ascending.
    #[must_use]
    pub fn groups(&self) -> Vec<GroupId> {
        let mut groups: Vec<GroupId> = (0..self.num_groups)
            .filter_map(|g| self.offset.checked_add(g))
            .chain(self.pinned.values().copied())
            .collect();
        groups.sort_unstable();
        groups.dedup();
        groups
    }
}
