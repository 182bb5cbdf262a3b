//! Predicate-to-group assignment.

use tracing::debug;

use crate::config::{ConfigError, GroupConfig};

/// Identifier of a group (shard) of predicates.
pub type GroupId = u32;

/// Decides which group owns a predicate.
///
/// Implementations must be pure: the same predicate always maps to the same
/// group for the lifetime of the oracle.
pub trait GroupOracle: Send + Sync {
    /// The group that owns `attr`.
    fn belongs_to(&self, attr: &str) -> GroupId;
}

impl<F> GroupOracle for F
where
    F: Fn(&str) -> GroupId + Send + Sync,
{
    fn belongs_to(&self, attr: &str) -> GroupId {
        self(attr)
    }
}

/// FarmHash `Fingerprint32` of a predicate's UTF-8 bytes.
#[inline]
#[must_use]
pub fn fingerprint(attr: &str) -> u32 {
    farmhash::fingerprint32(attr.as_bytes())
}

/// The cluster's assignment: `fingerprint(attr) % num_groups + offset`, unless
/// the predicate is pinned.
#[derive(Debug, Clone)]
pub struct FingerprintOracle {
    config: GroupConfig,
}

impl FingerprintOracle {
    /// Build an oracle from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails validation.
    pub fn new(config: &GroupConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(num_groups = config.num_groups, pinned = config.pinned.len(), "group oracle ready");
        Ok(Self { config: config.clone() })
    }

    /// The configuration this oracle was built from.
    #[must_use]
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }
}

impl GroupOracle for FingerprintOracle {
    fn belongs_to(&self, attr: &str) -> GroupId {
        if let Some(&group) = self.config.pinned.get(attr) {
            return group;
        }
        // validated non-zero
        let slot = fingerprint(attr) % self.config.num_groups;
        self.config.offset.saturating_add(slot)
    }
}
