//! Command implementations.

pub mod backup;
pub mod groups;
pub mod restore;

use std::path::Path;

use quiver::store::KvPostingStore;
use quiver::GroupConfig;
use quiver_storage::backends::RedbEngine;

use crate::error::{CliError, Result};

/// Open the posting store at the given path, or return an error if no path is provided.
pub fn open_store(path: Option<&Path>) -> Result<KvPostingStore<RedbEngine>> {
    let path = path.ok_or(CliError::NoDatabaseSpecified)?;

    if !path.exists() {
        return Err(CliError::DatabaseNotFound(path.to_path_buf()));
    }

    Ok(KvPostingStore::open(path).map_err(quiver::Error::from)?)
}

/// Open or create the posting store at the given path.
pub fn open_or_create_store(path: Option<&Path>) -> Result<KvPostingStore<RedbEngine>> {
    let path = path.ok_or(CliError::NoDatabaseSpecified)?;
    Ok(KvPostingStore::open(path).map_err(quiver::Error::from)?)
}

/// Load the group configuration, or a single group 0 without one.
pub fn load_config(path: Option<&Path>) -> Result<GroupConfig> {
    match path {
        Some(path) => Ok(GroupConfig::load(path)?),
        None => Ok(GroupConfig::new(1)),
    }
}
