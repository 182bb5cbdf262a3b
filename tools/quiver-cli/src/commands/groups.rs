//! Group assignment lookup.

use std::path::Path;

use quiver::group::{fingerprint, FingerprintOracle, GroupOracle};

use super::load_config;
use crate::error::Result;

/// Print the owning group of each predicate, or every group id.
pub fn run(config_path: Option<&Path>, attrs: &[String]) -> Result<()> {
    let config = load_config(config_path)?;
    let oracle = FingerprintOracle::new(&config)?;

    if attrs.is_empty() {
        for group in config.groups() {
            println!("{group}");
        }
        return Ok(());
    }

    for attr in attrs {
        println!("{}", describe(&oracle, attr));
    }
    Ok(())
}

/// One output row: predicate, group, 32-bit fingerprint, and a pinned marker.
fn describe(oracle: &FingerprintOracle, attr: &str) -> String {
    let pinned = if oracle.config().pinned.contains_key(attr) { " (pinned)" } else { "" };
    format!("{attr}\t{}\t{:#010x}{pinned}", oracle.belongs_to(attr), fingerprint(attr))
}

#[cfg(test)]
mod tests {
    use quiver::GroupConfig;

    use super::*;

    #[test]
    fn describe_prints_group_and_fingerprint() {
        let config = GroupConfig::new(10).pin("name", 42);
        let oracle = FingerprintOracle::new(&config).expect("valid config");

        let row = describe(&oracle, "friend");
        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields[0], "friend");
        assert_eq!(fields[1], "2");
        assert_eq!(fields[2], format!("{:#010x}", fingerprint("friend")));
        assert_eq!(fields[2].len(), 10);

        assert_eq!(describe(&oracle, "name"), format!("name\t42\t{:#010x} (pinned)", fingerprint("name")));
    }
}
