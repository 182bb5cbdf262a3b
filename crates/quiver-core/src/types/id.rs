//! Node identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node in the graph.
///
/// Renders as `0x` followed by lowercase hex, the form used in quad lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Uid(u64);

impl Uid {
    /// Create a new `Uid` from a raw u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Parse the `0x`-prefixed hex form.
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u64::from_str_radix(digits, 16).ok().map(Self)
    }
}

impl From<u64> for Uid {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
