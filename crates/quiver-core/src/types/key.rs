//! Posting-list keys.

use std::cmp::Ordering;
use std::fmt;

use super::{validate_iri_token, Uid};
use crate::CoreResult;

/// Identifies one posting list: a predicate and the subject node it hangs off.
///
/// Keys order the same way as their binary encoding (see
/// [`encoding::keys`](crate::encoding::keys)): by predicate length, then
/// predicate bytes, then subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    attr: String,
    entity: Uid,
}

impl Key {
    /// Create a key, validating the predicate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`](crate::CoreError::Validation) if the
    /// predicate is empty, longer than 65535 bytes, or contains characters
    /// that cannot appear inside `<...>`.
    pub fn new(attr: impl Into<String>, entity: impl Into<Uid>) -> CoreResult<Self> {
        let attr = attr.into();
        validate_iri_token("predicate", &attr)?;
        if attr.len() > usize::from(u16::MAX) {
            return Err(crate::CoreError::validation(format!(
                "predicate is {} bytes, limit is {}",
                attr.len(),
                u16::MAX
            )));
        }
        Ok(Self { attr, entity: entity.into() })
    }

    /// The predicate name.
    #[inline]
    #[must_use]
    pub fn attr(&self) -> &str {
        &self.attr
    }

    /// The subject node.
    #[inline]
    #[must_use]
    pub const fn entity(&self) -> Uid {
        self.entity
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.attr
            .len()
            .cmp(&other.attr.len())
            .then_with(|| self.attr.as_bytes().cmp(other.attr.as_bytes()))
            .then_with(|| self.entity.cmp(&other.entity))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>@{}", self.attr, self.entity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn key_rejects_bad_predicates() {
        assert!(Key::new("", 1).is_err());
        assert!(Key::new("has space", 1).is_err());
        assert!(Key::new("a>b", 1).is_err());
        assert!(Key::new("x".repeat(70_000), 1).is_err());
        assert!(Key::new("friend", 1).is_ok());
        assert!(Key::new("名前", 1).is_ok());
    }

    #[test]
    fn key_ordering_matches_layout() {
        let a = Key::new("name", 9).unwrap();
        let b = Key::new("friend", 1).unwrap();
        let c = Key::new("friend", 2).unwrap();
        // shorter predicate first
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn key_display() {
        assert_eq!(Key::new("friend", 4).unwrap().to_string(), "<friend>@0x4");
    }
}
