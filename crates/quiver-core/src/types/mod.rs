//! Core data types for Quiver.
//!
//! This module defines the node identifiers, posting-list keys, typed values,
//! facets and postings that the codecs and the backup pipeline operate on.

mod facet;
mod id;
mod key;
mod posting;
mod time;
mod value;

pub use facet::{Facet, FacetType, FacetValue};
pub use id::Uid;
pub use key::Key;
pub(crate) use posting::validate_lang;
pub use posting::{Object, Posting, PostingList, RawFacet, RawPosting};
pub use time::{Date, DateTime};
pub use value::{Value, ValueType};

/// Checks that `s` can sit between `<` and `>` in a quad line.
///
/// Used for predicates and labels.
pub(crate) fn validate_iri_token(what: &str, s: &str) -> crate::CoreResult<()> {
    if s.is_empty() {
        return Err(crate::CoreError::validation(format!("{what} must not be empty")));
    }
    if let Some(c) =
        s.chars().find(|c| matches!(c, '<' | '>' | '"' | '\\') || c.is_whitespace() || c.is_control())
    {
        return Err(crate::CoreError::validation(format!("{what} {s:?} contains {c:?}")));
    }
    Ok(())
}
