//! Facets: typed key/value annotations on a single posting.

use std::fmt;

use super::DateTime;
use crate::{CoreError, CoreResult};

/// The type tag of a facet value.
///
/// Facet tags form their own numbering, separate from
/// [`ValueType`](super::ValueType). DATE facets share the DATETIME tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FacetType {
    /// UTF-8 text.
    String = 0,
    /// 32-bit signed integer.
    Int32 = 1,
    /// 64-bit float.
    Float = 2,
    /// Boolean.
    Bool = 3,
    /// Date or date-time.
    DateTime = 4,
}

impl FacetType {
    /// The stored tag byte.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a facet type by its stored tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::String),
            1 => Some(Self::Int32),
            2 => Some(Self::Float),
            3 => Some(Self::Bool),
            4 => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Lowercase name used in errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string facet",
            Self::Int32 => "int32 facet",
            Self::Float => "float facet",
            Self::Bool => "bool facet",
            Self::DateTime => "datetime facet",
        }
    }
}

/// A facet value.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetValue {
    /// UTF-8 text.
    String(String),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Date or date-time.
    DateTime(DateTime),
}

impl FacetValue {
    /// The tag this value is stored under.
    #[must_use]
    pub const fn facet_type(&self) -> FacetType {
        match self {
            Self::String(_) => FacetType::String,
            Self::Int32(_) => FacetType::Int32,
            Self::Float(_) => FacetType::Float,
            Self::Bool(_) => FacetType::Bool,
            Self::DateTime(_) => FacetType::DateTime,
        }
    }
}

impl From<i32> for FacetValue {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<bool> for FacetValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FacetValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for FacetValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for FacetValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateTime> for FacetValue {
    fn from(dt: DateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// A facet attached to a posting.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    key: String,
    value: FacetValue,
}

impl Facet {
    /// Create a facet, validating its key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the key is empty or contains
    /// whitespace, control characters, or any of `=` `,` `(` `)` `"`.
    pub fn new(key: impl Into<String>, value: impl Into<FacetValue>) -> CoreResult<Self> {
        let key = key.into();
        validate_facet_key(&key)?;
        Ok(Self { key, value: value.into() })
    }

    /// The facet key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The facet value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &FacetValue {
        &self.value
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn validate_facet_key(key: &str) -> CoreResult<()> {
    if key.is_empty() {
        return Err(CoreError::validation("facet key must not be empty"));
    }
    if let Some(c) = key.chars().find(|c| {
        matches!(c, '=' | ',' | '(' | ')' | '"' | '\\') || c.is_whitespace() || c.is_control()
    }) {
        return Err(CoreError::validation(format!("facet key {key:?} contains {c:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_tags_are_stable() {
        assert_eq!(FacetType::String.tag(), 0);
        assert_eq!(FacetType::Int32.tag(), 1);
        assert_eq!(FacetType::Float.tag(), 2);
        assert_eq!(FacetType::Bool.tag(), 3);
        assert_eq!(FacetType::DateTime.tag(), 4);
        assert_eq!(FacetType::from_tag(5), None);
    }

    #[test]
    fn facet_key_validation() {
        assert!(Facet::new("since", 1).is_ok());
        assert!(Facet::new("", 1).is_err());
        assert!(Facet::new("a=b", 1).is_err());
        assert!(Facet::new("a b", 1).is_err());
        assert!(Facet::new("a,b", 1).is_err());
        assert!(Facet::new("close)", true).is_err());
    }
}
