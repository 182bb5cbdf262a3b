//! Literal values carried by postings.

use std::fmt;

use geo_types::Geometry;

use super::{Date, DateTime};

/// The type tag stored with every posting.
///
/// The numeric tags are part of the stored format and shared with the rest
/// of the cluster; they must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ValueType {
    /// UTF-8 text.
    String = 0,
    /// Arbitrary bytes.
    Binary = 1,
    /// 32-bit signed integer.
    Int32 = 2,
    /// 64-bit float.
    Float = 3,
    /// Boolean.
    Bool = 4,
    /// Calendar date.
    Date = 5,
    /// Instant with offset.
    DateTime = 6,
    /// Geometry (WKB on disk).
    Geo = 7,
    /// Edge to another node; carries no literal.
    Uid = 8,
    /// Pre-hashed credential.
    Password = 9,
}

impl ValueType {
    /// All types, in tag order.
    pub const ALL: [Self; 10] = [
        Self::String,
        Self::Binary,
        Self::Int32,
        Self::Float,
        Self::Bool,
        Self::Date,
        Self::DateTime,
        Self::Geo,
        Self::Uid,
        Self::Password,
    ];

    /// The stored tag byte.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a type by its stored tag.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Lowercase name used in errors and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Binary => "binary",
            Self::Int32 => "int32",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Geo => "geo",
            Self::Uid => "uid",
            Self::Password => "password",
        }
    }

    /// Width in bytes for fixed-width layouts.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Int32 => Some(4),
            Self::Float => Some(8),
            Self::Bool => Some(1),
            Self::Date | Self::DateTime => Some(10),
            Self::Uid => Some(0),
            Self::String | Self::Binary | Self::Geo | Self::Password => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal value, one variant per non-UID [`ValueType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text.
    String(String),
    /// Arbitrary bytes.
    Binary(Vec<u8>),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Calendar date.
    Date(Date),
    /// Instant with offset.
    DateTime(DateTime),
    /// Geometry.
    Geo(Geometry<f64>),
    /// Pre-hashed credential, kept as its textual hash.
    Password(String),
}

impl Value {
    /// The type tag this value is stored under.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Binary(_) => ValueType::Binary,
            Self::Int32(_) => ValueType::Int32,
            Self::Float(_) => ValueType::Float,
            Self::Bool(_) => ValueType::Bool,
            Self::Date(_) => ValueType::Date,
            Self::DateTime(_) => ValueType::DateTime,
            Self::Geo(_) => ValueType::Geo,
            Self::Password(_) => ValueType::Password,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int32(&self) -> Option<i32> {
        match self {
            Self::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Date> for Value {
    #[inline]
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime> for Value {
    #[inline]
    fn from(dt: DateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Geometry<f64>> for Value {
    #[inline]
    fn from(g: Geometry<f64>) -> Self {
        Self::Geo(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable() {
        assert_eq!(ValueType::String.tag(), 0);
        assert_eq!(ValueType::Binary.tag(), 1);
        assert_eq!(ValueType::Int32.tag(), 2);
        assert_eq!(ValueType::Float.tag(), 3);
        assert_eq!(ValueType::Bool.tag(), 4);
        assert_eq!(ValueType::Date.tag(), 5);
        assert_eq!(ValueType::DateTime.tag(), 6);
        assert_eq!(ValueType::Geo.tag(), 7);
        assert_eq!(ValueType::Uid.tag(), 8);
        assert_eq!(ValueType::Password.tag(), 9);
    }

    #[test]
    fn from_tag_inverts_tag() {
        for vt in ValueType::ALL {
            assert_eq!(ValueType::from_tag(vt.tag()), Some(vt));
        }
        assert_eq!(ValueType::from_tag(10), None);
        assert_eq!(ValueType::from_tag(0xFF), None);
    }

    #[test]
    fn value_conversions() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(42i32).as_int32(), Some(42));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(2.5f64).value_type(), ValueType::Float);
        assert_eq!(Value::Password("$2a$10$x".into()).value_type(), ValueType::Password);
    }
}
