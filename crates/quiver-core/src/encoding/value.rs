//! Canonical bytes for literal [`Value`]s.
//!
//! # Format
//!
//! The type tag is not part of the bytes. All integers are little-endian.
//!
//! - `String`, `Password`: raw UTF-8, no length prefix
//! - `Binary`: raw bytes, no length prefix
//! - `Int32`: 4 bytes, two's complement
//! - `Float`: 8 bytes, IEEE 754
//! - `Bool`: 1 byte, `0x00` false, anything else true (written as `0x01`)
//! - `Date`: 8 bytes days since 1970-01-01, then `FF FF`
//! - `DateTime`: 8 bytes seconds since the Unix epoch, then a 2-byte offset
//!   tag: minutes east of UTC, or `-1` (`FF FF`) for `Z`
//! - `Geo`: little-endian WKB (see [`wkb`](super::wkb))
//! - `Uid`: no bytes

use crate::types::{Date, DateTime, Value, ValueType};
use crate::{CoreError, CoreResult};

use super::traits::Encoder;
use super::wkb;

/// Offset tag meaning "UTC, render as `Z`".
const UTC_TAG: i16 = -1;

/// Encode a value into its canonical bytes.
#[must_use]
pub fn encode_value(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(value, &mut buf);
    buf
}

/// Append the canonical bytes of `value` to `buf`.
pub fn encode_value_to(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::String(s) | Value::Password(s) => buf.extend_from_slice(s.as_bytes()),
        Value::Binary(b) => buf.extend_from_slice(b),
        Value::Int32(i) => buf.extend_from_slice(&i.to_le_bytes()),
        Value::Float(f) => buf.extend_from_slice(&f.to_le_bytes()),
        Value::Bool(b) => buf.push(u8::from(*b)),
        Value::Date(d) => {
            buf.extend_from_slice(&d.epoch_days().to_le_bytes());
            buf.extend_from_slice(&UTC_TAG.to_le_bytes());
        }
        Value::DateTime(dt) => {
            buf.extend_from_slice(&dt.unix_seconds().to_le_bytes());
            buf.extend_from_slice(&dt.offset_minutes().unwrap_or(UTC_TAG).to_le_bytes());
        }
        Value::Geo(g) => wkb::write_geometry(g, buf),
    }
}

impl Encoder for Value {
    fn encode_to(&self, buf: &mut Vec<u8>) -> CoreResult<()> {
        encode_value_to(self, buf);
        Ok(())
    }
}

/// Decode canonical bytes declared as `value_type`.
///
/// # Errors
///
/// Returns [`CoreError::CorruptValue`] when the bytes do not fit the layout of
/// `value_type`: wrong length for a fixed-width type, invalid UTF-8, an
/// unrepresentable date or offset, or malformed WKB. UID postings have no
/// literal and are rejected with [`CoreError::Validation`].
pub fn decode_value(bytes: &[u8], value_type: ValueType) -> CoreResult<Value> {
    let name = value_type.name();
    match value_type {
        ValueType::String => Ok(Value::String(utf8(bytes, name)?)),
        ValueType::Password => Ok(Value::Password(utf8(bytes, name)?)),
        ValueType::Binary => Ok(Value::Binary(bytes.to_vec())),
        ValueType::Int32 => Ok(Value::Int32(i32::from_le_bytes(fixed(bytes, name)?))),
        ValueType::Float => Ok(Value::Float(f64::from_le_bytes(fixed(bytes, name)?))),
        ValueType::Bool => {
            let [b] = fixed::<1>(bytes, name)?;
            Ok(Value::Bool(b != 0))
        }
        ValueType::Date => {
            let (days, tag) = split_time(bytes, name)?;
            if tag != UTC_TAG {
                return Err(CoreError::corrupt(name, format!("offset tag {tag} on a date")));
            }
            Date::from_epoch_days(days)
                .map(Value::Date)
                .map_err(|e| CoreError::corrupt(name, e.to_string()))
        }
        ValueType::DateTime => {
            let (secs, tag) = split_time(bytes, name)?;
            let offset = (tag != UTC_TAG).then_some(tag);
            DateTime::with_offset(secs, offset)
                .map(Value::DateTime)
                .map_err(|e| CoreError::corrupt(name, e.to_string()))
        }
        ValueType::Geo => wkb::read_geometry(bytes).map(Value::Geo),
        ValueType::Uid => Err(CoreError::validation("uid postings carry no literal value")),
    }
}

fn utf8(bytes: &[u8], name: &'static str) -> CoreResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| CoreError::corrupt(name, e.to_string()))
}

fn fixed<const N: usize>(bytes: &[u8], name: &'static str) -> CoreResult<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| CoreError::corrupt(name, format!("expected {N} bytes, found {}", bytes.len())))
}

fn split_time(bytes: &[u8], name: &'static str) -> CoreResult<(i64, i16)> {
    let raw = fixed::<10>(bytes, name)?;
    let mut head = [0u8; 8];
    head.copy_from_slice(&raw[..8]);
    Ok((i64::from_le_bytes(head), i16::from_le_bytes([raw[8], raw[9]])))
}
