//! Facet codec.
//!
//! A facet's bytes use the posting value layouts of the matching literal type;
//! only the tag numbering differs (see [`FacetType`]).

use crate::types::{Facet, FacetType, FacetValue, RawFacet, Value, ValueType};
use crate::{CoreError, CoreResult};

use super::value::{decode_value, encode_value_to};

fn value_type_of(facet_type: FacetType) -> ValueType {
    match facet_type {
        FacetType::String => ValueType::String,
        FacetType::Int32 => ValueType::Int32,
        FacetType::Float => ValueType::Float,
        FacetType::Bool => ValueType::Bool,
        FacetType::DateTime => ValueType::DateTime,
    }
}

/// Encode a facet into its stored form.
#[must_use]
pub fn encode_facet(facet: &Facet) -> RawFacet {
    let value = match facet.value() {
        FacetValue::String(s) => Value::String(s.clone()),
        FacetValue::Int32(i) => Value::Int32(*i),
        FacetValue::Float(f) => Value::Float(*f),
        FacetValue::Bool(b) => Value::Bool(*b),
        FacetValue::DateTime(dt) => Value::DateTime(*dt),
    };
    let mut bytes = Vec::new();
    encode_value_to(&value, &mut bytes);
    RawFacet { key: facet.key().to_owned(), val_type: facet.value().facet_type().tag(), value: bytes }
}

/// Decode a stored facet.
///
/// # Errors
///
/// Returns [`CoreError::CorruptValue`] for an unknown tag, bytes that do not
/// fit the tag's layout, or a key that could not have been written.
pub fn decode_facet(raw: &RawFacet) -> CoreResult<Facet> {
    let facet_type = FacetType::from_tag(raw.val_type)
        .ok_or_else(|| CoreError::corrupt("facet", format!("unknown facet tag {}", raw.val_type)))?;
    let value = decode_value(&raw.value, value_type_of(facet_type)).map_err(|e| match e {
        CoreError::CorruptValue { reason, .. } => CoreError::corrupt(facet_type.name(), reason),
        other => other,
    })?;
    let value = match value {
        Value::String(s) => FacetValue::String(s),
        Value::Int32(i) => FacetValue::Int32(i),
        Value::Float(f) => FacetValue::Float(f),
        Value::Bool(b) => FacetValue::Bool(b),
        Value::DateTime(dt) => FacetValue::DateTime(dt),
        other => {
            return Err(CoreError::corrupt(
                facet_type.name(),
                format!("decoded as {}", other.value_type()),
            ))
        }
    };
    Facet::new(raw.key.clone(), value)
        .map_err(|e| CoreError::corrupt(facet_type.name(), e.to_string()))
}
