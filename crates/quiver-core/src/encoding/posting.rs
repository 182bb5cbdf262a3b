//! Conversion between typed and stored postings, and the posting-list envelope.

use tracing::debug;

use crate::types::{
    validate_iri_token, validate_lang, Object, Posting, PostingList, RawPosting, Uid, Value, ValueType,
};
use crate::{CoreError, CoreResult};

use super::facet::{decode_facet, encode_facet};
use super::traits::{Decoder, Encoder, FORMAT_VERSION};
use super::value::{decode_value, encode_value};

impl Posting {
    /// The stored form of this posting.
    #[must_use]
    pub fn to_raw(&self) -> RawPosting {
        let (uid, value, lang) = match self.object() {
            Object::Node(target) => (target.as_u64(), Vec::new(), String::new()),
            Object::Literal { value, lang } => {
                (0, encode_value(value), lang.clone().unwrap_or_default())
            }
        };
        RawPosting {
            uid,
            val_type: self.value_type().tag(),
            value,
            lang,
            label: self.label().unwrap_or_default().to_owned(),
            facets: self.facets().iter().map(encode_facet).collect(),
        }
    }

    /// Decode a stored posting.
    ///
    /// A language tag on a non-string literal is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CorruptValue`] if the type tag is unknown, a UID
    /// posting carries value bytes, the value or a facet fails to decode, or
    /// the label or language tag could not have been written.
    pub fn from_raw(raw: &RawPosting) -> CoreResult<Self> {
        let value_type = ValueType::from_tag(raw.val_type)
            .ok_or_else(|| CoreError::corrupt("posting", format!("unknown type tag {}", raw.val_type)))?;

        let object = if value_type == ValueType::Uid {
            if !raw.value.is_empty() {
                return Err(CoreError::corrupt(
                    "uid",
                    format!("{} value bytes on a uid posting", raw.value.len()),
                ));
            }
            Object::Node(Uid::new(raw.uid))
        } else {
            let value = decode_value(&raw.value, value_type)?;
            let lang = match (&value, raw.lang.is_empty()) {
                (_, true) => None,
                (Value::String(_), false) => {
                    validate_lang(&raw.lang)
                        .map_err(|e| CoreError::corrupt("string", e.to_string()))?;
                    Some(raw.lang.clone())
                }
                (_, false) => {
                    debug!(lang = %raw.lang, value_type = %value_type, "dropping language tag on non-string literal");
                    None
                }
            };
            Object::Literal { value, lang }
        };

        let label = if raw.label.is_empty() {
            None
        } else {
            validate_iri_token("label", &raw.label)
                .map_err(|e| CoreError::corrupt("posting", e.to_string()))?;
            Some(raw.label.clone())
        };

        let facets = raw.facets.iter().map(decode_facet).collect::<CoreResult<Vec<_>>>()?;
        Ok(Self::from_parts(object, label, facets))
    }
}

impl Encoder for PostingList {
    fn encode_to(&self, buf: &mut Vec<u8>) -> CoreResult<()> {
        buf.push(FORMAT_VERSION);
        let body = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| CoreError::Encoding(e.to_string()))?;
        buf.extend_from_slice(&body);
        Ok(())
    }
}

impl Decoder for PostingList {
    fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let Some((&version, body)) = bytes.split_first() else {
            return Err(CoreError::Encoding("empty posting list".to_owned()));
        };
        if version != FORMAT_VERSION {
            return Err(CoreError::Encoding(format!("unsupported posting list version {version}")));
        }
        let (list, read): (Self, usize) =
            bincode::serde::decode_from_slice(body, bincode::config::standard())
                .map_err(|e| CoreError::Encoding(e.to_string()))?;
        if read != body.len() {
            return Err(CoreError::Encoding(format!(
                "{} trailing bytes after posting list",
                body.len() - read
            )));
        }
        Ok(list)
    }
}

impl PostingList {
    /// Decode every posting into the typed model.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreError::CorruptValue`] encountered.
    pub fn decode_postings(&self) -> CoreResult<Vec<Posting>> {
        self.postings.iter().map(Posting::from_raw).collect()
    }
}
