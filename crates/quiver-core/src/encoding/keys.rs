//! Key encoding for ordered storage.
//!
//! # Key Prefixes
//!
//! - `0x00` - Data keys: `[0x00][attr_len: u16][attr][entity: u64]`
//! - `0x01` - Index keys: `[0x01][attr_len: u16][attr][token bytes]`
//!
//! All numeric values are big-endian, so byte order equals [`Key`] order and
//! every data key sorts before every index key. A scan over
//! `[PREFIX_DATA, PREFIX_INDEX)` therefore visits exactly the posting lists.

use crate::types::{Key, Uid};
use crate::{CoreError, CoreResult};

/// Key prefix for posting-list data.
pub const PREFIX_DATA: u8 = 0x00;
/// Key prefix for index entries.
pub const PREFIX_INDEX: u8 = 0x01;

/// Encode a posting-list key.
#[must_use]
pub fn encode_data_key(key: &Key) -> Vec<u8> {
    let attr = key.attr().as_bytes();
    let mut buf = Vec::with_capacity(1 + 2 + attr.len() + 8);
    buf.push(PREFIX_DATA);
    push_attr(attr, &mut buf);
    buf.extend_from_slice(&key.entity().as_u64().to_be_bytes());
    buf
}

/// Encode an index key for `token` under the predicate `attr`.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] if `attr` is empty or longer than 65535 bytes.
pub fn encode_index_key(attr: &str, token: &[u8]) -> CoreResult<Vec<u8>> {
    if attr.is_empty() || attr.len() > usize::from(u16::MAX) {
        return Err(CoreError::validation(format!("predicate length {} out of range", attr.len())));
    }
    let mut buf = Vec::with_capacity(1 + 2 + attr.len() + token.len());
    buf.push(PREFIX_INDEX);
    push_attr(attr.as_bytes(), &mut buf);
    buf.extend_from_slice(token);
    Ok(buf)
}

fn push_attr(attr: &[u8], buf: &mut Vec<u8>) {
    let len = u16::try_from(attr.len()).unwrap_or(u16::MAX);
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(attr);
}

/// The exclusive upper bound of the data keyspace.
#[must_use]
pub const fn data_keys_end() -> [u8; 1] {
    [PREFIX_INDEX]
}

/// A classified raw key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedKey {
    /// A posting-list key.
    Data(Key),
    /// An index entry.
    Index {
        /// Indexed predicate.
        attr: String,
        /// Token bytes.
        token: Vec<u8>,
    },
}

/// Classify and decode a raw key.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] for an unknown prefix, truncation, trailing
/// bytes on a data key, or a predicate that is not valid.
pub fn parse_key(bytes: &[u8]) -> CoreResult<ParsedKey> {
    let (&prefix, rest) =
        bytes.split_first().ok_or_else(|| CoreError::Encoding("empty key".to_owned()))?;
    match prefix {
        PREFIX_DATA => {
            let (attr, rest) = split_attr(rest)?;
            let entity: [u8; 8] = rest.try_into().map_err(|_| {
                CoreError::Encoding(format!("data key has {} entity bytes", rest.len()))
            })?;
            let key = Key::new(attr, Uid::new(u64::from_be_bytes(entity)))
                .map_err(|e| CoreError::Encoding(e.to_string()))?;
            Ok(ParsedKey::Data(key))
        }
        PREFIX_INDEX => {
            let (attr, token) = split_attr(rest)?;
            Ok(ParsedKey::Index { attr: attr.to_owned(), token: token.to_vec() })
        }
        other => Err(CoreError::Encoding(format!("unknown key prefix {other:#04x}"))),
    }
}

/// Decode a data key.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if `bytes` is not a well-formed data key.
pub fn decode_data_key(bytes: &[u8]) -> CoreResult<Key> {
    match parse_key(bytes)? {
        ParsedKey::Data(key) => Ok(key),
        ParsedKey::Index { attr, .. } => {
            Err(CoreError::Encoding(format!("index key for <{attr}> where a data key was expected")))
        }
    }
}

/// Read just the predicate of a data or index key, without allocating.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] on truncation or invalid UTF-8.
pub fn key_attr(bytes: &[u8]) -> CoreResult<&str> {
    let rest = bytes.get(1..).ok_or_else(|| CoreError::Encoding("empty key".to_owned()))?;
    split_attr(rest).map(|(attr, _)| attr)
}

fn split_attr(bytes: &[u8]) -> CoreResult<(&str, &[u8])> {
    let truncated = || CoreError::Encoding("truncated key".to_owned());
    let len_bytes: [u8; 2] = bytes.get(..2).and_then(|b| b.try_into().ok()).ok_or_else(truncated)?;
    let len = usize::from(u16::from_be_bytes(len_bytes));
    let attr = bytes.get(2..2 + len).ok_or_else(truncated)?;
    let attr = std::str::from_utf8(attr).map_err(|e| CoreError::Encoding(e.to_string()))?;
    Ok((attr, &bytes[2 + len..]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn data_key_layout() {
        let key = Key::new("friend", 4).unwrap();
        let bytes = encode_data_key(&key);
        assert_eq!(bytes[0], PREFIX_DATA);
        assert_eq!(&bytes[1..3], [0, 6]);
        assert_eq!(&bytes[3..9], b"friend");
        assert_eq!(&bytes[9..], 4u64.to_be_bytes());
        assert_eq!(decode_data_key(&bytes).unwrap(), key);
        assert_eq!(key_attr(&bytes).unwrap(), "friend");
    }

    #[test]
    fn byte_order_matches_key_order() {
        let mut keys = vec![
            Key::new("friend", 300).unwrap(),
            Key::new("name", 2).unwrap(),
            Key::new("friend", 1).unwrap(),
            Key::new("age", u64::MAX).unwrap(),
            Key::new("fiend", 9).unwrap(),
        ];
        let mut encoded: Vec<Vec<u8>> = keys.iter().map(encode_data_key).collect();
        keys.sort();
        encoded.sort();
        let decoded: Vec<Key> = encoded.iter().map(|b| decode_data_key(b).unwrap()).collect();
        assert_eq!(decoded, keys);
    }

    #[test]
    fn index_keys_sort_after_data() {
        let data = encode_data_key(&Key::new("zzzzzzzz", u64::MAX).unwrap());
        let index = encode_index_key("a", b"tok").unwrap();
        assert!(data < index);
        assert!(data.as_slice() < data_keys_end().as_slice());
        assert!(index.as_slice() >= data_keys_end().as_slice());
        assert_eq!(
            parse_key(&index).unwrap(),
            ParsedKey::Index { attr: "a".into(), token: b"tok".to_vec() }
        );
        assert!(decode_data_key(&index).is_err());
    }

    #[test]
    fn malformed_keys() {
        assert!(parse_key(&[]).is_err());
        assert!(parse_key(&[0x07, 0, 1, b'a']).is_err());
        assert!(parse_key(&[PREFIX_DATA, 0, 5, b'a']).is_err());
        // entity truncated
        assert!(parse_key(&[PREFIX_DATA, 0, 1, b'a', 0, 0]).is_err());
        // empty predicate
        assert!(parse_key(&[PREFIX_DATA, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]).is_err());
        assert!(encode_index_key("", b"x").is_err());
    }
}
