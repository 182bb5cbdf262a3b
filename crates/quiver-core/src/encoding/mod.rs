//! Binary codecs for stored posting data.
//!
//! # Value and Facet Codecs
//!
//! [`encode_value`] / [`decode_value`] convert one literal to and from its
//! canonical little-endian bytes. The type tag travels out of band, next to the
//! bytes, so decoding always takes the declared [`ValueType`](crate::ValueType).
//! [`encode_facet`] / [`decode_facet`] do the same for facets, which use their
//! own tag numbering but the same byte layouts.
//!
//! # Postings
//!
//! [`posting`] converts between the typed [`Posting`](crate::Posting) and the
//! stored [`RawPosting`](crate::RawPosting). A whole posting list is persisted as
//! a versioned `bincode` envelope via the [`Encoder`] / [`Decoder`] traits.
//!
//! # Key Encoding
//!
//! The [`keys`] module lays out posting-list and index keys so that byte order
//! equals [`Key`](crate::Key) order and data keys sort before index keys.

mod facet;
pub mod keys;
pub mod posting;
mod traits;
mod value;
pub mod wkb;

#[cfg(test)]
mod proptest_tests;

pub use facet::{decode_facet, encode_facet};
pub use traits::{Decoder, Encoder, FORMAT_VERSION};
pub use value::{decode_value, encode_value, encode_value_to};
