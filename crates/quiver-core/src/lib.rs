//! Quiver Core
//!
//! This crate provides the value model and byte-exact codecs of the Quiver
//! posting-list engine.
//!
//! # Overview
//!
//! - **Identifiers**: [`Uid`] for graph nodes, [`Key`] for posting lists
//! - **Values**: [`Value`] with one variant per literal [`ValueType`]
//! - **Facets**: [`Facet`] annotations with their own [`FacetType`]
//! - **Postings**: [`Posting`] (typed) and [`RawPosting`] (stored form)
//!
//! # Example
//!
//! ```
//! use quiver_core::encoding::{decode_value, encode_value};
//! use quiver_core::{Value, ValueType};
//!
//! let bytes = encode_value(&Value::Int32(123));
//! assert_eq!(bytes, vec![0x7B, 0x00, 0x00, 0x00]);
//!
//! let decoded = decode_value(&bytes, ValueType::Int32).unwrap();
//! assert_eq!(decoded, Value::Int32(123));
//! ```
//!
//! # Modules
//!
//! - [`types`] - Core data types
//! - [`encoding`] - Value, facet, posting and key codecs
//! - [`error`] - Error types ([`CoreError`])

#![deny(clippy::unwrap_used)]

pub mod encoding;
pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::{
    Date, DateTime, Facet, FacetType, FacetValue, Key, Object, Posting, PostingList, RawFacet,
    RawPosting, Uid, Value, ValueType,
};
