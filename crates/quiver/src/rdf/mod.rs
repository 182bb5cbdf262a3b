//! Quad lines: the text form of a backup.
//!
//! One posting renders as one line:
//!
//! ```text
//! <0x{subject}> <{attr}> OBJECT[ <{label}>][ ({facets})] .
//! ```
//!
//! where `OBJECT` is `<0x{target}>` for an edge to a node, `"text"` or
//! `"text"@lang` for a string, and `"text"^^<datatype>` for every other
//! literal type. Facets are sorted by key. [`parse_quad`] is the exact inverse
//! of [`write_quad`].

mod format;
mod literal;
mod parse;

pub use format::{format_quad, write_quad};
pub use literal::{datatype_iri, infer_facet, value_type_for_iri};
pub use parse::{parse_quad, ParseError, Quad};
