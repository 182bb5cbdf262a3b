//! Rendering postings as quad lines.

use std::fmt::Write as _;

use quiver_core::{Object, Posting, Uid, Value};

use super::literal::{datatype_iri, write_facet_value, write_value_text};

/// Append the quad line for `posting` under `(subject, attr)` to `out`, without
/// a trailing newline.
///
/// `attr` is expected to be a valid predicate, as every [`Key`](quiver_core::Key)
/// predicate is.
pub fn write_quad(out: &mut String, subject: Uid, attr: &str, posting: &Posting) {
    let _ = write!(out, "<{subject}> <{attr}> ");

    match posting.object() {
        Object::Node(target) => {
            let _ = write!(out, "<{target}>");
        }
        Object::Literal { value, lang } => {
            out.push('"');
            write_value_text(out, value);
            out.push('"');
            match (value, lang) {
                (Value::String(_), Some(lang)) => {
                    let _ = write!(out, "@{lang}");
                }
                _ => {
                    if let Some(iri) = datatype_iri(value.value_type()) {
                        let _ = write!(out, "^^<{iri}>");
                    }
                }
            }
        }
    }

    if let Some(label) = posting.label() {
        let _ = write!(out, " <{label}>");
    }

    let facets = posting.sorted_facets();
    if !facets.is_empty() {
        out.push_str(" (");
        for (i, facet) in facets.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(facet.key());
            out.push('=');
            write_facet_value(out, facet.value());
        }
        out.push(')');
    }

    out.push_str(" .");
}

/// The quad line for `posting` as a new string.
#[must_use]
pub fn format_quad(subject: Uid, attr: &str, posting: &Posting) -> String {
    let mut out = String::new();
    write_quad(&mut out, subject, attr, posting);
    out
}
