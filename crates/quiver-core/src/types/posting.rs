//! Postings: one edge occurrence under a posting-list key.
//!
//! There are two representations. [`RawPosting`] is the stored shape: a type
//! tag, canonical value bytes and raw facets, exactly as they sit on disk.
//! [`Posting`] is the typed model, where the object is either a node or a
//! decoded literal, so a UID edge can never carry stray value bytes.
//! Conversion between the two lives in
//! [`encoding::posting`](crate::encoding::posting).

use serde::{Deserialize, Serialize};

use super::{validate_iri_token, Facet, Uid, Value, ValueType};
use crate::{CoreError, CoreResult};

/// What a posting points at.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// An edge to another node.
    Node(Uid),
    /// A literal value, with a language tag for strings.
    Literal {
        /// The value.
        value: Value,
        /// Language tag; only string literals carry one.
        lang: Option<String>,
    },
}

/// A typed posting.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    object: Object,
    label: Option<String>,
    facets: Vec<Facet>,
}

impl Posting {
    /// A posting pointing at another node.
    #[must_use]
    pub const fn node(target: Uid) -> Self {
        Self { object: Object::Node(target), label: None, facets: Vec::new() }
    }

    /// A posting holding a literal value.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self {
            object: Object::Literal { value: value.into(), lang: None },
            label: None,
            facets: Vec::new(),
        }
    }

    /// Attach a language tag.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the posting is not a string literal
    /// or the tag is not of the form `[A-Za-z0-9-]+`.
    pub fn with_lang(mut self, lang: impl Into<String>) -> CoreResult<Self> {
        let lang = lang.into();
        validate_lang(&lang)?;
        match &mut self.object {
            Object::Literal { value: Value::String(_), lang: slot } => {
                *slot = Some(lang);
                Ok(self)
            }
            _ => Err(CoreError::validation("language tags apply to string literals only")),
        }
    }

    /// Attach a provenance label.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the label cannot appear inside `<...>`.
    pub fn with_label(mut self, label: impl Into<String>) -> CoreResult<Self> {
        let label = label.into();
        validate_iri_token("label", &label)?;
        self.label = Some(label);
        Ok(self)
    }

    /// Attach a facet. Facets keep insertion order here; rendering sorts them.
    #[must_use]
    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    /// The object of the edge.
    #[inline]
    #[must_use]
    pub const fn object(&self) -> &Object {
        &self.object
    }

    /// The stored type tag.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match &self.object {
            Object::Node(_) => ValueType::Uid,
            Object::Literal { value, .. } => value.value_type(),
        }
    }

    /// The language tag, if any.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        match &self.object {
            Object::Literal { lang, .. } => lang.as_deref(),
            Object::Node(_) => None,
        }
    }

    /// The provenance label, if any.
    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Facets in insertion order.
    #[inline]
    #[must_use]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Facets sorted by key, the order they are rendered in.
    #[must_use]
    pub fn sorted_facets(&self) -> Vec<&Facet> {
        let mut facets: Vec<&Facet> = self.facets.iter().collect();
        facets.sort_by(|a, b| a.key().cmp(b.key()));
        facets
    }

    pub(crate) fn from_parts(object: Object, label: Option<String>, facets: Vec<Facet>) -> Self {
        Self { object, label, facets }
    }
}

pub(crate) fn validate_lang(lang: &str) -> CoreResult<()> {
    if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(CoreError::validation(format!("invalid language tag {lang:?}")));
    }
    Ok(())
}

/// A facet as stored: key, type tag, canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFacet {
    /// The facet key.
    pub key: String,
    /// [`FacetType`](super::FacetType) tag.
    pub val_type: u8,
    /// Canonical value bytes.
    pub value: Vec<u8>,
}

/// A posting as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPosting {
    /// Target node for UID postings, 0 for literals.
    pub uid: u64,
    /// [`ValueType`] tag.
    pub val_type: u8,
    /// Canonical value bytes; empty for UID postings.
    pub value: Vec<u8>,
    /// Language tag, empty for none.
    pub lang: String,
    /// Provenance label, empty for none.
    pub label: String,
    /// Facets in attachment order.
    pub facets: Vec<RawFacet>,
}

impl RawPosting {
    /// Whether `other` describes the same edge object (and would replace this
    /// one in a posting list).
    #[must_use]
    pub fn same_object(&self, other: &Self) -> bool {
        if self.val_type != other.val_type {
            return false;
        }
        if self.val_type == ValueType::Uid.tag() {
            return self.uid == other.uid;
        }
        self.value == other.value && self.lang == other.lang
    }
}

/// The stored envelope of one posting list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    /// Postings in insertion order.
    pub postings: Vec<RawPosting>,
}

impl PostingList {
    /// Add a posting, replacing any posting with the same object.
    pub fn upsert(&mut self, posting: RawPosting) {
        match self.postings.iter_mut().find(|p| p.same_object(&posting)) {
            Some(existing) => *existing = posting,
            None => self.postings.push(posting),
        }
    }

    /// Number of postings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the list holds no postings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw_uid(target: u64) -> RawPosting {
        RawPosting {
            uid: target,
            val_type: ValueType::Uid.tag(),
            value: Vec::new(),
            lang: String::new(),
            label: String::new(),
            facets: Vec::new(),
        }
    }

    #[test]
    fn lang_only_on_strings() {
        assert!(Posting::literal("photon").with_lang("en").is_ok());
        assert!(Posting::literal(5i32).with_lang("en").is_err());
        assert!(Posting::node(Uid::new(5)).with_lang("en").is_err());
        assert!(Posting::literal("photon").with_lang("e n").is_err());
    }

    #[test]
    fn label_validation() {
        assert!(Posting::node(Uid::new(5)).with_label("author0").is_ok());
        assert!(Posting::node(Uid::new(5)).with_label("").is_err());
        assert!(Posting::node(Uid::new(5)).with_label("a>b").is_err());
    }

    #[test]
    fn sorted_facets_orders_by_key() {
        let p = Posting::node(Uid::new(5))
            .with_facet(Facet::new("since", "x").unwrap())
            .with_facet(Facet::new("close", true).unwrap())
            .with_facet(Facet::new("age", 33).unwrap());
        let keys: Vec<&str> = p.sorted_facets().iter().map(|f| f.key()).collect();
        assert_eq!(keys, ["age", "close", "since"]);
        // insertion order is untouched
        assert_eq!(p.facets()[0].key(), "since");
    }

    #[test]
    fn upsert_replaces_same_object() {
        let mut list = PostingList::default();
        list.upsert(raw_uid(5));
        list.upsert(raw_uid(6));
        let mut relabelled = raw_uid(5);
        relabelled.label = "author0".into();
        list.upsert(relabelled);

        assert_eq!(list.len(), 2);
        assert_eq!(list.postings[0].label, "author0");
        assert_eq!(list.postings[1].uid, 6);
    }
}
