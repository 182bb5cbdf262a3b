//! Parsing quad lines back into postings.

use quiver_core::{CoreResult, Facet, FacetValue, Key, Posting, Uid, ValueType};
use thiserror::Error;

use super::literal::{infer_facet, parse_value_text, unescape_char, value_type_for_iri};

/// A quad line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column {column}: {message}")]
pub struct ParseError {
    /// 1-based byte column where the problem was found.
    pub column: usize,
    /// What was wrong.
    pub message: String,
}

/// One parsed quad line.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    /// The subject node.
    pub subject: Uid,
    /// The predicate.
    pub attr: String,
    /// The posting, with facets in the order they appeared.
    pub posting: Posting,
}

impl Quad {
    /// The posting-list key this quad belongs under.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the predicate is not a valid key predicate.
    pub fn key(&self) -> CoreResult<Key> {
        Key::new(self.attr.clone(), self.subject)
    }
}

/// Parse one quad line, with or without its trailing newline.
///
/// # Errors
///
/// Returns [`ParseError`] if the line does not follow the quad grammar or any
/// part of it fails validation.
pub fn parse_quad(line: &str) -> Result<Quad, ParseError> {
    let mut p = Parser { line, pos: 0 };

    let subject = p.iri()?;
    let subject = Uid::parse_hex(subject).ok_or_else(|| p.error(format!("subject {subject:?} is not a uid")))?;
    p.skip_ws();
    let attr = p.iri()?.to_owned();
    Key::new(attr.as_str(), subject).map_err(|e| p.error(e.to_string()))?;
    p.skip_ws();

    let mut posting = p.object()?;
    p.skip_ws();

    if p.peek() == Some('<') {
        let label = p.iri()?;
        posting = posting.with_label(label).map_err(|e| p.error(e.to_string()))?;
        p.skip_ws();
    }

    if p.peek() == Some('(') {
        for facet in p.facets()? {
            posting = posting.with_facet(facet);
        }
        p.skip_ws();
    }

    p.expect('.')?;
    p.skip_ws();
    if !p.rest().is_empty() {
        return Err(p.error(format!("unexpected {:?} after end of statement", p.rest())));
    }
    Ok(Quad { subject, attr, posting })
}

struct Parser<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError { column: self.pos + 1, message: message.into() }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected {expected:?}, found {c:?}"))),
            None => Err(self.error(format!("expected {expected:?}, found end of line"))),
        }
    }

    /// `<...>`, returning the inside.
    fn iri(&mut self) -> Result<&'a str, ParseError> {
        self.expect('<')?;
        let rest = self.rest();
        let end = rest.find('>').ok_or_else(|| self.error("unterminated <...>"))?;
        self.pos += end + 1;
        Ok(&rest[..end])
    }

    /// `"..."` with escapes, returning the unescaped text.
    fn quoted(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => {
                    let c = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
                    let unescaped =
                        unescape_char(c).ok_or_else(|| self.error(format!("unknown escape \\{c}")))?;
                    text.push(unescaped);
                }
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }
    }

    fn object(&mut self) -> Result<Posting, ParseError> {
        match self.peek() {
            Some('<') => {
                let target = self.iri()?;
                Uid::parse_hex(target)
                    .map(Posting::node)
                    .ok_or_else(|| self.error(format!("object {target:?} is not a uid")))
            }
            Some('"') => {
                let text = self.quoted()?;
                if self.rest().starts_with('@') {
                    self.bump();
                    let lang_len = self.rest().find(char::is_whitespace).unwrap_or(self.rest().len());
                    let lang = &self.rest()[..lang_len];
                    self.pos += lang_len;
                    return Posting::literal(text).with_lang(lang).map_err(|e| self.error(e.to_string()));
                }
                let value_type = if self.rest().starts_with("^^") {
                    self.pos += 2;
                    let iri = self.iri()?;
                    value_type_for_iri(iri).ok_or_else(|| self.error(format!("unknown datatype <{iri}>")))?
                } else {
                    ValueType::String
                };
                parse_value_text(text, value_type).map(Posting::literal).map_err(|e| self.error(e))
            }
            Some(c) => Err(self.error(format!("expected an object, found {c:?}"))),
            None => Err(self.error("expected an object, found end of line")),
        }
    }

    /// `(k=v,...)`.
    fn facets(&mut self) -> Result<Vec<Facet>, ParseError> {
        self.expect('(')?;
        let mut facets = Vec::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(facets);
        }
        loop {
            self.skip_ws();
            let rest = self.rest();
            let eq = rest.find('=').ok_or_else(|| self.error("facet without '='"))?;
            let key = rest[..eq].trim_end();
            self.pos += eq + 1;
            self.skip_ws();

            let value = if self.peek() == Some('"') {
                FacetValue::String(self.quoted()?)
            } else {
                let rest = self.rest();
                let end = rest.find([',', ')']).ok_or_else(|| self.error("unterminated facet clause"))?;
                self.pos += end;
                infer_facet(rest[..end].trim_end())
            };
            facets.push(Facet::new(key, value).map_err(|e| self.error(e.to_string()))?);

            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(')') => return Ok(facets),
                Some(c) => return Err(self.error(format!("expected ',' or ')', found {c:?}"))),
                None => return Err(self.error("unterminated facet clause")),
            }
        }
    }
}
