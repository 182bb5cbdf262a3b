//! Literal text for values and facets.

use std::fmt::Write as _;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use geo_types::Geometry;
use quiver_core::{Date, DateTime, FacetValue, Value, ValueType};
use wkt::ToWkt;

const XS_BASE64: &str = "xs:base64Binary";
const XS_INT: &str = "xs:int";
const XS_FLOAT: &str = "xs:float";
const XS_BOOLEAN: &str = "xs:boolean";
const XS_DATE: &str = "xs:date";
const XS_DATETIME: &str = "xs:dateTime";
const GEO_WKT: &str = "geo:wktLiteral";
const XS_PASSWORD: &str = "xs:password";
const XS_STRING: &str = "xs:string";

/// The datatype IRI a literal of `value_type` is written with.
///
/// `None` for strings, which are written bare or with a language tag, and for
/// UIDs, which are not literals.
#[must_use]
pub const fn datatype_iri(value_type: ValueType) -> Option<&'static str> {
    match value_type {
        ValueType::Binary => Some(XS_BASE64),
        ValueType::Int32 => Some(XS_INT),
        ValueType::Float => Some(XS_FLOAT),
        ValueType::Bool => Some(XS_BOOLEAN),
        ValueType::Date => Some(XS_DATE),
        ValueType::DateTime => Some(XS_DATETIME),
        ValueType::Geo => Some(GEO_WKT),
        ValueType::Password => Some(XS_PASSWORD),
        ValueType::String | ValueType::Uid => None,
    }
}

/// The literal type named by a datatype IRI.
#[must_use]
pub fn value_type_for_iri(iri: &str) -> Option<ValueType> {
    Some(match iri {
        XS_STRING => ValueType::String,
        XS_BASE64 => ValueType::Binary,
        XS_INT => ValueType::Int32,
        XS_FLOAT => ValueType::Float,
        XS_BOOLEAN => ValueType::Bool,
        XS_DATE => ValueType::Date,
        XS_DATETIME => ValueType::DateTime,
        GEO_WKT => ValueType::Geo,
        XS_PASSWORD => ValueType::Password,
        _ => return None,
    })
}

/// Append `s` with `\`, `"`, LF, CR and TAB escaped.
pub(super) fn write_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
}

/// The character an escape sequence `\c` stands for.
pub(super) const fn unescape_char(c: char) -> Option<char> {
    match c {
        '\\' => Some('\\'),
        '"' => Some('"'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

/// Append the escaped text of a literal (without the surrounding quotes).
pub(super) fn write_value_text(out: &mut String, value: &Value) {
    match value {
        Value::String(s) | Value::Password(s) => write_escaped(out, s),
        Value::Binary(b) => STANDARD.encode_string(b, out),
        Value::Int32(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => write_float(out, *f),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Date(d) => {
            let _ = write!(out, "{d}");
        }
        Value::DateTime(dt) => {
            let _ = write!(out, "{dt}");
        }
        Value::Geo(g) => {
            let _ = write!(out, "{}", g.to_wkt());
        }
    }
}

/// Shortest round-trip form; always has a `.` or an exponent so it never
/// reads back as an integer.
fn write_float(out: &mut String, f: f64) {
    let _ = write!(out, "{f:?}");
}

/// Parse the unescaped text of a literal declared as `value_type`.
pub(super) fn parse_value_text(text: String, value_type: ValueType) -> Result<Value, String> {
    let value = match value_type {
        ValueType::String => Value::String(text),
        ValueType::Password => Value::Password(text),
        ValueType::Binary => {
            Value::Binary(STANDARD.decode(&text).map_err(|e| format!("invalid base64: {e}"))?)
        }
        ValueType::Int32 => {
            Value::Int32(text.parse().map_err(|e| format!("invalid int {text:?}: {e}"))?)
        }
        ValueType::Float => {
            Value::Float(text.parse().map_err(|e| format!("invalid float {text:?}: {e}"))?)
        }
        ValueType::Bool => Value::Bool(parse_bool(&text).ok_or_else(|| format!("invalid boolean {text:?}"))?),
        ValueType::Date => Value::Date(Date::parse(&text).map_err(|e| e.to_string())?),
        ValueType::DateTime => Value::DateTime(DateTime::parse(&text).map_err(|e| e.to_string())?),
        ValueType::Geo => Value::Geo(parse_wkt(&text)?),
        ValueType::Uid => return Err("uid is not a literal type".to_owned()),
    };
    Ok(value)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_wkt(s: &str) -> Result<Geometry<f64>, String> {
    wkt::Wkt::<f64>::from_str(s)
        .map_err(|e| format!("invalid WKT {s:?}: {e}"))
        .and_then(|w| w.try_into().map_err(|e: wkt::conversion::Error| format!("{e:?}")))
}

/// Append a facet value as it appears inside a facet clause.
pub(super) fn write_facet_value(out: &mut String, value: &FacetValue) {
    match value {
        FacetValue::String(s) if needs_quotes(s) => {
            out.push('"');
            write_escaped(out, s);
            out.push('"');
        }
        FacetValue::String(s) => out.push_str(s),
        FacetValue::Int32(i) => {
            let _ = write!(out, "{i}");
        }
        FacetValue::Float(f) => write_float(out, *f),
        FacetValue::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        FacetValue::DateTime(dt) => {
            let _ = write!(out, "{dt}");
        }
    }
}

/// Whether a string facet must be quoted to read back as the same string.
fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.chars().any(|c| matches!(c, ',' | ')' | '"' | '\\') || c.is_whitespace() || c.is_control())
        || !matches!(infer_facet(s), FacetValue::String(_))
}

/// The facet value an unquoted facet text stands for.
///
/// Tried in order: `i32`, float, `true`/`false`, date-time (RFC 3339, naive
/// `YYYY-MM-DDTHH:MM:SS` as UTC, or a bare `YYYY-MM-DD` as midnight UTC);
/// anything else is a string.
#[must_use]
pub fn infer_facet(s: &str) -> FacetValue {
    if let Ok(i) = s.parse::<i32>() {
        return FacetValue::Int32(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return FacetValue::Float(f);
    }
    if let Some(b) = parse_bool(s) {
        return FacetValue::Bool(b);
    }
    if let Ok(dt) = DateTime::parse(s) {
        return FacetValue::DateTime(dt);
    }
    if let Some(dt) = Date::parse(s)
        .ok()
        .and_then(|d| d.epoch_days().checked_mul(86_400))
        .and_then(|secs| DateTime::from_unix(secs).ok())
    {
        return FacetValue::DateTime(dt);
    }
    FacetValue::String(s.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo_types::point;

    use super::*;

    fn text(value: &Value) -> String {
        let mut out = String::new();
        write_value_text(&mut out, value);
        out
    }

    fn facet_text(value: &FacetValue) -> String {
        let mut out = String::new();
        write_facet_value(&mut out, value);
        out
    }

    #[test]
    fn datatype_iris_are_inverse() {
        for tag in 0..10 {
            let ty = ValueType::from_tag(tag).unwrap();
            if let Some(iri) = datatype_iri(ty) {
                assert_eq!(value_type_for_iri(iri), Some(ty));
            }
        }
        assert_eq!(value_type_for_iri("xs:string"), Some(ValueType::String));
        assert_eq!(value_type_for_iri("xs:long"), None);
    }

    #[test]
    fn literal_texts() {
        assert_eq!(text(&Value::Int32(-7)), "-7");
        assert_eq!(text(&Value::Float(1.0)), "1.0");
        assert_eq!(text(&Value::Float(1e300)), "1e300");
        assert_eq!(text(&Value::Float(f64::NAN)), "NaN");
        assert_eq!(text(&Value::Bool(true)), "true");
        assert_eq!(text(&Value::Binary(b"hi".to_vec())), "aGk=");
        assert_eq!(text(&Value::Date(Date::from_ymd(2005, 5, 2).unwrap())), "2005-05-02");
        assert_eq!(text(&Value::from("a\"b\\c\nd")), "a\\\"b\\\\c\\nd");
        assert!(text(&Value::Geo(point!(x: 1.5, y: 2.0).into())).starts_with("POINT"));
    }

    #[test]
    fn literal_text_roundtrips() {
        let values = [
            Value::Int32(i32::MIN),
            Value::Float(-0.0),
            Value::Float(f64::INFINITY),
            Value::Binary(vec![0, 255, 7]),
            Value::DateTime(DateTime::parse("2005-05-02T15:04:05+05:30").unwrap()),
            Value::Geo(point!(x: -122.4, y: 37.7).into()),
        ];
        for value in values {
            let parsed = parse_value_text(text(&value), value.value_type()).unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn bad_literal_texts() {
        assert!(parse_value_text("12x".into(), ValueType::Int32).is_err());
        assert!(parse_value_text("yes".into(), ValueType::Bool).is_err());
        assert!(parse_value_text("!!".into(), ValueType::Binary).is_err());
        assert!(parse_value_text("POINT(1)".into(), ValueType::Geo).is_err());
        assert!(parse_value_text(String::new(), ValueType::Uid).is_err());
    }

    #[test]
    fn facet_inference_order() {
        assert_eq!(infer_facet("33"), FacetValue::Int32(33));
        assert_eq!(infer_facet("3000000000"), FacetValue::Float(3e9));
        assert_eq!(infer_facet("1.5"), FacetValue::Float(1.5));
        assert_eq!(infer_facet("true"), FacetValue::Bool(true));
        assert_eq!(
            infer_facet("2006-01-02T15:04:05Z"),
            FacetValue::DateTime(DateTime::parse("2006-01-02T15:04:05Z").unwrap())
        );
        assert_eq!(
            infer_facet("1970-01-02"),
            FacetValue::DateTime(DateTime::from_unix(86_400).unwrap())
        );
        assert_eq!(infer_facet("close"), FacetValue::String("close".into()));
    }

    #[test]
    fn string_facets_are_quoted_when_ambiguous() {
        assert_eq!(facet_text(&FacetValue::from("close")), "close");
        assert_eq!(facet_text(&FacetValue::from("33")), "\"33\"");
        assert_eq!(facet_text(&FacetValue::from("true")), "\"true\"");
        assert_eq!(facet_text(&FacetValue::from("nan")), "\"nan\"");
        assert_eq!(facet_text(&FacetValue::from("")), "\"\"");
        assert_eq!(facet_text(&FacetValue::from("a,b")), "\"a,b\"");
        assert_eq!(facet_text(&FacetValue::from("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(facet_text(&FacetValue::Int32(33)), "33");
        assert_eq!(facet_text(&FacetValue::Float(2.0)), "2.0");
    }
}
