//! Property-based tests for encoding round-trips.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use geo_types::{Coord, Geometry, LineString, Point};
use proptest::prelude::*;

use crate::encoding::keys::{decode_data_key, encode_data_key};
use crate::encoding::{decode_facet, decode_value, encode_facet, encode_value, Decoder, Encoder};
use crate::types::{Date, DateTime, Facet, FacetValue, Key, Posting, PostingList, Uid, Value};

/// Seconds covering years 1 through 9999 in UTC.
const MIN_SECS: i64 = -62_135_596_800;
const MAX_SECS: i64 = 253_402_300_799;

fn arb_datetime() -> impl Strategy<Value = DateTime> {
    // keep a day of margin so any offset stays within range
    (MIN_SECS + 86_400..MAX_SECS - 86_400, prop::option::of(-1439i16..=1439))
        .prop_filter("-1 is the UTC tag", |(_, off)| *off != Some(-1))
        .prop_map(|(secs, off)| DateTime::with_offset(secs, off).expect("in range"))
}

fn arb_coord() -> impl Strategy<Value = Coord<f64>> {
    (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(x, y)| Coord { x, y })
}

fn arb_geo() -> impl Strategy<Value = Geometry<f64>> {
    prop_oneof![
        arb_coord().prop_map(|c| Geometry::Point(Point(c))),
        prop::collection::vec(arb_coord(), 0..8).prop_map(|cs| Geometry::LineString(LineString(cs))),
    ]
}

/// Strategy for generating arbitrary literal `Value` instances.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        ".*".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Binary),
        any::<i32>().prop_map(Value::Int32),
        // Filter out NaN since NaN != NaN
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        (-719_162i64..2_932_896).prop_map(|d| Value::Date(Date::from_epoch_days(d).expect("in range"))),
        arb_datetime().prop_map(Value::DateTime),
        arb_geo().prop_map(Value::Geo),
        "\\$2a\\$10\\$[./A-Za-z0-9]{53}".prop_map(Value::Password),
    ]
}

fn arb_facet() -> impl Strategy<Value = Facet> {
    let value = prop_oneof![
        ".*".prop_map(FacetValue::String),
        any::<i32>().prop_map(FacetValue::Int32),
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(FacetValue::Float),
        any::<bool>().prop_map(FacetValue::Bool),
        arb_datetime().prop_map(FacetValue::DateTime),
    ];
    ("[a-z][a-z0-9_]{0,7}", value).prop_map(|(k, v)| Facet::new(k, v).expect("valid key"))
}

fn arb_posting() -> impl Strategy<Value = Posting> {
    let object = prop_oneof![
        any::<u64>().prop_map(|uid| Posting::node(Uid::new(uid))),
        arb_value().prop_map(Posting::literal),
        (".*", "[a-z]{2}(-[A-Z]{2})?")
            .prop_map(|(s, lang)| Posting::literal(s).with_lang(lang).expect("valid lang")),
    ];
    (object, prop::option::of("[a-z][a-z0-9]{0,7}"), prop::collection::vec(arb_facet(), 0..4))
        .prop_map(|(mut p, label, facets)| {
            if let Some(label) = label {
                p = p.with_label(label).expect("valid label");
            }
            for f in facets {
                p = p.with_facet(f);
            }
            p
        })
}

proptest! {
    #[test]
    fn value_roundtrip(value in arb_value()) {
        let bytes = encode_value(&value);
        let decoded = decode_value(&bytes, value.value_type()).expect("decoding should succeed");
        prop_assert_eq!(value, decoded);
    }

    #[test]
    fn fixed_width_values_have_fixed_width(value in arb_value()) {
        if let Some(width) = value.value_type().fixed_width() {
            prop_assert_eq!(encode_value(&value).len(), width);
        }
    }

    #[test]
    fn facet_roundtrip(facet in arb_facet()) {
        let decoded = decode_facet(&encode_facet(&facet)).expect("decoding should succeed");
        prop_assert_eq!(facet, decoded);
    }

    #[test]
    fn posting_roundtrip(posting in arb_posting()) {
        let decoded = Posting::from_raw(&posting.to_raw()).expect("decoding should succeed");
        prop_assert_eq!(posting, decoded);
    }

    #[test]
    fn posting_list_envelope_roundtrip(postings in prop::collection::vec(arb_posting(), 0..6)) {
        let list = PostingList { postings: postings.iter().map(Posting::to_raw).collect() };
        let bytes = list.encode().expect("encoding should succeed");
        prop_assert_eq!(PostingList::decode(&bytes).expect("decoding should succeed"), list);
    }

    #[test]
    fn key_order_is_byte_order(
        a in ("[a-z]{1,6}", any::<u64>()),
        b in ("[a-z]{1,6}", any::<u64>()),
    ) {
        let ka = Key::new(a.0, a.1).unwrap();
        let kb = Key::new(b.0, b.1).unwrap();
        let (ea, eb) = (encode_data_key(&ka), encode_data_key(&kb));
        prop_assert_eq!(ka.cmp(&kb), ea.cmp(&eb));
        prop_assert_eq!(decode_data_key(&ea).unwrap(), ka);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..48), tag in 0u8..10) {
        if let Some(ty) = crate::types::ValueType::from_tag(tag) {
            let _ = decode_value(&bytes, ty);
        }
    }
}
