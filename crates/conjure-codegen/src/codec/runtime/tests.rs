use super::*;
use crate::codec::{FieldCodec, KeyCodec, Presence, UNION_DISCRIMINANT};
use conjure_common::PrimitiveType;
use conjure_common::types::{EnumValue, MapEntries, RecordValue, UnionValue};

fn name(n: &str) -> TypeName {
    TypeName::new("com.example", n)
}

fn field(wire_name: &str, codec: ValueCodec, presence: Presence) -> FieldCodec {
    FieldCodec {
        wire_name: wire_name.into(),
        codec,
        presence,
    }
}

fn string() -> ValueCodec {
    ValueCodec::scalar(PrimitiveType::String)
}

fn integer() -> ValueCodec {
    ValueCodec::scalar(PrimitiveType::Integer)
}

/// Codecs for a small library schema
fn library() -> Codecs {
    let mut codecs = Codecs::new();
    codecs.insert(
        name("Book"),
        TypeCodec::Record {
            fields: vec![
                field("title", string(), Presence::Required),
                field("pages", ValueCodec::optional(integer()), Presence::Optional),
                field("tags", ValueCodec::list(string()), Presence::Collection),
                field(
                    "ratings",
                    ValueCodec::map(
                        KeyCodec::Scalar {
                            primitive: PrimitiveType::String,
                        },
                        ValueCodec::scalar(PrimitiveType::Double),
                    ),
                    Presence::Collection,
                ),
            ],
        },
    );
    codecs.insert(
        name("Point"),
        TypeCodec::Record {
            fields: vec![
                field("x", integer(), Presence::Required),
                field("y", integer(), Presence::Required),
            ],
        },
    );
    codecs.insert(
        name("Status"),
        TypeCodec::Enum {
            values: vec!["IN_PROGRESS".into(), "DONE".into()],
        },
    );
    codecs.insert(
        name("Shape"),
        TypeCodec::Union {
            discriminant: UNION_DISCRIMINANT.into(),
            variants: vec![
                field("str", string(), Presence::Required),
                field("point", ValueCodec::named(name("Point")), Presence::Required),
                field("note", ValueCodec::optional(string()), Presence::Optional),
            ],
        },
    );
    codecs.insert(
        name("MaybeCount"),
        TypeCodec::Alias {
            strategy: AliasStrategy::Nullable,
            item: integer(),
        },
    );
    codecs.insert(
        name("Labels"),
        TypeCodec::Alias {
            strategy: AliasStrategy::Value,
            item: ValueCodec::list(string()),
        },
    );
    codecs.insert(
        name("Holder"),
        TypeCodec::Record {
            fields: vec![
                field("field", ValueCodec::list(string()), Presence::Collection),
                field("labels", ValueCodec::named(name("Labels")), Presence::Collection),
                field("count", ValueCodec::named(name("MaybeCount")), Presence::Optional),
            ],
        },
    );
    codecs
}

fn decode(codecs: &Codecs, n: &str, json: &str, strictness: Strictness) -> Result<Value, DecodeError> {
    codecs.decode_named(json.as_bytes(), &name(n), strictness)
}

fn encode(codecs: &Codecs, n: &str, value: &Value) -> String {
    String::from_utf8(codecs.encode_named(value, &name(n)).unwrap()).unwrap()
}

#[test]
fn record_round_trip_fills_defaults() {
    let codecs = library();
    let decoded = decode(&codecs, "Book", r#"{"title":"Dune","tags":["sf"]}"#, Strictness::Lenient)
        .unwrap();

    let expected = Value::Record(
        RecordValue::new()
            .with("title", "Dune")
            .with("pages", Value::none())
            .with("tags", Value::List(vec!["sf".into()]))
            .with("ratings", MapEntries::new()),
    );
    assert_eq!(decoded, expected);
    assert_eq!(
        encode(&codecs, "Book", &decoded),
        r#"{"title":"Dune","tags":["sf"],"ratings":{}}"#
    );

    let again = decode(&codecs, "Book", &encode(&codecs, "Book", &decoded), Strictness::Strict)
        .unwrap();
    assert_eq!(again, decoded);
}

#[test]
fn record_fields_emit_in_declaration_order() {
    let codecs = library();
    let value = Value::Record(
        RecordValue::new()
            .with("ratings", MapEntries::new())
            .with("pages", Value::some(412))
            .with("title", "Dune"),
    );
    assert_eq!(
        encode(&codecs, "Book", &value),
        r#"{"title":"Dune","pages":412,"tags":[],"ratings":{}}"#
    );
}

#[test]
fn map_encoding_is_canonical() {
    let codecs = library();
    let codec = ValueCodec::map(
        KeyCodec::Scalar {
            primitive: PrimitiveType::String,
        },
        integer(),
    );

    let forward: MapEntries = [("b", 2), ("a", 1)].into_iter().collect();
    let backward: MapEntries = [("a", 1), ("b", 2)].into_iter().collect();
    let first = codecs.encode(&Value::Map(forward), &codec).unwrap();
    let second = codecs.encode(&Value::Map(backward), &codec).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, br#"{"a":1,"b":2}"#);

    // Integer keys sort by value, not by text
    let numeric = ValueCodec::map(
        KeyCodec::Scalar {
            primitive: PrimitiveType::Integer,
        },
        string(),
    );
    let entries: MapEntries = [(10, "ten"), (9, "nine")].into_iter().collect();
    assert_eq!(
        codecs.encode(&Value::Map(entries), &numeric).unwrap(),
        br#"{"9":"nine","10":"ten"}"#
    );
}

#[test]
fn missing_required_fields_are_all_listed() {
    let codecs = library();
    let err = decode(&codecs, "Point", r#"{"y":1}"#, Strictness::Lenient).unwrap_err();
    assert!(matches!(err, DecodeError::MissingFields { ref fields } if fields == &["x"]));

    let err = decode(&codecs, "Point", "{}", Strictness::Lenient).unwrap_err();
    assert!(matches!(err, DecodeError::MissingFields { ref fields } if fields == &["x", "y"]));
}

#[test]
fn duplicate_keys_rejected_in_both_modes() {
    let codecs = library();
    for strictness in [Strictness::Lenient, Strictness::Strict] {
        let err = decode(&codecs, "Point", r#"{"x":1,"x":2,"y":3}"#, strictness).unwrap_err();
        assert!(
            matches!(err, DecodeError::DuplicateField { ref field } if field == "x"),
            "{strictness:?}: {err:?}"
        );
    }

    let codec = ValueCodec::map(
        KeyCodec::Scalar {
            primitive: PrimitiveType::String,
        },
        integer(),
    );
    let err = codecs
        .decode(br#"{"a":1,"a":2}"#, &codec, Strictness::Lenient)
        .unwrap_err();
    assert!(matches!(err, DecodeError::DuplicateField { ref field } if field == "a"));
}

#[test]
fn colliding_map_keys_rejected() {
    let codecs = library();
    let codec = ValueCodec::map(
        KeyCodec::Scalar {
            primitive: PrimitiveType::Double,
        },
        string(),
    );
    let err = codecs
        .decode(br#"{"1":"a","1.0":"b"}"#, &codec, Strictness::Lenient)
        .unwrap_err();
    assert!(matches!(err, DecodeError::DuplicateMapKey { ref key } if key == "1.0"));
}

#[test]
fn unknown_fields_fail_only_when_strict() {
    let codecs = library();
    let json = r#"{"x":1,"y":2,"unexpected":true}"#;

    let lenient = decode(&codecs, "Point", json, Strictness::Lenient).unwrap();
    assert_eq!(
        lenient,
        Value::Record(RecordValue::new().with("x", 1).with("y", 2))
    );

    let err = decode(&codecs, "Point", json, Strictness::Strict).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownFields { ref fields } if fields == &["unexpected"]));
}

#[test]
fn missing_fields_reported_before_unknown_fields() {
    let codecs = library();
    let err = decode(&codecs, "Point", r#"{"x":1,"z":0}"#, Strictness::Strict).unwrap_err();
    assert!(matches!(err, DecodeError::MissingFields { ref fields } if fields == &["y"]));
}

#[test]
fn enum_keeps_unknown_values() {
    let codecs = library();
    let decoded = decode(&codecs, "Status", r#""NEW_VALUE""#, Strictness::Strict).unwrap();
    assert_eq!(decoded, Value::Enum(EnumValue::unknown("NEW_VALUE")));
    assert_eq!(decoded.as_enum().unwrap().variant(), EnumValue::UNKNOWN);
    assert_eq!(encode(&codecs, "Status", &decoded), r#""NEW_VALUE""#);

    let lower = decode(&codecs, "Status", r#""done""#, Strictness::Lenient).unwrap();
    assert_eq!(lower, Value::Enum(EnumValue::known("DONE")));
    assert_eq!(encode(&codecs, "Status", &lower), r#""DONE""#);
}

#[test]
fn unknown_enum_text_matching_a_declared_value_is_not_encoded() {
    let codecs = library();
    let ambiguous = Value::Enum(EnumValue::unknown("done"));
    assert!(matches!(
        codecs.encode_named(&ambiguous, &name("Status")),
        Err(EncodeError::TypeMismatch { ref found, .. }) if found == "done"
    ));

    let keyed = ValueCodec::map(KeyCodec::Enum { name: name("Status") }, integer());
    let entries: MapEntries = [(ambiguous, 1)].into_iter().collect();
    assert!(codecs.encode(&Value::Map(entries), &keyed).is_err());

    let undeclared: MapEntries = [(EnumValue::unknown("PAUSED"), 1)].into_iter().collect();
    let encoded = codecs.encode(&Value::Map(undeclared.clone()), &keyed).unwrap();
    assert_eq!(encoded, br#"{"PAUSED":1}"#);
    assert_eq!(
        codecs.decode(&encoded, &keyed, Strictness::Strict).unwrap(),
        Value::Map(undeclared)
    );
}

#[test]
fn enum_rejects_non_strings() {
    let codecs = library();
    let err = decode(&codecs, "Status", "3", Strictness::Lenient).unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }));
}

#[test]
fn union_dispatches_on_discriminant() {
    let codecs = library();
    let json = r#"{"type":"str","str":"x"}"#;
    let decoded = decode(&codecs, "Shape", json, Strictness::Strict).unwrap();
    assert_eq!(decoded, Value::Union(UnionValue::new("str", "x")));
    assert_eq!(encode(&codecs, "Shape", &decoded), json);

    let nested = decode(
        &codecs,
        "Shape",
        r#"{"type":"point","point":{"x":1,"y":2}}"#,
        Strictness::Lenient,
    )
    .unwrap();
    let union = nested.as_union().unwrap();
    assert_eq!(union.discriminant(), "point");
    assert_eq!(
        union.payload(),
        Some(&Value::Record(RecordValue::new().with("x", 1).with("y", 2)))
    );
}

#[test]
fn union_unknown_variant_round_trips() {
    let codecs = library();
    let json = r#"{"type":"circle","circle":{"radius":2}}"#;
    let decoded = decode(&codecs, "Shape", json, Strictness::Strict).unwrap();
    assert_eq!(
        decoded,
        Value::Union(UnionValue::new(
            "circle",
            serde_json::json!({ "radius": 2 })
        ))
    );
    assert_eq!(encode(&codecs, "Shape", &decoded), json);
}

#[test]
fn union_structural_errors() {
    let codecs = library();

    let err = decode(&codecs, "Shape", r#"{"str":"x"}"#, Strictness::Lenient).unwrap_err();
    assert!(matches!(err, DecodeError::MissingFields { ref fields } if fields == &["type"]));

    let err = decode(&codecs, "Shape", r#"{"type":"str"}"#, Strictness::Lenient).unwrap_err();
    assert!(matches!(err, DecodeError::MissingFields { ref fields } if fields == &["str"]));

    let err = decode(
        &codecs,
        "Shape",
        r#"{"type":"str","str":"x","extra":1}"#,
        Strictness::Strict,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::UnknownFields { ref fields } if fields == &["extra"]));

    // Optional payload may be omitted
    let note = decode(&codecs, "Shape", r#"{"type":"note"}"#, Strictness::Strict).unwrap();
    assert_eq!(note, Value::Union(UnionValue::new("note", Value::none())));
    assert_eq!(encode(&codecs, "Shape", &note), r#"{"type":"note"}"#);
}

#[test]
fn collections_default_to_empty() {
    let codecs = library();

    let decoded = decode(&codecs, "Holder", "{}", Strictness::Strict).unwrap();
    let record = decoded.as_record().unwrap();
    assert_eq!(record.get("field"), Some(&Value::List(vec![])));
    assert_eq!(record.get("labels"), Some(&Value::List(vec![])));
    assert_eq!(record.get("count"), Some(&Value::none()));

    let from_null = decode(&codecs, "Holder", r#"{"field":null}"#, Strictness::Strict).unwrap();
    assert_eq!(from_null, decoded);

    assert_eq!(
        encode(&codecs, "Holder", &Value::Record(RecordValue::new())),
        r#"{"field":[],"labels":[]}"#
    );
}

#[test]
fn nullable_alias_reads_null_as_absent() {
    let codecs = library();
    assert_eq!(
        decode(&codecs, "MaybeCount", "null", Strictness::Strict).unwrap(),
        Value::none()
    );
    assert_eq!(
        decode(&codecs, "MaybeCount", "7", Strictness::Strict).unwrap(),
        Value::some(7)
    );
    assert_eq!(encode(&codecs, "MaybeCount", &Value::some(7)), "7");
    assert_eq!(encode(&codecs, "MaybeCount", &Value::none()), "null");
}

#[test]
fn set_keeps_first_occurrence() {
    let codecs = library();
    let decoded = codecs
        .decode(br#"["a","b","a"]"#, &ValueCodec::set(string()), Strictness::Strict)
        .unwrap();
    let Value::Set(items) = &decoded else {
        panic!("expected a set, got {decoded:?}");
    };
    assert_eq!(items, &vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn set_dedupes_on_decoded_value() {
    let codecs = library();
    let decoded = codecs
        .decode(
            br#"["done","DONE","paused","PAUSED"]"#,
            &ValueCodec::set(ValueCodec::named(name("Status"))),
            Strictness::Strict,
        )
        .unwrap();
    assert_eq!(
        decoded,
        Value::Set(vec![
            EnumValue::known("DONE").into(),
            EnumValue::unknown("paused").into(),
            EnumValue::unknown("PAUSED").into(),
        ])
    );
}

#[test]
fn map_with_replaced_key_round_trips() {
    let codecs = library();
    let codec = ValueCodec::map(
        KeyCodec::Scalar {
            primitive: PrimitiveType::String,
        },
        integer(),
    );
    let mut entries = MapEntries::new();
    entries.insert("a", 1);
    entries.insert("a", 2);

    let encoded = codecs.encode(&Value::Map(entries.clone()), &codec).unwrap();
    assert_eq!(encoded, br#"{"a":2}"#);
    assert_eq!(
        codecs.decode(&encoded, &codec, Strictness::Strict).unwrap(),
        Value::Map(entries)
    );
}

#[test]
fn large_maps_and_sets_decode() {
    let codecs = library();
    let n = 40_000;

    let object = (0..n).map(|i| format!(r#""{i}":{i}"#)).collect::<Vec<_>>().join(",");
    let codec = ValueCodec::map(
        KeyCodec::Scalar {
            primitive: PrimitiveType::Integer,
        },
        integer(),
    );
    let decoded = codecs
        .decode(format!("{{{object}}}").as_bytes(), &codec, Strictness::Strict)
        .unwrap();
    let map = decoded.as_map().unwrap();
    assert_eq!(map.len(), n as usize);
    assert_eq!(map.get(&Value::Integer(n - 1)), Some(&Value::Integer(n - 1)));

    let array = (0..n).chain(0..n).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
    let decoded = codecs
        .decode(format!("[{array}]").as_bytes(), &ValueCodec::set(integer()), Strictness::Strict)
        .unwrap();
    let Value::Set(items) = decoded else {
        panic!("expected a set");
    };
    assert_eq!(items.len(), n as usize);
}

#[test]
fn double_sentinels() {
    let codecs = library();
    let codec = ValueCodec::scalar(PrimitiveType::Double);

    let nan = codecs.decode(br#""NaN""#, &codec, Strictness::Strict).unwrap();
    assert!(nan.as_double().is_some_and(|d| d.is_nan()));
    assert_eq!(
        codecs.encode(&Value::Double(f64::NEG_INFINITY), &codec).unwrap(),
        br#""-Infinity""#
    );

    let err = codecs
        .decode(br#""nan""#, &codec, Strictness::Lenient)
        .unwrap_err();
    assert!(matches!(err, DecodeError::InvalidValue { .. }));
}

#[test]
fn safelong_range_is_checked_on_encode() {
    let codecs = library();
    let codec = ValueCodec::scalar(PrimitiveType::Safelong);
    assert!(matches!(
        codecs.encode(&Value::Safelong(1 << 60), &codec),
        Err(EncodeError::TypeMismatch { .. })
    ));
    assert_eq!(
        codecs.encode(&Value::Safelong(42), &codec).unwrap(),
        b"42"
    );
}

#[test]
fn nested_failures_are_wrapped() {
    let mut codecs = library();
    codecs.insert(
        name("Route"),
        TypeCodec::Record {
            fields: vec![field("start", ValueCodec::named(name("Point")), Presence::Required)],
        },
    );

    let err = decode(&codecs, "Route", r#"{"start":{"x":1}}"#, Strictness::Lenient).unwrap_err();
    let DecodeError::Nested { type_name, .. } = &err else {
        panic!("expected nested error, got {err:?}");
    };
    assert_eq!(type_name, "com.example.Point");
    assert!(matches!(
        err.root_cause(),
        DecodeError::MissingFields { fields } if fields == &["y"]
    ));
}

#[test]
fn unknown_type_is_reported() {
    let codecs = Codecs::new();
    let err = codecs
        .decode_named(b"{}", &name("Nowhere"), Strictness::Lenient)
        .unwrap_err();
    assert!(matches!(err, DecodeError::UnknownType { ref type_name } if type_name == "com.example.Nowhere"));
    assert!(matches!(
        codecs.encode_named(&Value::Boolean(true), &name("Nowhere")),
        Err(EncodeError::UnknownType { .. })
    ));
}

#[test]
fn encode_rejects_malformed_records() {
    let codecs = library();

    let missing = Value::Record(RecordValue::new().with("x", 1));
    assert!(matches!(
        codecs.encode_named(&missing, &name("Point")),
        Err(EncodeError::MissingField { ref field, .. }) if field == "y"
    ));

    let undeclared = Value::Record(RecordValue::new().with("x", 1).with("y", 2).with("z", 3));
    assert!(matches!(
        codecs.encode_named(&undeclared, &name("Point")),
        Err(EncodeError::TypeMismatch { .. })
    ));
}

struct Shouting;

impl ExternalCodec for Shouting {
    fn encode(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::String(s) => Ok(Json::String(s.to_uppercase())),
            other => Err(EncodeError::type_mismatch("string", other.kind_name())),
        }
    }

    fn decode(&self, json: &Json, _strictness: Strictness) -> Result<Value, DecodeError> {
        match json {
            Json::String(s) => Ok(Value::String(s.to_lowercase())),
            other => Err(DecodeError::type_mismatch("string", other.kind())),
        }
    }
}

#[test]
fn external_types_use_fallback_unless_registered() {
    let codec = ValueCodec::External {
        name: TypeName::new("com.vendor", "Loud"),
        fallback: Box::new(string()),
    };
    let value = Value::from("quiet");

    let plain = Codecs::new();
    assert_eq!(plain.encode(&value, &codec).unwrap(), br#""quiet""#);

    let custom = Codecs::new().with_external(TypeName::new("com.vendor", "Loud"), Shouting);
    assert_eq!(custom.encode(&value, &codec).unwrap(), br#""QUIET""#);
    assert_eq!(
        custom.decode(br#""LOUD""#, &codec, Strictness::Strict).unwrap(),
        Value::from("loud")
    );

    assert!(matches!(
        custom.encode(&Value::Boolean(true), &codec),
        Err(EncodeError::External { ref type_name, ref message })
            if type_name == "com.vendor.Loud" && message == "Cannot encode boolean as string"
    ));
    assert!(matches!(
        custom.decode(b"3", &codec, Strictness::Strict),
        Err(DecodeError::External { ref type_name, .. }) if type_name == "com.vendor.Loud"
    ));
}

#[test]
fn strictness_from_flag() {
    assert_eq!(Strictness::from(true), Strictness::Strict);
    assert_eq!(Strictness::from(false), Strictness::Lenient);
    assert_eq!(Strictness::default(), Strictness::Lenient);
}

#[test]
fn text_scalars_use_canonical_forms() {
    let codecs = Codecs::new();

    let binary = ValueCodec::scalar(PrimitiveType::Binary);
    let bytes = Value::Binary(bytes::Bytes::from_static(b"hi"));
    assert_eq!(codecs.encode(&bytes, &binary).unwrap(), br#""aGk=""#);
    assert_eq!(
        codecs.decode(br#""aGk=""#, &binary, Strictness::Strict).unwrap(),
        bytes
    );

    let id = uuid::Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
    let keyed = ValueCodec::map(
        KeyCodec::Scalar {
            primitive: PrimitiveType::Uuid,
        },
        ValueCodec::scalar(PrimitiveType::Boolean),
    );
    let entries: MapEntries = [(id, true)].into_iter().collect();
    let encoded = codecs.encode(&Value::Map(entries.clone()), &keyed).unwrap();
    assert_eq!(encoded, br#"{"01234567-89ab-cdef-0123-456789abcdef":true}"#);
    assert_eq!(
        codecs.decode(&encoded, &keyed, Strictness::Strict).unwrap(),
        Value::Map(entries)
    );
}
