use super::*;
use std::str::FromStr;

#[test]
fn nan_doubles_are_equal() {
    assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
    assert_ne!(Value::Double(1.0), Value::Double(2.0));
    assert_eq!(Value::Double(0.0), Value::Double(-0.0));
}

#[test]
fn map_equality_ignores_insertion_order() {
    let a: MapEntries = [("x", 1), ("y", 2)].into_iter().collect();
    let b: MapEntries = [("y", 2), ("x", 1)].into_iter().collect();
    assert_eq!(Value::Map(a), Value::Map(b));

    let c: MapEntries = [("x", 1), ("y", 3)].into_iter().collect();
    let d: MapEntries = [("y", 2), ("x", 1)].into_iter().collect();
    assert_ne!(Value::Map(c), Value::Map(d));
}

#[test]
fn set_equality_ignores_order() {
    let a = Value::Set(vec![Value::from(1), Value::from(2)]);
    let b = Value::Set(vec![Value::from(2), Value::from(1)]);
    assert_eq!(a, b);
    assert_ne!(
        Value::List(vec![Value::from(1), Value::from(2)]),
        Value::List(vec![Value::from(2), Value::from(1)])
    );
}

#[test]
fn set_equality_compares_distinct_elements() {
    let set = |items: &[i32]| Value::Set(items.iter().copied().map(Value::from).collect());
    assert_eq!(set(&[1, 1, 2]), set(&[1, 2]));
    assert_ne!(set(&[1, 1, 2]), set(&[1, 2, 3]));
    assert_ne!(set(&[1, 2, 3]), set(&[1, 1, 2]));
}

#[test]
fn map_insert_replaces_existing_key() {
    let mut entries = MapEntries::new();
    assert_eq!(entries.insert("a", 1), None);
    assert_eq!(entries.insert("b", 2), None);
    assert_eq!(entries.insert("a", 3), Some(Value::from(1)));

    assert_eq!(entries.len(), 2);
    assert_eq!(entries.get(&Value::from("a")), Some(&Value::from(3)));
    // The replaced entry keeps its original position
    assert_eq!(entries.iter().next().map(|(k, _)| k), Some(&Value::from("a")));

    let collected: MapEntries = [("x", 1), ("x", 2)].into_iter().collect();
    assert_eq!(collected.len(), 1);
    assert_eq!(collected.get(&Value::from("x")), Some(&Value::from(2)));
}

#[test]
fn map_keys_match_by_kind_and_key_form() {
    let mut entries = MapEntries::new();
    entries.insert(Value::Integer(1), "int");
    entries.insert(Value::String("1".into()), "string");
    assert_eq!(entries.len(), 2);
    assert!(entries.contains_key(&Value::Integer(1)));
    assert!(!entries.contains_key(&Value::Safelong(1)));

    // Keys with no key form are still found
    entries.insert(Value::List(vec![]), "list");
    assert_eq!(entries.get(&Value::List(vec![])), Some(&Value::from("list")));
}

#[test]
fn large_maps_index_every_key() {
    let entries: MapEntries = (0..50_000).map(|i| (i, i * 2)).collect();
    assert_eq!(entries.len(), 50_000);
    assert_eq!(entries.get(&Value::Integer(49_999)), Some(&Value::Integer(99_998)));
    assert_eq!(entries.clone(), entries);
}

#[test]
fn key_forms() {
    assert_eq!(Value::Boolean(true).key_form().as_deref(), Some("true"));
    assert_eq!(Value::Integer(-3).key_form().as_deref(), Some("-3"));
    assert_eq!(Value::Safelong(12).key_form().as_deref(), Some("12"));
    assert_eq!(Value::Double(f64::NAN).key_form().as_deref(), Some("NaN"));
    assert_eq!(
        Value::Enum(EnumValue::unknown("NEW")).key_form().as_deref(),
        Some("NEW")
    );
    let id = uuid::Uuid::from_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap();
    assert_eq!(
        Value::Uuid(id).key_form().as_deref(),
        Some("6ba7b810-9dad-11d1-80b4-00c04fd430c8")
    );
    assert_eq!(Value::List(vec![]).key_form(), None);
}

#[test]
fn integer_keys_sort_numerically() {
    let mut keys = vec![Value::Integer(10), Value::Integer(9), Value::Integer(-1)];
    keys.sort_by(|a, b| a.key_cmp(b));
    assert_eq!(
        keys,
        vec![Value::Integer(-1), Value::Integer(9), Value::Integer(10)]
    );
}

#[test]
fn uuid_keys_sort_by_key_form() {
    let low = uuid::Uuid::from_str("00000000-0000-0000-0000-000000000001").unwrap();
    let high = uuid::Uuid::from_str("f0000000-0000-0000-0000-000000000000").unwrap();
    let entries: MapEntries = [(Value::Uuid(high), 1), (Value::Uuid(low), 2)]
        .into_iter()
        .collect();
    let sorted = entries.sorted();
    assert_eq!(sorted[0].0, Value::Uuid(low));
}

#[test]
fn enum_unknown_preserves_text() {
    let value = EnumValue::unknown("NEW_VALUE");
    assert!(value.is_unknown());
    assert_eq!(value.value(), "NEW_VALUE");
    assert_eq!(value.variant(), EnumValue::UNKNOWN);

    let known = EnumValue::known("A");
    assert_eq!(known.variant(), "A");
}

#[test]
fn record_builder() {
    let record = RecordValue::new()
        .with("name", "widget")
        .with("count", 3)
        .with("note", Value::none());
    assert_eq!(record.len(), 3);
    assert_eq!(record.get("name").and_then(Value::as_str), Some("widget"));
    assert_eq!(record.get("note"), Some(&Value::none()));
}

#[test]
fn union_parts() {
    let union = UnionValue::new("str", "x");
    assert_eq!(union.discriminant(), "str");
    assert_eq!(union.payload(), Some(&Value::from("x")));
    let (disc, payload) = union.into_parts();
    assert_eq!(disc, "str");
    assert_eq!(payload, Some(Value::String("x".into())));
}
