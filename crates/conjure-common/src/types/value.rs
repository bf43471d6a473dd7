use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::types::scalar;
use crate::types::{BearerToken, Rid};

mod convert;
#[cfg(test)]
mod tests;

/// Runtime value of any Conjure type.
///
/// Aliases are transparent: a value of an alias type is a value of its
/// underlying type. Equality treats every NaN as equal to every other NaN,
/// maps as unordered, and sets as unordered.
#[derive(Debug, Clone)]
pub enum Value {
    /// Arbitrary JSON (`any`)
    Any(serde_json::Value),
    Boolean(bool),
    Integer(i32),
    /// 53-bit safe integer
    Safelong(i64),
    Double(f64),
    String(String),
    Binary(Bytes),
    DateTime(DateTime<FixedOffset>),
    Uuid(uuid::Uuid),
    Rid(Rid),
    BearerToken(BearerToken),
    Optional(Option<Box<Value>>),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(MapEntries),
    Enum(EnumValue),
    Record(RecordValue),
    Union(UnionValue),
}

impl Value {
    /// A present optional
    pub fn some(value: impl Into<Value>) -> Self {
        Value::Optional(Some(Box::new(value.into())))
    }

    /// An absent optional
    pub fn none() -> Self {
        Value::Optional(None)
    }

    /// Short name of this value's kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Any(_) => "any",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Safelong(_) => "safelong",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::DateTime(_) => "datetime",
            Value::Uuid(_) => "uuid",
            Value::Rid(_) => "rid",
            Value::BearerToken(_) => "bearertoken",
            Value::Optional(_) => "optional",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Enum(_) => "enum",
            Value::Record(_) => "record",
            Value::Union(_) => "union",
        }
    }

    /// Map-key form of a scalar value.
    ///
    /// Booleans become `"true"`/`"false"`, numbers their decimal text,
    /// binary its base64 text, and text-like values their string form.
    /// Returns `None` for values that cannot be map keys.
    pub fn key_form(&self) -> Option<String> {
        Some(match self {
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Safelong(i) => i.to_string(),
            Value::Double(d) => scalar::double_key(*d),
            Value::String(s) => s.clone(),
            Value::Binary(b) => scalar::encode_binary(b),
            Value::DateTime(dt) => scalar::format_datetime(dt),
            Value::Uuid(u) => u.hyphenated().to_string(),
            Value::Rid(r) => r.to_string(),
            Value::BearerToken(t) => t.as_str().to_owned(),
            Value::Enum(e) => e.value().to_owned(),
            _ => return None,
        })
    }

    /// Canonical ordering of two map keys.
    ///
    /// Keys of a directly ordered kind (boolean, integer, safelong, double,
    /// string) compare by value; everything else compares by key form.
    pub fn key_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Safelong(a), Value::Safelong(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => self.key_form().cmp(&other.key_form()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Any(a), Value::Any(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Safelong(a), Value::Safelong(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Rid(a), Value::Rid(b)) => a == b,
            (Value::BearerToken(a), Value::BearerToken(b)) => a == b,
            (Value::Optional(a), Value::Optional(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.iter().all(|item| b.contains(item)) && b.iter().all(|item| a.contains(item))
            }
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Union(a), Value::Union(b)) => a == b,
            _ => false,
        }
    }
}

/// Map entries in insertion order, indexed by key form.
///
/// Encoding sorts entries canonically, so insertion order never affects the
/// wire form; equality ignores order for the same reason. Two keys with the
/// same kind and key form are the same key.
#[derive(Debug, Clone, Default)]
pub struct MapEntries {
    entries: Vec<(Value, Value)>,
    index: HashMap<(&'static str, String), usize>,
}

impl MapEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the value it replaced under the same key
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.slot(&key) {
            return Some(std::mem::replace(&mut self.entries[slot].1, value));
        }
        if let Some(index_key) = index_key(&key) {
            self.index.insert(index_key, self.entries.len());
        }
        self.entries.push((key, value));
        None
    }

    /// Look up the value stored under a key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.slot(key).map(|slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.slot(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by [`Value::key_cmp`]
    pub fn sorted(&self) -> Vec<&(Value, Value)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.key_cmp(b));
        entries
    }

    fn slot(&self, key: &Value) -> Option<usize> {
        match index_key(key) {
            Some(index_key) => self.index.get(&index_key).copied(),
            // Keys without a key form never encode; scan for them
            None => self.entries.iter().position(|(k, _)| k == key),
        }
    }
}

fn index_key(key: &Value) -> Option<(&'static str, String)> {
    key.key_form().map(|form| (key.kind_name(), form))
}

impl PartialEq for MapEntries {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for MapEntries {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut entries = Self::new();
        for (k, v) in iter {
            entries.insert(k, v);
        }
        entries
    }
}

/// Value of a closed string enum.
///
/// Values outside the declared set are kept as [`EnumValue::Unknown`] with
/// the original text, so they survive a decode/encode round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumValue {
    /// One of the declared values
    Known(SmolStr),
    /// The `UNKNOWN` sentinel, carrying the text that was received
    Unknown(SmolStr),
}

impl EnumValue {
    /// Name of the synthesized fallback variant
    pub const UNKNOWN: &'static str = "UNKNOWN";

    pub fn known(value: impl Into<SmolStr>) -> Self {
        Self::Known(value.into())
    }

    /// A value outside the declared set.
    ///
    /// The text must not match a declared value case-insensitively: such a
    /// value would decode back as known, so encoding rejects it.
    pub fn unknown(value: impl Into<SmolStr>) -> Self {
        Self::Unknown(value.into())
    }

    /// The wire string: the declared value, or the preserved original text
    pub fn value(&self) -> &str {
        match self {
            Self::Known(v) | Self::Unknown(v) => v,
        }
    }

    /// The variant this value dispatches to: the declared value or `UNKNOWN`
    pub fn variant(&self) -> &str {
        match self {
            Self::Known(v) => v,
            Self::Unknown(_) => Self::UNKNOWN,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// Field values of a record, keyed by wire name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValue {
    fields: BTreeMap<SmolStr, Value>,
}

impl RecordValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<SmolStr>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Value of a tagged union: a discriminant plus at most one payload.
///
/// A discriminant the union does not declare is kept verbatim, with its
/// payload (if any) as [`Value::Any`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
    discriminant: SmolStr,
    payload: Option<Box<Value>>,
}

impl UnionValue {
    /// Union populated with the given variant
    pub fn new(variant: impl Into<SmolStr>, payload: impl Into<Value>) -> Self {
        Self {
            discriminant: variant.into(),
            payload: Some(Box::new(payload.into())),
        }
    }

    /// Union whose variant carries no payload
    pub fn empty(variant: impl Into<SmolStr>) -> Self {
        Self {
            discriminant: variant.into(),
            payload: None,
        }
    }

    pub fn discriminant(&self) -> &str {
        &self.discriminant
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_deref()
    }

    pub fn into_parts(self) -> (SmolStr, Option<Value>) {
        (self.discriminant, self.payload.map(|p| *p))
    }
}
