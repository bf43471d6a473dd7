use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

use crate::types::value::{EnumValue, MapEntries, RecordValue, UnionValue, Value};
use crate::types::{BearerToken, Rid};

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Boolean,
    i32 => Integer,
    f64 => Double,
    String => String,
    Bytes => Binary,
    DateTime<FixedOffset> => DateTime,
    uuid::Uuid => Uuid,
    Rid => Rid,
    BearerToken => BearerToken,
    MapEntries => Map,
    EnumValue => Enum,
    RecordValue => Record,
    UnionValue => Union,
    serde_json::Value => Any,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Value::Optional(value.map(|v| Box::new(v.into())))
    }
}

macro_rules! accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        /// Borrow the inner value if this is the matching variant
        pub fn $name(&self) -> Option<&$ty> {
            match self {
                Value::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

impl Value {
    accessor!(as_bool, Boolean, bool);
    accessor!(as_integer, Integer, i32);
    accessor!(as_safelong, Safelong, i64);
    accessor!(as_double, Double, f64);
    accessor!(as_binary, Binary, Bytes);
    accessor!(as_list, List, Vec<Value>);
    accessor!(as_map, Map, MapEntries);
    accessor!(as_enum, Enum, EnumValue);
    accessor!(as_record, Record, RecordValue);
    accessor!(as_union, Union, UnionValue);

    /// Borrow string content
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Inner value of a present optional; `None` for absent or non-optionals
    pub fn as_present(&self) -> Option<&Value> {
        match self {
            Value::Optional(v) => v.as_deref(),
            _ => None,
        }
    }
}
