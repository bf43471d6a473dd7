//! Codec plan: the encode/decode procedure for every generated type, as data.
//!
//! An emitter turns these into target-language procedure bodies; [`runtime`]
//! executes them directly against [`conjure_common::Value`]s.
//!
//! Named types are referenced by [`TypeName`] and never inlined, so plans for
//! cyclic types stay finite.

use crate::graph::TypeName;
use conjure_common::PrimitiveType;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub mod runtime;
pub mod visit;

pub use runtime::{Codecs, ExternalCodec, Strictness};
pub use visit::{UnionVisitor, visit_union};

/// JSON key carrying a union's discriminant
pub const UNION_DISCRIMINANT: &str = "type";

/// Codec for one type expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueCodec {
    Scalar { primitive: PrimitiveType },
    Optional { item: Box<ValueCodec> },
    List { item: Box<ValueCodec> },
    Set { item: Box<ValueCodec> },
    Map { key: KeyCodec, value: Box<ValueCodec> },
    /// Delegate to the named type's own codec entry point
    Named { name: TypeName },
    /// Use a registered external codec if one exists, else `fallback`
    External {
        name: TypeName,
        fallback: Box<ValueCodec>,
    },
}

impl ValueCodec {
    pub fn scalar(primitive: PrimitiveType) -> Self {
        ValueCodec::Scalar { primitive }
    }

    pub fn optional(item: ValueCodec) -> Self {
        ValueCodec::Optional {
            item: Box::new(item),
        }
    }

    pub fn list(item: ValueCodec) -> Self {
        ValueCodec::List {
            item: Box::new(item),
        }
    }

    pub fn set(item: ValueCodec) -> Self {
        ValueCodec::Set {
            item: Box::new(item),
        }
    }

    pub fn map(key: KeyCodec, value: ValueCodec) -> Self {
        ValueCodec::Map {
            key,
            value: Box::new(value),
        }
    }

    pub fn named(name: TypeName) -> Self {
        ValueCodec::Named { name }
    }
}

/// Codec for a map key, always a string on the wire.
///
/// Alias and external key types are flattened to what they ultimately wrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum KeyCodec {
    Scalar { primitive: PrimitiveType },
    Enum { name: TypeName },
}

/// Whether a record field or union payload may be absent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Presence {
    Required,
    /// Absent or `null` decodes to an empty optional
    Optional,
    /// Absent or `null` decodes to an empty collection; never encoded as `null`
    Collection,
}

impl Presence {
    pub fn is_required(self) -> bool {
        self == Presence::Required
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCodec {
    pub wire_name: SmolStr,
    pub codec: ValueCodec,
    pub presence: Presence,
}

/// How an alias reaches its item's wire form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AliasStrategy {
    /// Alias of `optional<T>`: `null` is absence, anything else decodes `T`
    Nullable,
    /// Item has its own text or binary codec (or is a named type); call it
    Delegate,
    /// Generic JSON value codec over the item
    Value,
}

/// Codec entry point of one named type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeCodec {
    Alias {
        strategy: AliasStrategy,
        item: ValueCodec,
    },
    Enum {
        values: Vec<SmolStr>,
    },
    Record {
        fields: Vec<FieldCodec>,
    },
    Union {
        discriminant: SmolStr,
        variants: Vec<FieldCodec>,
    },
}

impl TypeCodec {
    /// Field or variant with the given wire name
    pub fn field(&self, wire_name: &str) -> Option<&FieldCodec> {
        match self {
            TypeCodec::Record { fields } => {
                fields.iter().find(|f| f.wire_name.as_str() == wire_name)
            }
            TypeCodec::Union { variants, .. } => {
                variants.iter().find(|f| f.wire_name.as_str() == wire_name)
            }
            TypeCodec::Alias { .. } | TypeCodec::Enum { .. } => None,
        }
    }
}
