//! Serde model of the Conjure IR document.
//!
//! Definitions and type references are tagged by a `"type"` key whose value
//! names a sibling field holding the payload:
//!
//! ```json
//! {"type": "optional", "optional": {"itemType": {"type": "primitive", "primitive": "STRING"}}}
//! ```

use conjure_common::PrimitiveType;
use core::fmt;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use smol_str::SmolStr;

#[derive(Debug, Serialize_repr, Deserialize_repr, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum IrVersion {
    V1 = 1,
}

/// Globally unique identity of a named type
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct TypeName {
    pub name: SmolStr,
    pub package: SmolStr,
}

impl TypeName {
    pub fn new(package: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ConjureDefinition {
    pub version: IrVersion,
    #[serde(default)]
    pub errors: Vec<ErrorDefinition>,
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    /// Accepted so real IR documents parse; never inspected
    #[serde(default)]
    pub services: Vec<serde_json::Value>,
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeDefinition {
    Alias { alias: AliasDefinition },
    Enum {
        #[serde(rename = "enum")]
        r#enum: EnumDefinition,
    },
    Object { object: ObjectDefinition },
    Union { union: UnionDefinition },
}

impl TypeDefinition {
    pub fn type_name(&self) -> &TypeName {
        match self {
            TypeDefinition::Alias { alias } => &alias.type_name,
            TypeDefinition::Enum { r#enum } => &r#enum.type_name,
            TypeDefinition::Object { object } => &object.type_name,
            TypeDefinition::Union { union } => &union.type_name,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AliasDefinition {
    pub type_name: TypeName,
    pub alias: Type,
    pub docs: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EnumDefinition {
    pub type_name: TypeName,
    pub values: Vec<EnumValueDefinition>,
    pub docs: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct EnumValueDefinition {
    pub value: SmolStr,
    pub docs: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDefinition {
    pub type_name: TypeName,
    pub fields: Vec<FieldDefinition>,
    pub docs: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UnionDefinition {
    pub type_name: TypeName,
    pub union: Vec<FieldDefinition>,
    pub docs: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub field_name: SmolStr,
    #[serde(rename = "type")]
    pub r#type: Type,
    pub docs: Option<String>,
}

/// Standard error codes; each maps to an HTTP status in the error envelope
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    PermissionDenied,
    InvalidArgument,
    NotFound,
    Conflict,
    RequestEntityTooLarge,
    FailedPrecondition,
    Internal,
    Timeout,
    CustomClient,
    CustomServer,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::RequestEntityTooLarge => "REQUEST_ENTITY_TOO_LARGE",
            ErrorCode::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::CustomClient => "CUSTOM_CLIENT",
            ErrorCode::CustomServer => "CUSTOM_SERVER",
        }
    }

    /// HTTP status carried by the error envelope
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::PermissionDenied => 403,
            ErrorCode::InvalidArgument => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::RequestEntityTooLarge => 413,
            ErrorCode::FailedPrecondition => 500,
            ErrorCode::Internal => 500,
            ErrorCode::Timeout => 500,
            ErrorCode::CustomClient => 400,
            ErrorCode::CustomServer => 500,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDefinition {
    pub error_name: TypeName,
    pub docs: Option<String>,
    pub namespace: SmolStr,
    pub code: ErrorCode,
    #[serde(default)]
    pub safe_args: Vec<FieldDefinition>,
    #[serde(default)]
    pub unsafe_args: Vec<FieldDefinition>,
}

// type references

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Type {
    Primitive { primitive: PrimitiveType },
    Optional { optional: OptionalType },
    List { list: ListType },
    Set { set: SetType },
    Map { map: MapType },
    Reference { reference: TypeName },
    External { external: ExternalReference },
}

impl Type {
    pub fn primitive(primitive: PrimitiveType) -> Self {
        Type::Primitive { primitive }
    }

    pub fn reference(package: &str, name: &str) -> Self {
        Type::Reference {
            reference: TypeName::new(package, name),
        }
    }

    pub fn optional(item: Type) -> Self {
        Type::Optional {
            optional: OptionalType {
                item_type: Box::new(item),
            },
        }
    }

    pub fn list(item: Type) -> Self {
        Type::List {
            list: ListType {
                item_type: Box::new(item),
            },
        }
    }

    pub fn set(item: Type) -> Self {
        Type::Set {
            set: SetType {
                item_type: Box::new(item),
            },
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            map: MapType {
                key_type: Box::new(key),
                value_type: Box::new(value),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OptionalType {
    pub item_type: Box<Type>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListType {
    pub item_type: Box<Type>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetType {
    pub item_type: Box<Type>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MapType {
    pub key_type: Box<Type>,
    pub value_type: Box<Type>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReference {
    pub external_reference: TypeName,
    pub fallback: Box<Type>,
}
