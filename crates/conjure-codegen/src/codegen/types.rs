use super::CodeGenerator;
use crate::codec::{AliasStrategy, KeyCodec, Presence, ValueCodec};
use crate::error::SchemaError;
use crate::graph::{NamedKind, Type, TypeName};
use conjure_common::PrimitiveType;
use serde::{Deserialize, Serialize};

/// Type expression as it appears in a declaration.
///
/// Unlike [`ValueCodec`], aliases used as map keys keep their names here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeRef {
    Primitive { primitive: PrimitiveType },
    Optional { item: Box<TypeRef> },
    List { item: Box<TypeRef> },
    Set { item: Box<TypeRef> },
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
    Named { name: TypeName },
    External { name: TypeName, fallback: Box<TypeRef> },
}

impl<'g> CodeGenerator<'g> {
    /// Declaration form of a member type
    pub(super) fn type_ref(&self, ty: &Type, owner: &TypeName) -> Result<TypeRef, SchemaError> {
        Ok(match ty {
            Type::Primitive(primitive) => TypeRef::Primitive {
                primitive: *primitive,
            },
            Type::Optional(item) => TypeRef::Optional {
                item: Box::new(self.type_ref(item, owner)?),
            },
            Type::List(item) => TypeRef::List {
                item: Box::new(self.type_ref(item, owner)?),
            },
            Type::Set(item) => TypeRef::Set {
                item: Box::new(self.type_ref(item, owner)?),
            },
            Type::Map { key, value } => TypeRef::Map {
                key: Box::new(self.type_ref(key, owner)?),
                value: Box::new(self.type_ref(value, owner)?),
            },
            Type::Named(id) => TypeRef::Named {
                name: self.graph.get(*id).name.clone(),
            },
            Type::External { name, fallback } => TypeRef::External {
                name: name.clone(),
                fallback: Box::new(self.type_ref(fallback, owner)?),
            },
            Type::Unresolved(name) => return Err(unresolved(name, owner)),
        })
    }

    /// Codec for a member type; named types are delegated to, never inlined
    pub(super) fn value_codec(&self, ty: &Type, owner: &TypeName) -> Result<ValueCodec, SchemaError> {
        Ok(match ty {
            Type::Primitive(primitive) => ValueCodec::scalar(*primitive),
            Type::Optional(item) => ValueCodec::optional(self.value_codec(item, owner)?),
            Type::List(item) => ValueCodec::list(self.value_codec(item, owner)?),
            Type::Set(item) => ValueCodec::set(self.value_codec(item, owner)?),
            Type::Map { key, value } => {
                ValueCodec::map(self.key_codec(key, owner)?, self.value_codec(value, owner)?)
            }
            Type::Named(id) => ValueCodec::named(self.graph.get(*id).name.clone()),
            Type::External { name, fallback } => ValueCodec::External {
                name: name.clone(),
                fallback: Box::new(self.value_codec(fallback, owner)?),
            },
            Type::Unresolved(name) => return Err(unresolved(name, owner)),
        })
    }

    /// Map key codec, flattening aliases and externals to what they wrap
    pub(super) fn key_codec(&self, ty: &Type, owner: &TypeName) -> Result<KeyCodec, SchemaError> {
        match self.graph.dealias(ty) {
            Type::Primitive(primitive) if primitive.is_valid_key() => Ok(KeyCodec::Scalar {
                primitive: *primitive,
            }),
            Type::Named(id) if matches!(self.graph.get(*id).kind, NamedKind::Enum { .. }) => {
                Ok(KeyCodec::Enum {
                    name: self.graph.get(*id).name.clone(),
                })
            }
            Type::External { fallback, .. } => self.key_codec(fallback, owner),
            other => Err(SchemaError::InvalidMapKey {
                key: self.graph.describe(other),
                owner: owner.clone(),
            }),
        }
    }

    /// Whether a field of this type may be absent on the wire
    pub(super) fn presence(&self, ty: &Type) -> Presence {
        match self.graph.dealias(ty) {
            Type::Optional(_) => Presence::Optional,
            Type::List(_) | Type::Set(_) | Type::Map { .. } => Presence::Collection,
            Type::External { fallback, .. } => self.presence(fallback),
            _ => Presence::Required,
        }
    }

    /// How an alias reaches its item's wire form
    pub(super) fn alias_strategy(&self, item: &Type) -> AliasStrategy {
        match item {
            Type::Optional(_) => AliasStrategy::Nullable,
            Type::Primitive(p) if p.has_text_codec() => AliasStrategy::Delegate,
            Type::Named(_) | Type::External { .. } => AliasStrategy::Delegate,
            _ => AliasStrategy::Value,
        }
    }
}

fn unresolved(name: &TypeName, owner: &TypeName) -> SchemaError {
    SchemaError::UnresolvedReference {
        name: name.clone(),
        referenced_from: owner.clone(),
    }
}
