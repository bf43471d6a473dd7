//! Arena of named types with two-phase reference resolution.
//!
//! Registration inserts every named type before any member is resolved, so
//! members refer to other types (including later ones and themselves) through
//! [`Type::Unresolved`] placeholders. [`TypeGraph::resolve_all`] then swaps
//! each placeholder for a [`TypeId`] into the arena.

use crate::corpus::ConjureCorpus;
use crate::error::SchemaError;
use crate::ir::{self, ErrorCode};
use conjure_common::PrimitiveType;
use smol_str::SmolStr;
use std::collections::HashMap;

mod resolve;
mod validate;

pub use crate::ir::TypeName;

/// Index of a named type in its [`TypeGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A type expression appearing in a member position
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveType),
    Optional(Box<Type>),
    List(Box<Type>),
    Set(Box<Type>),
    Map { key: Box<Type>, value: Box<Type> },
    /// Resolved reference to a named type
    Named(TypeId),
    External { name: TypeName, fallback: Box<Type> },
    /// Reference not yet looked up; never present after resolution
    Unresolved(TypeName),
}

impl Type {
    /// Convert a raw IR type reference; named references stay unresolved
    pub fn from_ir(ty: &ir::Type) -> Self {
        match ty {
            ir::Type::Primitive { primitive } => Type::Primitive(*primitive),
            ir::Type::Optional { optional } => {
                Type::Optional(Box::new(Type::from_ir(&optional.item_type)))
            }
            ir::Type::List { list } => Type::List(Box::new(Type::from_ir(&list.item_type))),
            ir::Type::Set { set } => Type::Set(Box::new(Type::from_ir(&set.item_type))),
            ir::Type::Map { map } => Type::Map {
                key: Box::new(Type::from_ir(&map.key_type)),
                value: Box::new(Type::from_ir(&map.value_type)),
            },
            ir::Type::Reference { reference } => Type::Unresolved(reference.clone()),
            ir::Type::External { external } => Type::External {
                name: external.external_reference.clone(),
                fallback: Box::new(Type::from_ir(&external.fallback)),
            },
        }
    }
}

/// A record field, union variant, or error argument
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: SmolStr,
    pub docs: Option<String>,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<SmolStr>, ty: Type) -> Self {
        Self {
            name: name.into(),
            docs: None,
            ty,
        }
    }

    fn from_ir(field: &ir::FieldDefinition) -> Self {
        Self {
            name: field.field_name.clone(),
            docs: field.docs.clone(),
            ty: Type::from_ir(&field.r#type),
        }
    }
}

/// A declared enum value
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub value: SmolStr,
    pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamedKind {
    Alias {
        item: Type,
    },
    Enum {
        values: Vec<EnumMember>,
    },
    Record {
        fields: Vec<Field>,
    },
    Union {
        variants: Vec<Field>,
    },
    Error {
        namespace: SmolStr,
        code: ErrorCode,
        safe_args: Vec<Field>,
        unsafe_args: Vec<Field>,
    },
}

impl NamedKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NamedKind::Alias { .. } => "alias",
            NamedKind::Enum { .. } => "enum",
            NamedKind::Record { .. } => "object",
            NamedKind::Union { .. } => "union",
            NamedKind::Error { .. } => "error",
        }
    }

    /// Every member type expression, in declaration order
    pub fn members(&self) -> Vec<&Type> {
        match self {
            NamedKind::Alias { item } => vec![item],
            NamedKind::Enum { .. } => Vec::new(),
            NamedKind::Record { fields } => fields.iter().map(|f| &f.ty).collect(),
            NamedKind::Union { variants } => variants.iter().map(|f| &f.ty).collect(),
            NamedKind::Error {
                safe_args,
                unsafe_args,
                ..
            } => safe_args.iter().chain(unsafe_args).map(|f| &f.ty).collect(),
        }
    }

    pub(crate) fn members_mut(&mut self) -> Vec<&mut Type> {
        match self {
            NamedKind::Alias { item } => vec![item],
            NamedKind::Enum { .. } => Vec::new(),
            NamedKind::Record { fields } => fields.iter_mut().map(|f| &mut f.ty).collect(),
            NamedKind::Union { variants } => variants.iter_mut().map(|f| &mut f.ty).collect(),
            NamedKind::Error {
                safe_args,
                unsafe_args,
                ..
            } => safe_args
                .iter_mut()
                .chain(unsafe_args.iter_mut())
                .map(|f| &mut f.ty)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: TypeName,
    pub docs: Option<String>,
    pub kind: NamedKind,
    resolved: bool,
}

impl NamedType {
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
}

/// Registry owning every named type
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    types: Vec<NamedType>,
    index: HashMap<TypeName, TypeId>,
    resolved: bool,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every definition in a corpus, then resolve and validate
    pub fn from_corpus(corpus: &ConjureCorpus) -> Result<Self, SchemaError> {
        let mut graph = Self::new();
        for def in corpus.types() {
            graph.register_definition(def)?;
        }
        for err in corpus.errors() {
            graph.register_error(err)?;
        }
        graph.resolve_all()?;
        Ok(graph)
    }

    /// Insert a named type whose members may still hold placeholders
    pub fn register(
        &mut self,
        name: TypeName,
        docs: Option<String>,
        kind: NamedKind,
    ) -> Result<TypeId, SchemaError> {
        if self.index.contains_key(&name) {
            return Err(SchemaError::DuplicateTypeName { name });
        }
        let id = TypeId(self.types.len());
        tracing::trace!(%name, kind = kind.kind_name(), id = id.0, "registered type");
        self.index.insert(name.clone(), id);
        self.types.push(NamedType {
            name,
            docs,
            kind,
            resolved: false,
        });
        self.resolved = false;
        Ok(id)
    }

    pub fn register_definition(&mut self, def: &ir::TypeDefinition) -> Result<TypeId, SchemaError> {
        let (name, docs, kind) = match def {
            ir::TypeDefinition::Alias { alias } => (
                &alias.type_name,
                &alias.docs,
                NamedKind::Alias {
                    item: Type::from_ir(&alias.alias),
                },
            ),
            ir::TypeDefinition::Enum { r#enum } => (
                &r#enum.type_name,
                &r#enum.docs,
                NamedKind::Enum {
                    values: r#enum
                        .values
                        .iter()
                        .map(|v| EnumMember {
                            value: v.value.clone(),
                            docs: v.docs.clone(),
                        })
                        .collect(),
                },
            ),
            ir::TypeDefinition::Object { object } => (
                &object.type_name,
                &object.docs,
                NamedKind::Record {
                    fields: object.fields.iter().map(Field::from_ir).collect(),
                },
            ),
            ir::TypeDefinition::Union { union } => (
                &union.type_name,
                &union.docs,
                NamedKind::Union {
                    variants: union.union.iter().map(Field::from_ir).collect(),
                },
            ),
        };
        self.register(name.clone(), docs.clone(), kind)
    }

    pub fn register_error(&mut self, err: &ir::ErrorDefinition) -> Result<TypeId, SchemaError> {
        self.register(
            err.error_name.clone(),
            err.docs.clone(),
            NamedKind::Error {
                namespace: err.namespace.clone(),
                code: err.code,
                safe_args: err.safe_args.iter().map(Field::from_ir).collect(),
                unsafe_args: err.unsafe_args.iter().map(Field::from_ir).collect(),
            },
        )
    }

    /// Look up a type by name
    pub fn lookup(&self, name: &TypeName) -> Option<TypeId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: TypeId) -> &NamedType {
        &self.types[id.0]
    }

    /// Look up a named type by name
    pub fn named(&self, name: &TypeName) -> Option<&NamedType> {
        self.lookup(name).map(|id| self.get(id))
    }

    /// Named types in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &NamedType)> {
        self.types.iter().enumerate().map(|(i, t)| (TypeId(i), t))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether [`TypeGraph::resolve_all`] has completed since the last registration
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Follow alias links until reaching a non-alias type expression
    pub fn dealias<'a>(&'a self, ty: &'a Type) -> &'a Type {
        let mut current = ty;
        // Bounded so a cyclic alias chain in an unvalidated graph terminates
        for _ in 0..=self.types.len() {
            match current {
                Type::Named(id) => match &self.get(*id).kind {
                    NamedKind::Alias { item } => current = item,
                    _ => return current,
                },
                _ => return current,
            }
        }
        current
    }
}
