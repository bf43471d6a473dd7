use crate::codec::{Presence, TypeCodec};
use crate::error::{CodegenError, Result};
use crate::graph::{NamedKind, TypeGraph, TypeId, TypeName};
use crate::ir::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use smol_str::SmolStr;

mod alias;
mod enums;
mod names;
mod structs;
mod types;
mod unions;
mod utils;

pub use types::TypeRef;

/// Synthesizer output for one named type: its declaration shape and the
/// codec entry point implementing its wire contract
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedType {
    pub name: TypeName,
    pub docs: Option<String>,
    pub declaration: Declaration,
    pub codec: TypeCodec,
}

/// Target-neutral declaration shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Declaration {
    /// Transparent wrapper around the item type
    Newtype { ident: String, item: TypeRef },
    /// Alias of `optional<T>`: a single nullable field of `T`
    NullableWrapper { ident: String, item: TypeRef },
    Enum {
        ident: String,
        variants: Vec<EnumVariantDecl>,
        /// Identifier of the fallback variant holding undeclared values
        unknown: String,
    },
    Struct {
        ident: String,
        fields: Vec<FieldDecl>,
    },
    Union {
        ident: String,
        variants: Vec<FieldDecl>,
        /// Identifier of the state holding an undeclared discriminant
        unknown: String,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        ident: String,
        namespace: SmolStr,
        code: ErrorCode,
        /// `Namespace:Name`
        identity: String,
        safe_args: Vec<FieldDecl>,
        unsafe_args: Vec<FieldDecl>,
    },
}

impl Declaration {
    pub fn ident(&self) -> &str {
        match self {
            Declaration::Newtype { ident, .. }
            | Declaration::NullableWrapper { ident, .. }
            | Declaration::Enum { ident, .. }
            | Declaration::Struct { ident, .. }
            | Declaration::Union { ident, .. }
            | Declaration::Error { ident, .. } => ident,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    pub wire_name: SmolStr,
    pub ident: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub presence: Presence,
    pub docs: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariantDecl {
    /// Wire value
    pub value: SmolStr,
    /// PascalCase variant identifier
    pub ident: String,
    /// SHOUTY_SNAKE constant identifier
    pub constant: String,
    pub docs: Option<String>,
}

/// Per-kind synthesizer over a resolved type graph
pub struct CodeGenerator<'g> {
    graph: &'g TypeGraph,
}

impl<'g> CodeGenerator<'g> {
    /// Create a code generator; the graph must be fully resolved
    pub fn new(graph: &'g TypeGraph) -> Result<Self> {
        if !graph.is_resolved() {
            return Err(CodegenError::GraphNotResolved);
        }
        Ok(Self { graph })
    }

    pub fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    /// Synthesize one named type
    pub fn generate(&self, id: TypeId) -> Result<GeneratedType> {
        let named = self.graph.get(id);
        let generated = match &named.kind {
            NamedKind::Alias { item } => self.generate_alias(named, item)?,
            NamedKind::Enum { values } => self.generate_enum(named, values),
            NamedKind::Record { fields } => self.generate_record(named, fields)?,
            NamedKind::Union { variants } => self.generate_union(named, variants)?,
            NamedKind::Error {
                namespace,
                code,
                safe_args,
                unsafe_args,
            } => self.generate_error(named, namespace, *code, safe_args, unsafe_args)?,
        };
        tracing::debug!(
            name = %named.name,
            kind = named.kind.kind_name(),
            declaration = generated.declaration.ident(),
            "synthesized type"
        );
        Ok(generated)
    }

    /// Synthesize every named type, in registration order
    pub fn generate_all(&self) -> Result<Vec<GeneratedType>> {
        let generated = self
            .graph
            .iter()
            .map(|(id, _)| self.generate(id))
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(types = generated.len(), "synthesized all types");
        Ok(generated)
    }
}
