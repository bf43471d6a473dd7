use miette::{Diagnostic, SourceSpan};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::graph::TypeName;

/// Errors raised while building and resolving the type graph.
///
/// Resolution is global, so any one of these aborts the whole generation run.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    /// Reference to a type that no loaded definition declares
    #[error("Reference to unknown type: {name}")]
    #[diagnostic(
        code(conjure::unresolved_reference),
        help("Add the IR document that defines this type to the inputs")
    )]
    UnresolvedReference {
        /// The name that could not be found
        name: TypeName,
        /// The definition containing the reference
        referenced_from: TypeName,
    },

    /// Two definitions share a `(package, name)`
    #[error("Duplicate type name: {name}")]
    #[diagnostic(
        code(conjure::duplicate_type_name),
        help("Type names must be unique across every package and input file")
    )]
    DuplicateTypeName {
        /// The repeated name
        name: TypeName,
    },

    /// A map key type that has no string key form
    #[error("Invalid map key type {key} in {owner}")]
    #[diagnostic(
        code(conjure::invalid_map_key),
        help("Map keys must be primitives (other than any), enums, or aliases of those")
    )]
    InvalidMapKey {
        /// Description of the offending key type
        key: String,
        /// Definition containing the map
        owner: TypeName,
    },

    /// An alias chain that loops back to itself
    #[error("Cyclic alias: {}", cycle.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" -> "))]
    #[diagnostic(
        code(conjure::cyclic_alias),
        help("An alias may only refer back to itself through a list, set, map, or record")
    )]
    CyclicAlias {
        /// The aliases forming the cycle, starting and ending with the same name
        cycle: Vec<TypeName>,
    },

    /// A union variant whose name collides with the discriminant key
    #[error("Union {owner} declares a variant named {variant}")]
    #[diagnostic(
        code(conjure::reserved_variant_name),
        help("The `type` key carries the union discriminant; rename the variant")
    )]
    ReservedVariantName {
        /// The offending variant name
        variant: String,
        /// The union declaring it
        owner: TypeName,
    },

    /// IR document version this generator does not understand
    #[error("Unsupported IR version {version}")]
    #[diagnostic(code(conjure::unsupported_version))]
    UnsupportedVersion {
        /// Version found in the document
        version: u32,
    },
}

/// Errors raised while dispatching a union value to a visitor
#[derive(Debug, Error, Diagnostic)]
pub enum VisitError {
    /// The discriminant is not a declared variant and the visitor has no catch-all
    #[error("Unknown union variant: {discriminant}")]
    #[diagnostic(
        code(conjure::visit::unknown_variant),
        help("Override visit_unknown to handle variants added by newer producers")
    )]
    UnknownVariant {
        discriminant: String,
    },

    /// The named type is not a union
    #[error("{type_name} is not a union")]
    #[diagnostic(code(conjure::visit::not_a_union))]
    NotAUnion {
        type_name: TypeName,
    },

    /// A visitor callback failed
    #[error("{0}")]
    #[diagnostic(code(conjure::visit::visitor))]
    Visitor(String),
}

/// Errors that can occur during code generation
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    /// IO error when reading IR or writing output
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse an IR document
    #[error("Failed to parse Conjure IR in {}", path.display())]
    #[diagnostic(
        code(conjure::parse_error),
        help("Check that the file is a Conjure IR document produced by the Conjure compiler")
    )]
    ParseError {
        #[source]
        source: serde_json::Error,
        /// Path to the file that failed to parse
        path: PathBuf,
        /// Source text that failed to parse
        #[source_code]
        src: Option<String>,
        /// Location of the error in the source
        #[label("parse error here")]
        span: Option<SourceSpan>,
    },

    /// Type graph construction or resolution failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    /// Synthesis was attempted on a graph with unresolved references
    #[error("Type graph has not been resolved")]
    #[diagnostic(
        code(conjure::graph_not_resolved),
        help("Call TypeGraph::resolve_all before generating code")
    )]
    GraphNotResolved,

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(conjure::config))]
    Config {
        message: String,
    },

    /// Failed to serialize generated output
    #[error("Failed to serialize generated output")]
    #[diagnostic(code(conjure::output))]
    Output {
        #[source]
        source: serde_json::Error,
    },
}

impl CodegenError {
    /// Create a parse error with source text
    pub fn parse_error_with_source(
        source: serde_json::Error,
        path: impl Into<PathBuf>,
        src: String,
    ) -> Self {
        let span = offset_of(&src, source.line(), source.column()).map(|offset| (offset, 1).into());

        Self::ParseError {
            source,
            path: path.into(),
            src: Some(src),
            span,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Byte offset of a 1-based line/column position
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.checked_sub(1)?)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;
