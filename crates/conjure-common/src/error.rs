//! Error types for encoding and decoding Conjure JSON values

use miette::Diagnostic;
use thiserror::Error;

use crate::json::JsonKind;

/// Failures raised while decoding a JSON document against a Conjure type.
///
/// Decoding is fail-fast: the first failure aborts the whole decode and no
/// partially decoded value is ever returned.
#[derive(Debug, Error, Diagnostic)]
pub enum DecodeError {
    /// The input was not well-formed JSON
    #[error("Failed to parse JSON: {0}")]
    #[diagnostic(code(conjure::decode::json))]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),

    /// The JSON value kind does not match the expected Conjure kind
    #[error("Expected {expected}, found {found}")]
    #[diagnostic(code(conjure::decode::type_mismatch))]
    TypeMismatch {
        /// Description of the expected value
        expected: String,
        /// Kind of JSON value that was encountered
        found: JsonKind,
    },

    /// Required fields were absent; lists every missing field
    #[error("Missing required fields: {}", .fields.join(", "))]
    #[diagnostic(
        code(conjure::decode::missing_fields),
        help("Fields that are neither optional nor collections must always be present")
    )]
    MissingFields {
        /// Wire names of all missing fields, in declaration order
        fields: Vec<String>,
    },

    /// Strict mode saw fields the type does not declare; lists all of them
    #[error("Unknown fields: {}", .fields.join(", "))]
    #[diagnostic(
        code(conjure::decode::unknown_fields),
        help("Decode in lenient mode to ignore fields added by newer producers")
    )]
    UnknownFields {
        /// Unrecognized field names, in document order
        fields: Vec<String>,
    },

    /// The same key appeared twice in one JSON object
    #[error("Duplicate field: {field}")]
    #[diagnostic(code(conjure::decode::duplicate_field))]
    DuplicateField {
        /// The repeated key
        field: String,
    },

    /// Two map keys decoded to the same logical key
    #[error("Duplicate map key: {key}")]
    #[diagnostic(code(conjure::decode::duplicate_map_key))]
    DuplicateMapKey {
        /// Canonical key form of the colliding key
        key: String,
    },

    /// The JSON kind was right but the content is not a valid instance
    #[error("Invalid {expected}: {reason}")]
    #[diagnostic(code(conjure::decode::invalid_value))]
    InvalidValue {
        /// Name of the expected Conjure type
        expected: String,
        /// Why the content was rejected
        reason: String,
    },

    /// Failure inside a nested named type
    #[error("Failed to decode {type_name}: {source}")]
    #[diagnostic(code(conjure::decode::nested))]
    Nested {
        /// Qualified name of the nested type
        type_name: String,
        /// Underlying failure
        #[source]
        source: Box<DecodeError>,
    },

    /// No codec is known for the named type
    #[error("No codec for type {type_name}")]
    #[diagnostic(code(conjure::decode::unknown_type))]
    UnknownType {
        /// Qualified name that was looked up
        type_name: String,
    },

    /// A registered external codec rejected its input
    #[error("External codec for {type_name} failed: {message}")]
    #[diagnostic(code(conjure::decode::external))]
    External {
        /// Qualified name of the external type
        type_name: String,
        /// Message from the external codec
        message: String,
    },
}

impl DecodeError {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: JsonKind) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found,
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(expected: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Wrap this error as having occurred inside the named type
    pub fn nested(self, type_name: impl Into<String>) -> Self {
        Self::Nested {
            type_name: type_name.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any [`DecodeError::Nested`] wrappers
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            Self::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failures raised while encoding a value.
///
/// Encoding a value that matches its type never fails, except when an
/// external codec reports an error.
#[derive(Debug, Error, Diagnostic)]
pub enum EncodeError {
    /// The value's shape does not match the type being encoded
    #[error("Cannot encode {found} as {expected}")]
    #[diagnostic(code(conjure::encode::type_mismatch))]
    TypeMismatch {
        /// Description of the expected value
        expected: String,
        /// Kind of value that was supplied
        found: String,
    },

    /// A record value lacks a required field
    #[error("Missing required field {field} of {type_name}")]
    #[diagnostic(code(conjure::encode::missing_field))]
    MissingField {
        /// Qualified name of the record type
        type_name: String,
        /// Wire name of the absent field
        field: String,
    },

    /// No codec is known for the named type
    #[error("No codec for type {type_name}")]
    #[diagnostic(code(conjure::encode::unknown_type))]
    UnknownType {
        /// Qualified name that was looked up
        type_name: String,
    },

    /// A registered external codec failed
    #[error("External codec for {type_name} failed: {message}")]
    #[diagnostic(code(conjure::encode::external))]
    External {
        /// Qualified name of the external type
        type_name: String,
        /// Message from the external codec
        message: String,
    },

    /// Writing the encoded JSON failed
    #[error("Failed to write JSON: {0}")]
    #[diagnostic(code(conjure::encode::json))]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
}

impl EncodeError {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
