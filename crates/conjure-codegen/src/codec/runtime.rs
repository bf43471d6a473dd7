//! Executes codec plans against runtime values.
//!
//! This is the reference behaviour of generated encode/decode procedures:
//! canonical scalar forms, record field presence rules, union dispatch,
//! canonical map ordering, and strict or lenient field checking.

use super::{AliasStrategy, TypeCodec, ValueCodec};
use crate::codegen::GeneratedType;
use crate::graph::TypeName;
use conjure_common::{DecodeError, EncodeError, Json, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

mod decode;
mod encode;

/// Decode-time handling of fields a type does not declare.
///
/// Duplicate keys, missing required fields, and map key collisions are
/// rejected in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Ignore unknown record and union fields
    #[default]
    Lenient,
    /// Fail with every unknown field name once the object has been scanned
    Strict,
}

impl Strictness {
    pub fn is_strict(self) -> bool {
        self == Strictness::Strict
    }
}

impl From<bool> for Strictness {
    fn from(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

/// Custom wire form for an external type
pub trait ExternalCodec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Json, EncodeError>;

    fn decode(&self, json: &Json, strictness: Strictness) -> Result<Value, DecodeError>;
}

/// Codec entry points for every generated type, plus external codecs
#[derive(Clone, Default)]
pub struct Codecs {
    types: HashMap<TypeName, TypeCodec>,
    externals: HashMap<TypeName, Arc<dyn ExternalCodec>>,
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codecs")
            .field("types", &self.types.len())
            .field("externals", &self.externals.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Codecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from synthesized types
    pub fn from_generated<'a>(types: impl IntoIterator<Item = &'a GeneratedType>) -> Self {
        let mut codecs = Self::new();
        for generated in types {
            codecs.insert(generated.name.clone(), generated.codec.clone());
        }
        codecs
    }

    pub fn insert(&mut self, name: TypeName, codec: TypeCodec) {
        self.types.insert(name, codec);
    }

    /// Use `codec` instead of the fallback for an external type
    pub fn register_external(&mut self, name: TypeName, codec: impl ExternalCodec + 'static) {
        tracing::debug!(%name, "registered external codec");
        self.externals.insert(name, Arc::new(codec));
    }

    pub fn with_external(mut self, name: TypeName, codec: impl ExternalCodec + 'static) -> Self {
        self.register_external(name, codec);
        self
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeCodec> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Encode a value to JSON bytes
    pub fn encode(&self, value: &Value, codec: &ValueCodec) -> Result<Vec<u8>, EncodeError> {
        Ok(self.encode_json(value, codec)?.to_vec()?)
    }

    /// Encode a value to a JSON tree
    pub fn encode_json(&self, value: &Value, codec: &ValueCodec) -> Result<Json, EncodeError> {
        self.encode_value(value, codec)
    }

    /// Encode a value of a named type
    pub fn encode_named(&self, value: &Value, name: &TypeName) -> Result<Vec<u8>, EncodeError> {
        Ok(self.encode_type(value, name)?.to_vec()?)
    }

    /// Decode JSON bytes; no partial value is returned on failure
    pub fn decode(
        &self,
        bytes: &[u8],
        codec: &ValueCodec,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        self.decode_json(&Json::parse(bytes)?, codec, strictness)
    }

    /// Decode a parsed JSON tree
    pub fn decode_json(
        &self,
        json: &Json,
        codec: &ValueCodec,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        match codec {
            // Top-level errors are reported unwrapped
            ValueCodec::Named { name } => self.decode_type(json, name, strictness),
            other => self.decode_value(json, other, strictness),
        }
    }

    /// Decode JSON bytes as a named type
    pub fn decode_named(
        &self,
        bytes: &[u8],
        name: &TypeName,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        self.decode_type(&Json::parse(bytes)?, name, strictness)
    }

    fn type_codec_for_encode(&self, name: &TypeName) -> Result<&TypeCodec, EncodeError> {
        self.types.get(name).ok_or_else(|| EncodeError::UnknownType {
            type_name: name.to_string(),
        })
    }

    fn type_codec_for_decode(&self, name: &TypeName) -> Result<&TypeCodec, DecodeError> {
        self.types.get(name).ok_or_else(|| DecodeError::UnknownType {
            type_name: name.to_string(),
        })
    }

    /// Empty value of a collection-typed codec, seeing through aliases
    pub(crate) fn empty_value(&self, codec: &ValueCodec) -> Option<Value> {
        match codec {
            ValueCodec::List { .. } => Some(Value::List(Vec::new())),
            ValueCodec::Set { .. } => Some(Value::Set(Vec::new())),
            ValueCodec::Map { .. } => Some(Value::Map(Default::default())),
            ValueCodec::Named { name } => match self.types.get(name)? {
                TypeCodec::Alias { strategy, item } if *strategy != AliasStrategy::Nullable => {
                    self.empty_value(item)
                }
                _ => None,
            },
            ValueCodec::External { fallback, .. } => self.empty_value(fallback),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
