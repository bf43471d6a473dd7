use super::{Codecs, Strictness};
use crate::codec::{AliasStrategy, FieldCodec, KeyCodec, Presence, TypeCodec, ValueCodec};
use crate::graph::TypeName;
use conjure_common::types::scalar;
use conjure_common::types::{BearerToken, EnumValue, MapEntries, RecordValue, Rid, UnionValue};
use conjure_common::{DecodeError, Json, PrimitiveType, Value};
use smol_str::SmolStr;
use std::collections::HashSet;

impl Codecs {
    pub(super) fn decode_value(
        &self,
        json: &Json,
        codec: &ValueCodec,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        match codec {
            ValueCodec::Scalar { primitive } => decode_scalar(json, *primitive),
            ValueCodec::Optional { item } => match json {
                Json::Null => Ok(Value::Optional(None)),
                other => Ok(Value::some(self.decode_value(other, item, strictness)?)),
            },
            ValueCodec::List { item } => {
                let items = expect_array(json, "list")?;
                items
                    .iter()
                    .map(|i| self.decode_value(i, item, strictness))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            ValueCodec::Set { item } => self.decode_set(json, item, strictness),
            ValueCodec::Map { key, value } => self.decode_map(json, key, value, strictness),
            ValueCodec::Named { name } => self
                .decode_type(json, name, strictness)
                .map_err(|e| e.nested(name.to_string())),
            ValueCodec::External { name, fallback } => match self.externals.get(name) {
                Some(external) => {
                    external
                        .decode(json, strictness)
                        .map_err(|e| DecodeError::External {
                            type_name: name.to_string(),
                            message: e.to_string(),
                        })
                }
                None => self.decode_value(json, fallback, strictness),
            },
        }
    }

    fn decode_map(
        &self,
        json: &Json,
        key: &KeyCodec,
        value: &ValueCodec,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        let Json::Object(object) = json else {
            return Err(DecodeError::type_mismatch("map", json.kind()));
        };

        let mut seen = HashSet::new();
        let mut entries = MapEntries::new();
        for (raw_key, raw_value) in object {
            if !seen.insert(raw_key.as_str()) {
                return Err(DecodeError::DuplicateField {
                    field: raw_key.clone(),
                });
            }
            let decoded_key = self.decode_key(raw_key, key)?;
            if entries.contains_key(&decoded_key) {
                return Err(DecodeError::DuplicateMapKey {
                    key: raw_key.clone(),
                });
            }
            let decoded_value = self.decode_value(raw_value, value, strictness)?;
            entries.insert(decoded_key, decoded_value);
        }
        Ok(Value::Map(entries))
    }

    /// Elements in document order, keeping the first of any equal elements.
    ///
    /// Equal elements share a canonical encoding, so that encoding is the
    /// dedupe key; an element the codec cannot re-encode is compared directly.
    fn decode_set(
        &self,
        json: &Json,
        item: &ValueCodec,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        let items = expect_array(json, "set")?;
        let mut seen = HashSet::with_capacity(items.len());
        let mut decoded = Vec::with_capacity(items.len());
        for raw in items {
            let value = self.decode_value(raw, item, strictness)?;
            let canonical = self
                .encode_value(&value, item)
                .ok()
                .and_then(|json| json.to_vec().ok());
            let fresh = match canonical {
                Some(form) => seen.insert(form),
                None => !decoded.contains(&value),
            };
            if fresh {
                decoded.push(value);
            }
        }
        Ok(Value::Set(decoded))
    }

    fn decode_key(&self, raw: &str, codec: &KeyCodec) -> Result<Value, DecodeError> {
        match codec {
            KeyCodec::Scalar { primitive } => match primitive {
                PrimitiveType::Boolean => scalar::boolean_from_key(raw).map(Value::Boolean),
                PrimitiveType::Integer => scalar::integer_from_key(raw).map(Value::Integer),
                PrimitiveType::Safelong => scalar::safelong_from_key(raw).map(Value::Safelong),
                PrimitiveType::Double => scalar::double_from_key(raw).map(Value::Double),
                // Remaining key kinds share their value codec
                other => decode_scalar(&Json::String(raw.to_owned()), *other),
            },
            KeyCodec::Enum { name } => match self.type_codec_for_decode(name)? {
                TypeCodec::Enum { values } => Ok(Value::Enum(decode_enum(raw, values))),
                _ => Err(DecodeError::invalid_value(
                    name.to_string(),
                    "map key type is not an enum",
                )),
            },
        }
    }

    /// Decode through a named type's entry point
    pub(super) fn decode_type(
        &self,
        json: &Json,
        name: &TypeName,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        match self.type_codec_for_decode(name)? {
            TypeCodec::Alias {
                strategy: AliasStrategy::Nullable,
                item,
            } => match json {
                Json::Null => Ok(Value::Optional(None)),
                other => Ok(Value::some(self.decode_value(other, item, strictness)?)),
            },
            TypeCodec::Alias { item, .. } => self.decode_value(json, item, strictness),
            TypeCodec::Enum { values } => match json {
                Json::String(raw) => Ok(Value::Enum(decode_enum(raw, values))),
                other => Err(DecodeError::type_mismatch(name.to_string(), other.kind())),
            },
            TypeCodec::Record { fields } => self.decode_record(json, fields, name, strictness),
            TypeCodec::Union {
                discriminant,
                variants,
            } => self.decode_union(json, discriminant, variants, name, strictness),
        }
    }

    /// Value of a field whose key was present, or its default when absent.
    ///
    /// `null` on a collection field reads as empty, like an absent one.
    fn decode_field(
        &self,
        raw: Option<&Json>,
        field: &FieldCodec,
        strictness: Strictness,
    ) -> Result<Option<Value>, DecodeError> {
        match (raw, field.presence) {
            (None, Presence::Required) => Ok(None),
            (None, Presence::Optional) => Ok(Some(Value::Optional(None))),
            (None | Some(Json::Null), Presence::Collection) => Ok(self.empty_value(&field.codec)),
            (Some(json), _) => self.decode_value(json, &field.codec, strictness).map(Some),
        }
    }

    fn decode_record(
        &self,
        json: &Json,
        fields: &[FieldCodec],
        name: &TypeName,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        let object = expect_object(json, name)?;

        let mut present: Vec<Option<&Json>> = vec![None; fields.len()];
        let mut unknown = Vec::new();
        for (key, value) in object {
            match fields.iter().position(|f| f.wire_name.as_str() == key.as_str()) {
                Some(i) => present[i] = Some(value),
                None => unknown.push(key.clone()),
            }
        }

        let missing: Vec<String> = fields
            .iter()
            .zip(&present)
            .filter(|(f, raw)| f.presence.is_required() && raw.is_none())
            .map(|(f, _)| f.wire_name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DecodeError::MissingFields { fields: missing });
        }
        if strictness.is_strict() && !unknown.is_empty() {
            return Err(DecodeError::UnknownFields { fields: unknown });
        }

        let mut record = RecordValue::new();
        for (field, raw) in fields.iter().zip(present) {
            if let Some(value) = self.decode_field(raw, field, strictness)? {
                record.insert(field.wire_name.clone(), value);
            }
        }
        Ok(Value::Record(record))
    }

    fn decode_union(
        &self,
        json: &Json,
        discriminant_key: &str,
        variants: &[FieldCodec],
        name: &TypeName,
        strictness: Strictness,
    ) -> Result<Value, DecodeError> {
        let object = expect_object(json, name)?;

        let discriminant = match object.iter().find(|(k, _)| k.as_str() == discriminant_key) {
            Some((_, Json::String(d))) => SmolStr::from(d.as_str()),
            Some((_, other)) => {
                return Err(DecodeError::type_mismatch(
                    format!("{name} discriminant"),
                    other.kind(),
                ));
            }
            None => {
                return Err(DecodeError::MissingFields {
                    fields: vec![discriminant_key.to_owned()],
                });
            }
        };

        let raw_payload = object
            .iter()
            .find(|(k, _)| k.as_str() == discriminant.as_str())
            .map(|(_, v)| v);
        let unknown: Vec<String> = object
            .iter()
            .map(|(k, _)| k)
            .filter(|k| k.as_str() != discriminant_key && k.as_str() != discriminant.as_str())
            .cloned()
            .collect();

        let Some(variant) = variants.iter().find(|v| v.wire_name == discriminant) else {
            if strictness.is_strict() && !unknown.is_empty() {
                return Err(DecodeError::UnknownFields { fields: unknown });
            }
            tracing::trace!(%name, %discriminant, "unknown union variant");
            return Ok(Value::Union(match raw_payload {
                Some(raw) => UnionValue::new(discriminant, Value::Any(raw.clone().into_value()?)),
                None => UnionValue::empty(discriminant),
            }));
        };

        if raw_payload.is_none() && variant.presence.is_required() {
            return Err(DecodeError::MissingFields {
                fields: vec![discriminant.to_string()],
            });
        }
        if strictness.is_strict() && !unknown.is_empty() {
            return Err(DecodeError::UnknownFields { fields: unknown });
        }

        Ok(Value::Union(
            match self.decode_field(raw_payload, variant, strictness)? {
                Some(payload) => UnionValue::new(discriminant, payload),
                None => UnionValue::empty(discriminant),
            },
        ))
    }
}

/// Object entries, rejecting any key that appears twice
fn expect_object<'j>(json: &'j Json, name: &TypeName) -> Result<&'j [(String, Json)], DecodeError> {
    let Json::Object(object) = json else {
        return Err(DecodeError::type_mismatch(name.to_string(), json.kind()));
    };
    let mut seen = HashSet::with_capacity(object.len());
    for (key, _) in object {
        if !seen.insert(key.as_str()) {
            return Err(DecodeError::DuplicateField { field: key.clone() });
        }
    }
    Ok(object)
}

fn expect_array<'j>(json: &'j Json, expected: &str) -> Result<&'j [Json], DecodeError> {
    match json {
        Json::Array(items) => Ok(items),
        other => Err(DecodeError::type_mismatch(expected, other.kind())),
    }
}

/// Declared value matching the uppercased input, else unknown with the
/// original text
fn decode_enum(raw: &str, values: &[SmolStr]) -> EnumValue {
    let upper = raw.to_uppercase();
    match values.iter().find(|v| v.as_str() == upper) {
        Some(value) => EnumValue::Known(value.clone()),
        None => EnumValue::unknown(raw),
    }
}

fn decode_scalar(json: &Json, primitive: PrimitiveType) -> Result<Value, DecodeError> {
    match primitive {
        PrimitiveType::Any => match json {
            Json::Null => Err(DecodeError::type_mismatch("any", json.kind())),
            other => Ok(Value::Any(other.clone().into_value()?)),
        },
        PrimitiveType::Boolean => match json {
            Json::Bool(b) => Ok(Value::Boolean(*b)),
            other => Err(DecodeError::type_mismatch("boolean", other.kind())),
        },
        PrimitiveType::Integer => scalar::integer_from_json(json).map(Value::Integer),
        PrimitiveType::Safelong => scalar::safelong_from_json(json).map(Value::Safelong),
        PrimitiveType::Double => scalar::double_from_json(json).map(Value::Double),
        text => {
            let Json::String(s) = json else {
                return Err(DecodeError::type_mismatch(
                    text.as_str().to_ascii_lowercase(),
                    json.kind(),
                ));
            };
            match text {
                PrimitiveType::Binary => scalar::decode_binary(s).map(Value::Binary),
                PrimitiveType::DateTime => scalar::parse_datetime(s).map(Value::DateTime),
                PrimitiveType::Uuid => scalar::parse_uuid(s).map(Value::Uuid),
                PrimitiveType::Rid => Rid::new(s).map(Value::Rid),
                PrimitiveType::BearerToken => BearerToken::new(s.as_str()).map(Value::BearerToken),
                _ => Ok(Value::String(s.clone())),
            }
        }
    }
}
