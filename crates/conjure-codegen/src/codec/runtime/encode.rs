use super::Codecs;
use crate::codec::{
    AliasStrategy, FieldCodec, KeyCodec, Presence, TypeCodec, UNION_DISCRIMINANT, ValueCodec,
};
use crate::graph::TypeName;
use conjure_common::types::scalar;
use conjure_common::types::{EnumValue, RecordValue, UnionValue};
use conjure_common::{EncodeError, Json, PrimitiveType, Value};
use smol_str::SmolStr;

impl Codecs {
    pub(super) fn encode_value(&self, value: &Value, codec: &ValueCodec) -> Result<Json, EncodeError> {
        match codec {
            ValueCodec::Scalar { primitive } => encode_scalar(value, *primitive),
            ValueCodec::Optional { item } => match value {
                Value::Optional(None) => Ok(Json::Null),
                Value::Optional(Some(inner)) => self.encode_value(inner, item),
                other => Err(mismatch("optional", other)),
            },
            ValueCodec::List { item } => match value {
                Value::List(items) => self.encode_items(items, item),
                other => Err(mismatch("list", other)),
            },
            ValueCodec::Set { item } => match value {
                Value::Set(items) => self.encode_items(items, item),
                other => Err(mismatch("set", other)),
            },
            ValueCodec::Map { key, value: item } => match value {
                Value::Map(entries) => {
                    let mut object = Vec::with_capacity(entries.len());
                    for (k, v) in entries.sorted() {
                        object.push((self.encode_key(k, key)?, self.encode_value(v, item)?));
                    }
                    Ok(Json::Object(object))
                }
                other => Err(mismatch("map", other)),
            },
            ValueCodec::Named { name } => self.encode_type(value, name),
            ValueCodec::External { name, fallback } => match self.externals.get(name) {
                Some(external) => external.encode(value).map_err(|e| EncodeError::External {
                    type_name: name.to_string(),
                    message: e.to_string(),
                }),
                None => self.encode_value(value, fallback),
            },
        }
    }

    fn encode_key(&self, key: &Value, codec: &KeyCodec) -> Result<String, EncodeError> {
        match (codec, key) {
            (KeyCodec::Scalar { primitive }, key) => scalar_key(key, *primitive),
            (KeyCodec::Enum { name }, Value::Enum(e)) => match self.type_codec_for_encode(name)? {
                TypeCodec::Enum { values } => enum_text(e, values, name),
                _ => Err(mismatch(name.to_string(), key)),
            },
            (KeyCodec::Enum { name }, other) => Err(mismatch(name.to_string(), other)),
        }
    }

    fn encode_items(&self, items: &[Value], codec: &ValueCodec) -> Result<Json, EncodeError> {
        items
            .iter()
            .map(|item| self.encode_value(item, codec))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    /// Encode through a named type's entry point
    pub(super) fn encode_type(&self, value: &Value, name: &TypeName) -> Result<Json, EncodeError> {
        match self.type_codec_for_encode(name)? {
            TypeCodec::Alias {
                strategy: AliasStrategy::Nullable,
                item,
            } => match value {
                Value::Optional(None) => Ok(Json::Null),
                Value::Optional(Some(inner)) => self.encode_value(inner, item),
                other => Err(mismatch(name.to_string(), other)),
            },
            TypeCodec::Alias { item, .. } => self.encode_value(value, item),
            TypeCodec::Enum { values } => match value {
                Value::Enum(e) => enum_text(e, values, name).map(Json::String),
                other => Err(mismatch(name.to_string(), other)),
            },
            TypeCodec::Record { fields } => match value {
                Value::Record(record) => self.encode_record(record, fields, name),
                other => Err(mismatch(name.to_string(), other)),
            },
            TypeCodec::Union { variants, .. } => match value {
                Value::Union(union) => self.encode_union(union, variants, name),
                other => Err(mismatch(name.to_string(), other)),
            },
        }
    }

    /// Fields in declaration order; absent optionals are omitted and absent
    /// collections are written empty
    fn encode_record(
        &self,
        record: &RecordValue,
        fields: &[FieldCodec],
        name: &TypeName,
    ) -> Result<Json, EncodeError> {
        if let Some((undeclared, _)) = record
            .iter()
            .find(|(k, _)| !fields.iter().any(|f| f.wire_name == **k))
        {
            return Err(EncodeError::type_mismatch(
                format!("a field of {name}"),
                undeclared.as_str(),
            ));
        }

        let mut object = Vec::with_capacity(fields.len());
        for field in fields {
            let value = record.get(&field.wire_name);
            match (value, field.presence) {
                (None, Presence::Optional) | (Some(Value::Optional(None)), Presence::Optional) => {
                    continue;
                }
                (None, Presence::Collection) => {
                    let empty = self.empty_value(&field.codec).ok_or_else(|| {
                        EncodeError::MissingField {
                            type_name: name.to_string(),
                            field: field.wire_name.to_string(),
                        }
                    })?;
                    object.push((
                        field.wire_name.to_string(),
                        self.encode_value(&empty, &field.codec)?,
                    ));
                }
                (None, Presence::Required) => {
                    return Err(EncodeError::MissingField {
                        type_name: name.to_string(),
                        field: field.wire_name.to_string(),
                    });
                }
                (Some(value), _) => {
                    object.push((
                        field.wire_name.to_string(),
                        self.encode_value(value, &field.codec)?,
                    ));
                }
            }
        }
        Ok(Json::Object(object))
    }

    /// The discriminant, then the populated variant's payload if present
    fn encode_union(
        &self,
        union: &UnionValue,
        variants: &[FieldCodec],
        name: &TypeName,
    ) -> Result<Json, EncodeError> {
        let discriminant = union.discriminant();
        let mut object = vec![(
            UNION_DISCRIMINANT.to_owned(),
            Json::String(discriminant.to_owned()),
        )];

        let Some(variant) = variants.iter().find(|v| v.wire_name.as_str() == discriminant) else {
            // Unknown variant: payload was kept as raw JSON
            match union.payload() {
                Some(Value::Any(raw)) => {
                    object.push((discriminant.to_owned(), Json::from(raw.clone())));
                }
                Some(other) => return Err(mismatch("raw JSON payload", other)),
                None => {}
            }
            return Ok(Json::Object(object));
        };

        let payload = match (union.payload(), variant.presence) {
            (Some(Value::Optional(None)) | None, Presence::Optional) => None,
            (Some(payload), _) => Some(payload.clone()),
            (None, Presence::Collection) => self.empty_value(&variant.codec),
            (None, Presence::Required) => {
                return Err(EncodeError::MissingField {
                    type_name: name.to_string(),
                    field: discriminant.to_owned(),
                });
            }
        };
        if let Some(payload) = payload {
            object.push((
                discriminant.to_owned(),
                self.encode_value(&payload, &variant.codec)?,
            ));
        }
        Ok(Json::Object(object))
    }
}

fn mismatch(expected: impl Into<String>, found: &Value) -> EncodeError {
    EncodeError::type_mismatch(expected, found.kind_name())
}

fn encode_scalar(value: &Value, primitive: PrimitiveType) -> Result<Json, EncodeError> {
    let json = match (primitive, value) {
        (PrimitiveType::Any, Value::Any(raw)) => Json::from(raw.clone()),
        (PrimitiveType::Boolean, Value::Boolean(b)) => Json::Bool(*b),
        (PrimitiveType::Integer, Value::Integer(i)) => Json::Number((*i).into()),
        (PrimitiveType::Safelong, Value::Safelong(i)) => {
            let i = scalar::check_safelong(*i)
                .map_err(|_| EncodeError::type_mismatch("safelong", i.to_string()))?;
            Json::Number(i.into())
        }
        (PrimitiveType::Double, Value::Double(d)) => scalar::double_to_json(*d),
        (PrimitiveType::String, Value::String(_))
        | (PrimitiveType::Binary, Value::Binary(_))
        | (PrimitiveType::DateTime, Value::DateTime(_))
        | (PrimitiveType::Uuid, Value::Uuid(_))
        | (PrimitiveType::Rid, Value::Rid(_))
        | (PrimitiveType::BearerToken, Value::BearerToken(_)) => {
            // Text forms coincide with key forms for these kinds
            Json::String(value.key_form().unwrap_or_default())
        }
        (primitive, other) => {
            return Err(mismatch(primitive.as_str().to_ascii_lowercase(), other));
        }
    };
    Ok(json)
}

/// Wire text of an enum value.
///
/// Unknown text that matches a declared value case-insensitively is
/// rejected, since it would decode back as the declared value.
fn enum_text(value: &EnumValue, values: &[SmolStr], name: &TypeName) -> Result<String, EncodeError> {
    let declared = |text: &str| values.iter().any(|v| v.as_str() == text);
    let valid = match value {
        EnumValue::Known(v) => declared(v.as_str()),
        EnumValue::Unknown(v) => !declared(v.to_uppercase().as_str()),
    };
    if valid {
        Ok(value.value().to_owned())
    } else {
        Err(EncodeError::type_mismatch(
            format!("a value of {name}"),
            value.value(),
        ))
    }
}

/// Key form of a map key, checked against its key codec
fn scalar_key(key: &Value, primitive: PrimitiveType) -> Result<String, EncodeError> {
    let matches = matches!(
        (primitive, key),
        (PrimitiveType::Boolean, Value::Boolean(_))
            | (PrimitiveType::Integer, Value::Integer(_))
            | (PrimitiveType::Safelong, Value::Safelong(_))
            | (PrimitiveType::Double, Value::Double(_))
            | (PrimitiveType::String, Value::String(_))
            | (PrimitiveType::Binary, Value::Binary(_))
            | (PrimitiveType::DateTime, Value::DateTime(_))
            | (PrimitiveType::Uuid, Value::Uuid(_))
            | (PrimitiveType::Rid, Value::Rid(_))
            | (PrimitiveType::BearerToken, Value::BearerToken(_))
    );
    match key.key_form() {
        Some(form) if matches => Ok(form),
        _ => Err(mismatch("map key", key)),
    }
}
