//! Canonical wire forms for Conjure scalars.
//!
//! Every scalar has a JSON form (used for values) and a key form (used when
//! the scalar is a map key, where JSON only allows strings).

use base64::{Engine, prelude::BASE64_STANDARD};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::error::DecodeError;
use crate::json::Json;

/// Quoted sentinel for `f64::NAN`
pub const NAN: &str = "NaN";
/// Quoted sentinel for positive infinity
pub const INFINITY: &str = "Infinity";
/// Quoted sentinel for negative infinity
pub const NEG_INFINITY: &str = "-Infinity";

/// Largest magnitude a safelong may hold, `2^53 - 1`
pub const MAX_SAFE_LONG: i64 = (1 << 53) - 1;
/// Smallest safelong
pub const MIN_SAFE_LONG: i64 = -MAX_SAFE_LONG;

/// JSON form of a double: a number, or a quoted sentinel when non-finite
pub fn double_to_json(value: f64) -> Json {
    match serde_json::Number::from_f64(value) {
        Some(n) => Json::Number(n),
        None => Json::String(non_finite_sentinel(value).to_owned()),
    }
}

/// Decode a double from its JSON form.
///
/// Strings are matched literally against the three sentinels before any
/// numeric interpretation is attempted.
pub fn double_from_json(json: &Json) -> Result<f64, DecodeError> {
    match json {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| DecodeError::invalid_value("double", format!("{n} is not representable"))),
        Json::String(s) => double_from_sentinel(s).ok_or_else(|| {
            DecodeError::invalid_value(
                "double",
                format!("`{s}` is not one of {NAN}, {INFINITY}, {NEG_INFINITY}"),
            )
        }),
        other => Err(DecodeError::type_mismatch("double", other.kind())),
    }
}

/// Match a sentinel string exactly
pub fn double_from_sentinel(s: &str) -> Option<f64> {
    match s {
        NAN => Some(f64::NAN),
        INFINITY => Some(f64::INFINITY),
        NEG_INFINITY => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

fn non_finite_sentinel(value: f64) -> &'static str {
    if value.is_nan() {
        NAN
    } else if value.is_sign_positive() {
        INFINITY
    } else {
        NEG_INFINITY
    }
}

/// Key form of a double
pub fn double_key(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        non_finite_sentinel(value).to_owned()
    }
}

/// Parse the key form of a double: a sentinel, else decimal text
pub fn double_from_key(key: &str) -> Result<f64, DecodeError> {
    if let Some(v) = double_from_sentinel(key) {
        return Ok(v);
    }
    key.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::invalid_value("double", format!("`{key}` is not a number")))
}

/// Decode a 32-bit integer from a JSON number
pub fn integer_from_json(json: &Json) -> Result<i32, DecodeError> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| DecodeError::invalid_value("integer", format!("{n} is not a 32-bit integer"))),
        other => Err(DecodeError::type_mismatch("integer", other.kind())),
    }
}

/// Decode a safelong from a JSON number, enforcing the ±(2^53 − 1) range
pub fn safelong_from_json(json: &Json) -> Result<i64, DecodeError> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .ok_or_else(|| DecodeError::invalid_value("safelong", format!("{n} is not an integer")))
            .and_then(check_safelong),
        other => Err(DecodeError::type_mismatch("safelong", other.kind())),
    }
}

/// Reject values outside the safelong range
pub fn check_safelong(value: i64) -> Result<i64, DecodeError> {
    if (MIN_SAFE_LONG..=MAX_SAFE_LONG).contains(&value) {
        Ok(value)
    } else {
        Err(DecodeError::invalid_value(
            "safelong",
            format!("{value} is outside ±(2^53 - 1)"),
        ))
    }
}

/// Parse the key form of a 32-bit integer
pub fn integer_from_key(key: &str) -> Result<i32, DecodeError> {
    key.parse::<i32>()
        .map_err(|e| DecodeError::invalid_value("integer", format!("`{key}`: {e}")))
}

/// Parse the key form of a safelong
pub fn safelong_from_key(key: &str) -> Result<i64, DecodeError> {
    key.parse::<i64>()
        .map_err(|e| DecodeError::invalid_value("safelong", format!("`{key}`: {e}")))
        .and_then(check_safelong)
}

/// Parse the key form of a boolean; only the exact literals are accepted
pub fn boolean_from_key(key: &str) -> Result<bool, DecodeError> {
    match key {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(DecodeError::invalid_value(
            "boolean",
            format!("`{other}` is neither true nor false"),
        )),
    }
}

/// Base64 text of a binary value
pub fn encode_binary(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Decode base64 text into bytes
pub fn decode_binary(text: &str) -> Result<Bytes, DecodeError> {
    BASE64_STANDARD
        .decode(text)
        .map(Bytes::from)
        .map_err(|e| DecodeError::invalid_value("binary", e.to_string()))
}

/// ISO 8601 text of a date-time, preserving its offset
pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an ISO 8601 / RFC 3339 date-time
pub fn parse_datetime(text: &str) -> Result<DateTime<FixedOffset>, DecodeError> {
    DateTime::parse_from_rfc3339(text)
        .map_err(|e| DecodeError::invalid_value("datetime", format!("`{text}`: {e}")))
}

/// Parse a UUID in its hyphenated form
pub fn parse_uuid(text: &str) -> Result<uuid::Uuid, DecodeError> {
    uuid::Uuid::parse_str(text)
        .map_err(|e| DecodeError::invalid_value("uuid", format!("`{text}`: {e}")))
}
