//! Runtime support for generated Conjure JSON codecs.
//!
//! This crate holds everything the encode/decode procedures produced by
//! `conjure-codegen` need at runtime, independent of any particular schema:
//!
//! - [`types::Value`] - the dynamic value model for every Conjure type kind
//! - [`types::scalar`] - canonical JSON and map-key forms for scalars
//! - [`json::Json`] - an order-preserving JSON tree that keeps duplicate keys
//! - [`error`] - the decode and encode error taxonomy

#![warn(missing_docs)]
pub use smol_str;

pub mod error;
pub mod json;
/// Conjure primitive types, validated strings, and the value model.
#[allow(missing_docs)]
pub mod types;

pub use error::{DecodeError, EncodeError};
pub use json::{Json, JsonKind};
pub use types::{PrimitiveType, Value};
