//! Conjure runtime data types

pub mod bearer_token;
pub mod primitive;
pub mod rid;
pub mod scalar;
pub mod value;

pub use bearer_token::BearerToken;
pub use primitive::PrimitiveType;
pub use rid::Rid;
pub use value::{EnumValue, MapEntries, RecordValue, UnionValue, Value};
