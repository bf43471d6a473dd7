use core::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of Conjure primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrimitiveType {
    Any,
    Boolean,
    Double,
    Integer,
    Safelong,
    String,
    Binary,
    DateTime,
    Uuid,
    Rid,
    BearerToken,
}

impl PrimitiveType {
    /// Name as written in Conjure IR
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Any => "ANY",
            PrimitiveType::Boolean => "BOOLEAN",
            PrimitiveType::Double => "DOUBLE",
            PrimitiveType::Integer => "INTEGER",
            PrimitiveType::Safelong => "SAFELONG",
            PrimitiveType::String => "STRING",
            PrimitiveType::Binary => "BINARY",
            PrimitiveType::DateTime => "DATETIME",
            PrimitiveType::Uuid => "UUID",
            PrimitiveType::Rid => "RID",
            PrimitiveType::BearerToken => "BEARERTOKEN",
        }
    }

    /// Has its own text codec that an alias can delegate to
    pub fn has_text_codec(&self) -> bool {
        matches!(
            self,
            PrimitiveType::Binary
                | PrimitiveType::DateTime
                | PrimitiveType::Uuid
                | PrimitiveType::Rid
                | PrimitiveType::BearerToken
        )
    }

    /// Usable as a map key
    pub fn is_valid_key(&self) -> bool {
        !matches!(self, PrimitiveType::Any)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
