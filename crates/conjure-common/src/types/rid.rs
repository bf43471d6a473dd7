use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::DecodeError;

/// Resource identifier of the form `ri.<service>.<instance>.<type>.<locator>`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Rid(SmolStr);

/// Regex for resource identifier validation.
///
/// The instance component may be empty; the locator may contain dots.
pub static RID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^ri\.[a-z][a-z0-9\-]*\.([a-z0-9][a-z0-9\-]*)?\.[a-z][a-z0-9\-]*\.[a-zA-Z0-9_\-\.]+$",
    )
    .unwrap()
});

impl Rid {
    /// Fallible constructor, validates
    pub fn new(rid: impl AsRef<str>) -> Result<Self, DecodeError> {
        let rid = rid.as_ref();
        if RID_REGEX.is_match(rid) {
            Ok(Self(SmolStr::new(rid)))
        } else {
            Err(DecodeError::invalid_value(
                "rid",
                format!("`{rid}` does not match ri.<service>.<instance>.<type>.<locator>"),
            ))
        }
    }

    /// Service component
    pub fn service(&self) -> &str {
        self.components().0
    }

    /// Instance component, possibly empty
    pub fn instance(&self) -> &str {
        self.components().1
    }

    /// Type component
    pub fn resource_type(&self) -> &str {
        self.components().2
    }

    /// Locator component
    pub fn locator(&self) -> &str {
        self.components().3
    }

    fn components(&self) -> (&str, &str, &str, &str) {
        // validated on construction, so all five segments exist
        let mut parts = self.0.splitn(5, '.').skip(1);
        let service = parts.next().unwrap_or_default();
        let instance = parts.next().unwrap_or_default();
        let resource_type = parts.next().unwrap_or_default();
        let locator = parts.next().unwrap_or_default();
        (service, instance, resource_type, locator)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Rid {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Rid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Rid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
