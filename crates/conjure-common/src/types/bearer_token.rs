use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::DecodeError;

/// An opaque bearer token.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BearerToken(String);

/// RFC 6750 `b64token` grammar
pub static BEARER_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-\._~\+/]+=*$").unwrap());

impl BearerToken {
    /// Fallible constructor, validates
    pub fn new(token: impl Into<String>) -> Result<Self, DecodeError> {
        let token = token.into();
        if BEARER_TOKEN_REGEX.is_match(&token) {
            Ok(Self(token))
        } else {
            Err(DecodeError::invalid_value(
                "bearer token",
                "contains characters outside the b64token alphabet",
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl FromStr for BearerToken {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for BearerToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let token = BearerToken::new("abc.def-ghi==").unwrap();
        assert_eq!(format!("{token:?}"), "BearerToken(<redacted>)");
        assert_eq!(token.as_str(), "abc.def-ghi==");
    }

    #[test]
    fn rejects_whitespace_and_inner_padding() {
        assert!(BearerToken::new("abc def").is_err());
        assert!(BearerToken::new("ab=cd").is_err());
        assert!(BearerToken::new("").is_err());
    }
}
