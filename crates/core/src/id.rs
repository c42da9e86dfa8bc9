//! Opaque identifiers for registry entities.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{RegistryError, RegistryResult};

/// Identifier of a host, group or inventory.
///
/// Freshly generated identities are 32 lowercase hex digits (a UUIDv4 in simple
/// form), but any non-empty token read back from disk is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Generate a new random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an existing token, rejecting empty input.
    pub fn parse(token: impl Into<String>) -> RegistryResult<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(RegistryError::invalid_id("identity cannot be empty"));
        }
        Ok(Self(token))
    }

    /// Decode an identity from a JSON value, which must be a string literal.
    pub fn from_json(value: &serde_json::Value) -> RegistryResult<Self> {
        match value {
            serde_json::Value::String(s) => {
                Self::parse(s.as_str()).map_err(|e| RegistryError::decode(e.to_string()))
            }
            other => Err(RegistryError::decode(format!(
                "identity must be a JSON string, got {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Self::parse(token).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn generated_identities_differ() {
        let a = Identity::generate();
        let b = Identity::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_identity_is_lowercase_hex() {
        let id = Identity::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn many_identities_are_pairwise_distinct() {
        let ids: HashSet<Identity> = (0..10_000).map(|_| Identity::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = Identity::parse("abc123").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");

        let back: Identity = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn non_string_json_is_a_decode_error() {
        let err = Identity::from_json(&serde_json::json!(42)).unwrap_err();
        assert!(matches!(err, RegistryError::Decode(_)));

        assert!(serde_json::from_str::<Identity>("42").is_err());
        assert!(serde_json::from_str::<Identity>("\"\"").is_err());
    }

    #[test]
    fn parse_rejects_empty_token() {
        assert!(matches!(
            "".parse::<Identity>(),
            Err(RegistryError::InvalidId(_))
        ));
    }

    proptest! {
        #[test]
        fn any_non_empty_token_is_kept_verbatim(token in "\\PC{1,40}") {
            let id = Identity::parse(token.clone()).unwrap();
            prop_assert_eq!(id.as_str(), token.as_str());
            prop_assert_eq!(Identity::from_json(&serde_json::Value::String(token)).unwrap(), id);
        }
    }
}
