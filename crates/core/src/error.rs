//! Registry error model.

use thiserror::Error;

/// Result type used across the registry crates.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry-level error.
///
/// Payloads are plain strings so errors stay `Clone` and comparable in tests;
/// infrastructure errors are rendered into the message at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An identity was inserted into a map that already holds it.
    #[error("already exists: {0}")]
    Duplicate(String),

    /// A lookup missed where the API cannot return an empty result.
    #[error("not found: {0}")]
    NotFound(String),

    /// An identifier was rejected (e.g. empty token).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value could not be turned into JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Persisted JSON could not be turned back into registry values.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A single JSON value had the wrong shape (e.g. identity that is not a string).
    #[error("decode failed: {0}")]
    Decode(String),

    /// An entry could not be rendered into the inventory text format.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(String),
}

impl RegistryError {
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn deserialization(msg: impl Into<String>) -> Self {
        Self::Deserialization(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Returns true for lookup misses, which lifecycle callers often treat as soft.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}
