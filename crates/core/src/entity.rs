//! Entity trait: identity + name + persisted type discriminator.

use serde::{Deserialize, Serialize};

use crate::id::Identity;

/// Discriminator written as the `type` field of every serialized entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "HOST")]
    Host,
    #[serde(rename = "GROUP")]
    Group,
}

impl EntityKind {
    pub const fn as_tag(self) -> &'static str {
        match self {
            EntityKind::Host => "HOST",
            EntityKind::Group => "GROUP",
        }
    }

    /// Resolve a persisted tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "HOST" => Some(EntityKind::Host),
            "GROUP" => Some(EntityKind::Group),
            _ => None,
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A named, identifiable member of a group.
///
/// Serialization is part of the contract: every entity must be writable to and
/// readable from its own JSON document carrying [`EntityKind`] as `type`.
pub trait Entity: Serialize + for<'de> Deserialize<'de> {
    /// Returns the entity identifier.
    fn id(&self) -> &Identity;

    /// Returns the display name.
    fn name(&self) -> &str;

    /// Replaces the display name; the identity is unchanged.
    fn set_name(&mut self, name: String);

    /// Returns the type discriminator.
    fn kind(&self) -> EntityKind;
}
