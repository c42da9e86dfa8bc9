//! Polymorphic group member: a leaf host or a nested group.
//!
//! Decoding always goes through the persisted `type` tag: the tag is probed
//! first, then the matching decoder from [`DECODERS`] parses the document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use ansiblereg_core::{Entity, EntityKind, Identity};

use crate::group::Group;
use crate::host::Host;

/// Member of a [`Group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Host(Host),
    Group(Group),
}

type Decoder = fn(Value) -> serde_json::Result<Entry>;

/// Decoders keyed by discriminator.
const DECODERS: [(EntityKind, Decoder); 2] = [
    (EntityKind::Host, decode_host),
    (EntityKind::Group, decode_group),
];

fn decode_host(value: Value) -> serde_json::Result<Entry> {
    serde_json::from_value::<Host>(value).map(Entry::Host)
}

fn decode_group(value: Value) -> serde_json::Result<Entry> {
    serde_json::from_value::<Group>(value).map(Entry::Group)
}

fn decoder_for(tag: &str) -> Option<Decoder> {
    let kind = EntityKind::from_tag(tag)?;
    DECODERS
        .iter()
        .find_map(|(k, decoder)| (*k == kind).then_some(*decoder))
}

/// Outcome of decoding one embedded entity document.
#[derive(Debug)]
pub enum Decoded {
    Entry(Entry),
    /// The document had no `type` field or an unrecognised one.
    UnknownKind(Option<String>),
}

impl Entry {
    /// Encode this entry to its own JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode an embedded entity document by probing its discriminator.
    ///
    /// Malformed JSON is an error; a missing or unknown tag is reported as
    /// [`Decoded::UnknownKind`] so callers can skip the entry.
    pub fn decode(json: &str) -> serde_json::Result<Decoded> {
        Self::decode_value(serde_json::from_str(json)?)
    }

    /// Same as [`Entry::decode`] for an already parsed document.
    pub fn decode_value(value: Value) -> serde_json::Result<Decoded> {
        let tag = value.get("type").and_then(Value::as_str).map(str::to_string);
        match tag.as_deref().and_then(decoder_for) {
            Some(decoder) => decoder(value).map(Decoded::Entry),
            None => Ok(Decoded::UnknownKind(tag)),
        }
    }

    pub fn as_host(&self) -> Option<&Host> {
        match self {
            Entry::Host(h) => Some(h),
            Entry::Group(_) => None,
        }
    }

    pub fn as_host_mut(&mut self) -> Option<&mut Host> {
        match self {
            Entry::Host(h) => Some(h),
            Entry::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Entry::Group(g) => Some(g),
            Entry::Host(_) => None,
        }
    }
}

impl From<Host> for Entry {
    fn from(value: Host) -> Self {
        Entry::Host(value)
    }
}

impl From<Group> for Entry {
    fn from(value: Group) -> Self {
        Entry::Group(value)
    }
}

impl Entity for Entry {
    fn id(&self) -> &Identity {
        match self {
            Entry::Host(h) => h.id(),
            Entry::Group(g) => g.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Entry::Host(h) => h.name(),
            Entry::Group(g) => g.name(),
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            Entry::Host(h) => h.set_name(name),
            Entry::Group(g) => g.set_name(name),
        }
    }

    fn kind(&self) -> EntityKind {
        match self {
            Entry::Host(_) => EntityKind::Host,
            Entry::Group(_) => EntityKind::Group,
        }
    }
}

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Entry::Host(h) => h.serialize(serializer),
            Entry::Group(g) => g.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        match Entry::decode_value(value).map_err(D::Error::custom)? {
            Decoded::Entry(entry) => Ok(entry),
            Decoded::UnknownKind(tag) => Err(D::Error::custom(format!(
                "unknown entity type '{}'",
                tag.as_deref().unwrap_or("<missing>")
            ))),
        }
    }
}
