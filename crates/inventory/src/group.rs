use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use ansiblereg_core::{Entity, EntityKind, Identity, RegistryError, RegistryResult};

use crate::entry::{Decoded, Entry};

/// Interior entity: a named collection of hosts and nested groups.
///
/// Entries are keyed by identity and kept in insertion order. Nested groups are
/// stored by value; they are snapshots of the group at the time they were added,
/// not live references to a top-level group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: Identity,
    name: String,
    entries: IndexMap<Identity, Entry>,
}

impl Group {
    /// Create an empty group with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Identity::generate(),
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Insert a new entity. Fails without mutating if its identity is already present.
    pub fn add_entity(&mut self, entity: impl Into<Entry>) -> RegistryResult<()> {
        let entity = entity.into();
        if self.entries.contains_key(entity.id()) {
            return Err(RegistryError::duplicate(format!(
                "entity '{}' in group '{}'",
                entity.id(),
                self.name
            )));
        }
        self.entries.insert(entity.id().clone(), entity);
        Ok(())
    }

    /// Insert or replace an entity by identity.
    pub fn update_entity(&mut self, entity: impl Into<Entry>) {
        let entity = entity.into();
        self.entries.insert(entity.id().clone(), entity);
    }

    /// Remove an entity by identity. Removing an absent entity is a no-op.
    pub fn remove_entity(&mut self, id: &Identity) -> Option<Entry> {
        self.entries.shift_remove(id)
    }

    pub fn entity(&self, id: &Identity) -> RegistryResult<&Entry> {
        self.entry(id).ok_or_else(|| {
            RegistryError::not_found(format!("entity '{id}' in group '{}'", self.name))
        })
    }

    pub fn entity_mut(&mut self, id: &Identity) -> RegistryResult<&mut Entry> {
        let name = &self.name;
        self.entries
            .get_mut(id)
            .ok_or_else(|| RegistryError::not_found(format!("entity '{id}' in group '{name}'")))
    }

    /// Non-failing probe by identity.
    pub fn entry(&self, id: &Identity) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &Identity) -> bool {
        self.entries.contains_key(id)
    }

    /// First entry whose display name matches. Names are not unique.
    pub fn find_entity_by_name(&self, name: &str) -> RegistryResult<&Entry> {
        self.entries
            .values()
            .find(|e| e.name() == name)
            .ok_or_else(|| {
                RegistryError::not_found(format!("entity named '{name}' in group '{}'", self.name))
            })
    }

    /// Display names of all entries.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entries.values().map(Entity::name).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Entity for Group {
    fn id(&self) -> &Identity {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Group
    }
}

// Wire shape: every entry is its own JSON document, embedded as a string.

#[derive(Serialize)]
struct GroupDocument<'a> {
    id: &'a Identity,
    #[serde(rename = "type")]
    kind: EntityKind,
    name: &'a str,
    entries: IndexMap<&'a Identity, String>,
}

#[derive(Deserialize)]
struct GroupRecord {
    id: Identity,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    entries: Option<IndexMap<String, String>>,
}

fn encode_entries<'a>(
    group_name: &str,
    entries: &'a IndexMap<Identity, Entry>,
) -> IndexMap<&'a Identity, String> {
    let mut encoded = IndexMap::with_capacity(entries.len());
    for (id, entry) in entries {
        match entry.to_json() {
            Ok(json) => {
                encoded.insert(id, json);
            }
            Err(e) => {
                warn!(
                    group = %group_name,
                    entity = %id,
                    error = %e,
                    "skipping entity that failed to serialize"
                );
            }
        }
    }
    encoded
}

fn decode_entries(
    group_name: &str,
    raw: IndexMap<String, String>,
) -> serde_json::Result<IndexMap<Identity, Entry>> {
    let mut group_entries = IndexMap::with_capacity(raw.len());
    for (key, json) in raw {
        match Entry::decode(&json)? {
            Decoded::Entry(entry) => {
                if group_entries.contains_key(entry.id()) {
                    warn!(
                        group = %group_name,
                        entity = %entry.id(),
                        "skipping duplicate entity identity"
                    );
                    continue;
                }
                group_entries.insert(entry.id().clone(), entry);
            }
            Decoded::UnknownKind(kind) => {
                warn!(
                    group = %group_name,
                    key = %key,
                    kind = kind.as_deref().unwrap_or("<missing>"),
                    "skipping entity with unrecognised type"
                );
            }
        }
    }
    Ok(group_entries)
}

impl Serialize for Group {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        GroupDocument {
            id: &self.id,
            kind: EntityKind::Group,
            name: &self.name,
            entries: encode_entries(&self.name, &self.entries),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Group {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = GroupRecord::deserialize(deserializer)?;
        if EntityKind::from_tag(&record.kind) != Some(EntityKind::Group) {
            return Err(serde::de::Error::custom(format!(
                "expected entity type GROUP, got '{}'",
                record.kind
            )));
        }
        let entries = decode_entries(&record.name, record.entries.unwrap_or_default())
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            id: record.id,
            name: record.name,
            entries,
        })
    }
}
