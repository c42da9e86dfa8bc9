use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use ansiblereg_core::{Entity, EntityKind, Identity, RegistryError, RegistryResult};

/// Host variables: arbitrary JSON values keyed by variable name.
pub type Variables = BTreeMap<String, Value>;

/// Leaf entity: a single Ansible target (IP or hostname) plus its variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    id: Identity,
    name: String,
    variables: Variables,
}

impl Host {
    /// Create a host with a fresh identity and no variables.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_variables(name, Variables::new())
    }

    /// Create a host with a fresh identity and an initial variable map.
    pub fn with_variables(name: impl Into<String>, variables: Variables) -> Self {
        Self {
            id: Identity::generate(),
            name: name.into(),
            variables,
        }
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> RegistryResult<&Value> {
        self.variables.get(name).ok_or_else(|| {
            RegistryError::not_found(format!("variable '{name}' on host '{}'", self.name))
        })
    }

    /// Insert or overwrite a variable. Any JSON value shape is accepted.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Merge variables in, overwriting existing keys.
    pub fn set_variables<I>(&mut self, variables: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.variables.extend(variables);
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }
}

impl Entity for Host {
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
        EntityKind::Host
    }
}

#[derive(Serialize)]
struct HostDocument<'a> {
    id: &'a Identity,
    #[serde(rename = "type")]
    kind: EntityKind,
    name: &'a str,
    variables: &'a Variables,
}

#[derive(Deserialize)]
struct HostRecord {
    id: Identity,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    variables: Option<Variables>,
}

impl Serialize for Host {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        HostDocument {
            id: &self.id,
            kind: EntityKind::Host,
            name: &self.name,
            variables: &self.variables,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Host {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = HostRecord::deserialize(deserializer)?;
        if EntityKind::from_tag(&record.kind) != Some(EntityKind::Host) {
            return Err(serde::de::Error::custom(format!(
                "expected entity type HOST, got '{}'",
                record.kind
            )));
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            variables: record.variables.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_host_has_fresh_identity_and_no_variables() {
        let a = Host::new("192.168.0.180");
        let b = Host::new("192.168.0.180");
        assert_ne!(a.id(), b.id());
        assert!(a.variables().is_empty());
        assert_eq!(a.kind(), EntityKind::Host);
    }

    #[test]
    fn missing_variable_is_not_found() {
        let host = Host::new("master");
        assert!(matches!(host.variable("ansible_user"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn set_variable_overwrites() {
        let mut host = Host::new("master");
        host.set_variable("name", "master-0");
        host.set_variable("name", "master-1");
        assert_eq!(host.variable("name").unwrap(), &json!("master-1"));
        assert_eq!(host.variables().len(), 1);
    }

    #[test]
    fn set_variables_merges() {
        let mut host = Host::new("master");
        host.set_variable("a", 1);
        host.set_variables([("a".to_string(), json!(2)), ("b".to_string(), json!(true))]);
        assert_eq!(host.variable("a").unwrap(), &json!(2));
        assert_eq!(host.variable("b").unwrap(), &json!(true));
    }

    #[test]
    fn serialized_document_carries_discriminator_and_empty_variables() {
        let host = Host::new("node-1");
        let value = serde_json::to_value(&host).unwrap();
        assert_eq!(value["type"], json!("HOST"));
        assert_eq!(value["name"], json!("node-1"));
        assert_eq!(value["id"], json!(host.id().as_str()));
        assert_eq!(value["variables"], json!({}));
    }

    #[test]
    fn nested_variables_survive_round_trip() {
        let mut host = Host::new("node-1");
        host.set_variable("port", 2222);
        host.set_variable("tags", json!(["a", "b"]));
        host.set_variable("extra", json!({"nested": {"enabled": false, "ratio": 0.5}}));

        let text = serde_json::to_string(&host).unwrap();
        let back: Host = serde_json::from_str(&text).unwrap();
        assert_eq!(back, host);
    }

    #[test]
    fn null_or_missing_variables_decode_as_empty() {
        let with_null: Host = serde_json::from_str(
            r#"{"id":"h1","type":"HOST","name":"a","variables":null}"#,
        )
        .unwrap();
        assert!(with_null.variables().is_empty());

        let without: Host =
            serde_json::from_str(r#"{"id":"h2","type":"HOST","name":"b"}"#).unwrap();
        assert!(without.variables().is_empty());
    }

    #[test]
    fn missing_name_decodes_as_empty() {
        let host: Host = serde_json::from_str(r#"{"id":"h1","type":"HOST"}"#).unwrap();
        assert_eq!(host.name(), "");
        assert_eq!(host.id().as_str(), "h1");
    }

    #[test]
    fn group_document_is_rejected() {
        let err = serde_json::from_str::<Host>(r#"{"id":"g1","type":"GROUP","name":"x"}"#);
        assert!(err.is_err());
    }
}
