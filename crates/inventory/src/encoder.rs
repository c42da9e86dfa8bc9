//! INI-style Ansible inventory rendering.
//!
//! ```text
//! [master]
//! 192.168.0.180 name=master-1
//!
//! [k3s_cluster:children]
//! master
//! ```

use std::io::Write;

use serde_json::Value;

use ansiblereg_core::{Entity, RegistryError, RegistryResult};

use crate::entry::Entry;
use crate::group::Group;
use crate::registry::Registry;

/// Render the registry to inventory text.
///
/// Groups are emitted in registry order, one `[name]` block each, separated by
/// a blank line. Host lines carry `key=value` tokens in key order.
pub fn encode(registry: &Registry) -> RegistryResult<String> {
    let mut blocks = Vec::with_capacity(registry.len());
    for group in registry.groups() {
        blocks.push(encode_group(group)?);
    }
    Ok(blocks.join("\n"))
}

/// Render the registry into `writer`.
pub fn encode_to<W: Write>(writer: &mut W, registry: &Registry) -> RegistryResult<()> {
    let text = encode(registry)?;
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| RegistryError::io(format!("failed to write inventory: {e}")))
}

fn encode_group(group: &Group) -> RegistryResult<String> {
    let mut block = format!("[{}]\n", checked_line(group.name())?);
    for entry in group.entries() {
        block.push_str(&encode_entry(entry)?);
        block.push('\n');
    }
    Ok(block)
}

fn encode_entry(entry: &Entry) -> RegistryResult<String> {
    match entry {
        Entry::Group(g) => checked_line(g.name()).map(str::to_string),
        Entry::Host(h) => {
            let mut line = checked_line(h.name())?.to_string();
            for (key, value) in h.variables() {
                let value = render_value(value);
                line.push(' ');
                line.push_str(checked_line(key)?);
                line.push('=');
                line.push_str(checked_line(&value)?);
            }
            Ok(line)
        }
    }
}

/// Natural string form of a variable value: strings bare, everything else as
/// compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// The format is line-oriented; a line break inside a token cannot be represented.
fn checked_line(token: &str) -> RegistryResult<&str> {
    if token.contains(['\n', '\r']) {
        return Err(RegistryError::encode(format!(
            "token {token:?} contains a line break"
        )));
    }
    Ok(token)
}
