//! Ansible inventory domain model.
//!
//! Hosts, groups (nestable), the polymorphic entry codec, the identity-keyed
//! group registry and the INI encoder. Pure logic: no filesystem access.

pub mod encoder;
pub mod entry;
pub mod group;
pub mod host;
pub mod registry;

pub use encoder::{encode, encode_to};
pub use entry::{Decoded, Entry};
pub use group::Group;
pub use host::{Host, Variables};
pub use registry::Registry;
