//! `ansiblereg-core`: registry building blocks.
//!
//! This crate contains **pure** primitives (no filesystem, no logging setup).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, EntityKind};
pub use error::{RegistryError, RegistryResult};
pub use id::Identity;
