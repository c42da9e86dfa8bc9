//! Tracing/logging setup shared by every process embedding the registry.

/// Initialize process-wide logging with defaults (`RUST_LOG` or `info`, JSON).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&LogSettings::default());
}

pub use self::tracing::{init_with, LogFormat, LogSettings};

/// Tracing configuration (filters, layers).
pub mod tracing;
