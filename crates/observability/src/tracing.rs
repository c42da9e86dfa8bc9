//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Output layout.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines with timestamps.
    #[default]
    Json,
    /// Plain text on stderr without timestamps or colours, for hosts that
    /// capture and re-stamp plugin output.
    Plain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive (e.g. `debug`, `ansiblereg_infra=trace`). Falls back to
    /// `RUST_LOG`, then `info`.
    pub level: Option<String>,
    /// Include source file and line of each event.
    pub log_caller: bool,
    pub format: LogFormat,
}

fn filter(settings: &LogSettings) -> EnvFilter {
    settings
        .level
        .as_deref()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(settings: &LogSettings) {
    let caller = settings.log_caller;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(settings))
        .with_target(false)
        .with_file(caller)
        .with_line_number(caller);

    let installed = match settings.format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init()
            .is_ok(),
        LogFormat::Plain => builder
            .with_writer(std::io::stderr)
            .without_time()
            .with_ansi(false)
            .try_init()
            .is_ok(),
    };

    if installed {
        ::tracing::debug!(format = ?settings.format, log_caller = caller, "logging initialised");
    }
}
