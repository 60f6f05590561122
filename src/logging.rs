// src/logging.rs

use tracing::Level;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,tower_http=debug,sqlx=warn";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// `[ctx1 | ctx2] message`, or just `message` without context.
pub fn format_message(context: &[&str], message: &str) -> String {
    if context.is_empty() {
        message.to_owned()
    } else {
        format!("[{}] {}", context.join(" | "), message)
    }
}

/// Writes one line at `level`; the subscriber renders the uppercased level tag
/// in front of it.
pub fn log(level: Level, context: &[&str], message: impl AsRef<str>) {
    let line = format_message(context, message.as_ref());
    match level {
        Level::ERROR => tracing::error!("{line}"),
        Level::WARN => tracing::warn!("{line}"),
        Level::INFO => tracing::info!("{line}"),
        Level::DEBUG => tracing::debug!("{line}"),
        _ => tracing::trace!("{line}"),
    }
}
