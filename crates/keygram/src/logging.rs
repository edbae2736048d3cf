//! ロギング初期化

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

/// Builds the filter: `RUST_LOG` if set, otherwise the configured level.
pub fn env_filter(level: LogLevel) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Installs a global fmt subscriber.
///
/// Returns `false` when a global subscriber was already installed (e.g. by the host
/// application or an earlier call); the existing one is kept.
pub fn init(level: LogLevel) -> bool {
  tracing_subscriber::registry()
    .with(env_filter(level))
    .with(tracing_subscriber::fmt::layer())
    .try_init()
    .is_ok()
}
