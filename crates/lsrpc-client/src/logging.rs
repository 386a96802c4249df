use crate::LogLevel;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber for the chosen profile.
/// `RUST_LOG` still wins when set. Safe to call more than once; later calls
/// are no-ops.
pub fn init_logging(level: LogLevel) {
    let default_directive = match level {
        LogLevel::Dev => "debug",
        LogLevel::Prod => "warn",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
