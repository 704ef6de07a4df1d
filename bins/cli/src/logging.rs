//! Process-wide `tracing` subscriber setup.

use faultline_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install a JSON `tracing` subscriber on stderr when the config asks for it.
///
/// `RUST_LOG` wins over the configured level. Returns false when nothing was
/// installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    if config.format != LogFormat::Tracing {
        return false;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
