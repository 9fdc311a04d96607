// src/logging.rs

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `tracing` subscriber for the executables.
///
/// `RUST_LOG` overrides the default filter `info,dendrite_sim=debug`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dendrite_sim=debug"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
