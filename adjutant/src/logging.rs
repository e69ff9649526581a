//! Logging initialization.
//!
//! Diagnostics go to stderr so the CLI's stdout stays reserved for command
//! output (and machine-readable reports under `--json`).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// The filter defaults to `warn` and is overridden with `RUST_LOG`, e.g.
/// `RUST_LOG=adjutant=debug` to watch stage transitions and command verdicts.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
