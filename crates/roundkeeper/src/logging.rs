//! Log output setup for binaries built on Roundkeeper.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber filtered by `RUST_LOG`,
/// falling back to `info`.
///
/// Safe to call more than once; later calls leave the first subscriber
/// in place.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`], with a custom filter used when `RUST_LOG` is unset.
pub fn init_with_default(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("log subscriber installed");
    }
}
