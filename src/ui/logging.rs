//! ui::logging
//!
//! Install the `tracing` subscriber for the binary.
//!
//! Records go to stderr. The level comes from [`Verbosity`] unless
//! `RUST_LOG` is set.

use tracing_subscriber::EnvFilter;

use super::output::Verbosity;

/// Filter for `verbosity`, overridden by `RUST_LOG` when present.
pub fn filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .try_init();
}
