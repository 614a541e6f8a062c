//! Tracing subscriber setup for the binary.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber, filtered by `RUST_LOG`.
///
/// Logs go to stderr so rendered pages on stdout stay clean. A failed
/// install (for example a subscriber already set) is logged and ignored.
pub fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
