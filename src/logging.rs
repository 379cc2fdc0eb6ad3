//! Diagnostic logging setup.
//!
//! Diagnostics (zero-time anomalies, skipped statistics) go through `tracing`
//! to stderr. The analysis summary itself is regular stdout output.

use tracing::Level;

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::WARN)
        .with_target(false)
        .try_init();
}
