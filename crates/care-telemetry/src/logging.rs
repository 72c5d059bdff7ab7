//! Tracing bootstrap.
//!
//! Called once by the runtime binary; library crates only emit `tracing`
//! events and never install a subscriber themselves.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// The filter honors `RUST_LOG`, defaulting to `info` for the workspace
/// crates. Calling this twice is a no-op (the second install fails and is
/// ignored), so tests can call it freely.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
