//! # Care Runtime
//!
//! Single-process host for the clinical services. Wires the allergy
//! registry, therapy service and clinical diary over the in-process event
//! bus, starts the dispatch loops, and runs until shutdown.
//!
//! ## Startup Sequence
//!
//! 1. Install tracing (honors `RUST_LOG`)
//! 2. Load store configuration from the environment
//! 3. Construct bus, services and the process-wide circuit breaker
//! 4. Spawn the dispatch loops
//! 5. Run until ctrl-c

mod wiring;

use anyhow::Result;
use shared_types::StoreCredentials;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    care_telemetry::init_tracing();

    // Driver wiring is external; the settings are loaded and reported here
    // so misconfiguration shows up at startup, not at first use.
    let credentials = StoreCredentials::from_env("clinical-records");
    info!(
        host = %credentials.host,
        port = credentials.port,
        db = %credentials.db_name,
        "store configuration loaded"
    );

    let services = wiring::wire();
    let dispatchers = wiring::spawn_dispatchers(&services);
    info!(
        subscribers = services.bus.subscriber_count(),
        breaker = services.breaker.name(),
        "services wired, dispatch loops running"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");

    // The dispatch loops hold their own handle on the bus (via the services'
    // publishers), so the channel never closes on its own; stop them directly.
    for dispatcher in dispatchers {
        dispatcher.abort();
    }
    Ok(())
}
