//! Opt-in log output for the dashboard binary and embedding hosts.
//!
//! Library code only emits `tracing` events (fetches, cycle boundaries, slot
//! failures). Stdout carries the published output sets, so the default
//! subscriber writes to stderr.

/// Installs a compact stderr subscriber filtered by `RUST_LOG` (default
/// `info`).
///
/// Returns `false` without the `telemetry` feature or when the host already
/// set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
