//! Opt-in tracing setup for scripts that just want chart failures printed.
//!
//! Reported chart failures are `tracing::error!` events and theme fallbacks are
//! `tracing::warn!` events, so nothing is visible until a subscriber exists.
//! Hosts with their own subscriber can ignore this module entirely.

/// Filter used when `RUST_LOG` is unset: warnings and errors from this crate.
pub const DEFAULT_FILTER: &str = "easy_graph=warn";

/// Installs a compact stderr subscriber honoring `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber was already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback filter.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
