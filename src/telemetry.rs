//! Telemetry helpers for the exporter.
//!
//! Tracing setup stays explicit and opt-in. The CLI calls
//! `init_default_tracing`; library consumers can wire their own subscriber.

/// Default filter used when `RUST_LOG` is unset.
///
/// Progress output goes to stdout, so logs stay quiet unless something is off.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Initializes a stderr `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
            )
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
