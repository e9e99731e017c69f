//! # Logging initialization
//!
//! The crate logs through `tracing`: `info!` for batch milestones, `debug!` for per-body
//! detail and `warn!` for every data-quality warning. Nothing is printed unless the host
//! application installs a subscriber; [`init_tracing`] installs a compact `fmt` subscriber
//! filtered by `RUST_LOG`, defaulting to `orbdrift=info` (or `orbdrift=debug` when
//! verbose).
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::drift_errors::DriftError;

/// Install the global `tracing` subscriber.
///
/// Return
/// ----------
/// * `Err(DriftError::LoggingError)` when the filter is invalid or a global subscriber
///   is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), DriftError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("orbdrift={level}")))
        .map_err(|e| DriftError::LoggingError(format!("invalid log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| DriftError::LoggingError(e.to_string()))
}

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orbdrift=debug"));

        let fmt_layer = fmt::layer().with_test_writer().with_target(false).compact();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod logging_test {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        init_test_logging();
        assert!(matches!(
            init_tracing(false),
            Err(DriftError::LoggingError(_))
        ));
    }
}
