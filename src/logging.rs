//! Tracing subscriber setup for bot processes

use crate::config::NavConfig;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter when set. Fails if a
/// subscriber is already installed.
pub fn init_tracing(config: &NavConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    let (json, plain) = if config.log_json {
        (
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            ),
            None,
        )
    } else {
        (None, Some(fmt::layer().with_target(true)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()
}
