//! Telemetry logic.

use tracing_subscriber::EnvFilter;

/// Fallback directives when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "tally=info,tower_http=info,axum=info";

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when present. Header values never reach
/// the subscriber, the sensitive-headers layer redacts them upstream.
pub fn setup() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
