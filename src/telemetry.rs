//! Tracing setup for binaries and integration harnesses embedding the crate.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, defaulting to `info`. Set
/// `BUCKETLIST_LOG_FORMAT=json` for structured output.
///
/// Calling this twice panics (the global subscriber can only be set once);
/// embedders that already install a subscriber should skip it.
pub fn init_tracing() {
    let log_format =
        std::env::var("BUCKETLIST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}
