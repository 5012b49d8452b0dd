//! Tracing subscriber bootstrap.
//!
//! The workflow engine is a library; the embedding application (the REST
//! layer or a worker) calls [`init`] once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Reads the filter from `RUST_LOG`, falling back to `campuswatch=debug`.
/// Calling this twice panics, so it belongs in `main`, not in library code.
pub fn init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campuswatch=debug".into()),
        )
        .init();
}
