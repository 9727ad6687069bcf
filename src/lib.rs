pub mod compliance;
pub mod config;
pub mod db;
pub mod extraction;
pub mod interactions;
pub mod models;
pub mod pipeline;
pub mod schedule;
pub mod verify;

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber. RUST_LOG overrides the default
/// filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
