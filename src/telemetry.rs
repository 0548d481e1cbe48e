//! Tracing setup for binaries and tests embedding the cache.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "submission_cache=info";

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// Returns false if a global subscriber was already installed, in which
/// case the existing one is left alone.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
