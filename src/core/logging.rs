//! Tracing subscriber setup for host applications and tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::core::errors::{Result, SignerError};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install a global fmt subscriber honoring `RUST_LOG`.
///
/// Repeated calls are no-ops. Returns a `Config` error only when another global
/// subscriber was installed by someone else first.
pub fn init_logging() -> Result<()> {
    INSTALLED
        .get_or_try_init(|| {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
            let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| SignerError::Config(format!("tracing subscriber already set: {}", e)))
        })
        .map(|_| ())
}
