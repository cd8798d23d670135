//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::defaults::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};

static INIT: Once = Once::new();

/// Initialize the meterbind tracing/logging system.
///
/// Reads the `METERBIND_LOG` environment variable for per-target log levels.
/// Format: `METERBIND_LOG=meterbind_engine=debug,meterbind_simple=warn`
///
/// Falls back to `meterbind=info` if `METERBIND_LOG` is not set or is invalid.
///
/// Idempotent: calling it multiple times is safe. Does nothing if another
/// global subscriber was installed first.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
