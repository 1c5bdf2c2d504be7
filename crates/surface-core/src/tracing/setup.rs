//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Directive used when `SURFACE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "surface=info";

/// Initialize the tracing/logging system.
///
/// Reads the `SURFACE_LOG` environment variable for per-subsystem log levels.
/// Format: `SURFACE_LOG=surface_analysis::loaders=debug,surface_analysis::metrics=warn`
///
/// Falls back to `surface=info` if `SURFACE_LOG` is not set or is invalid.
/// Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = env_filter();

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

/// The filter `init_tracing` installs: `SURFACE_LOG` when it parses,
/// otherwise `DEFAULT_FILTER`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("SURFACE_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
