//! Bootstraps the `tracing` subscriber for the whole process.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::Log;

/// Environment variable holding an `EnvFilter` directive string, e.g `vr_player::playback=trace`.
pub const LOG_FILTER_ENV: &str = "VR_PLAYER_LOG";

const DEFAULT_FILTER: &str = "info";

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs a formatted subscriber filtered by `VR_PLAYER_LOG` (defaulting to `info`).
///
/// Safe to call more than once; only the first call does anything. If some other subscriber
/// was already installed globally, that one stays in place.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        match tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init() {
            Ok(()) => tracing::info!(target: Log::Host, "Logger initialized"),
            Err(error) => eprintln!("[vr-player] a global subscriber was already set: {error}"),
        }
    });
}
