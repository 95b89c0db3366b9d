//! Logging configuration and initialization

use crate::app::config::AppConfig;
use tracing::{debug, trace};

/// Initialize tracing for the process. Logs go to stderr so command output
/// on stdout stays machine readable.
pub fn init_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level())
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(config.verbose >= 3)
        .with_line_number(config.verbose >= 3)
        .init();

    debug!(
        "prominence {} using {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
