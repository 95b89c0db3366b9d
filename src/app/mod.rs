//! Application module
//!
//! Process-level concerns shared by every command:
//! - Configuration from the environment
//! - Logging setup
//! - Fatal error reporting

pub mod config;
pub mod error_handling;
pub mod logging;

pub use config::AppConfig;
pub use error_handling::{handle_fatal_error, usage_error};
pub use logging::init_logging;
