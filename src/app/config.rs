//! Application configuration
//!
//! Settings come from the command line verbosity and the environment.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use crate::api::{load_token, ProminenceClient};
use crate::error::Result;

pub const DEFAULT_API_URL: &str = "https://prominence.eosc-hub.eu/api/v1";
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const URL_VAR: &str = "PROMINENCE_URL";
const TOKEN_VAR: &str = "PROMINENCE_TOKEN";

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Base URL of the REST API, without a trailing slash
    pub api_url: String,
    /// Token taken from the environment, if any
    pub env_token: Option<String>,
    /// Token file written by the login flow
    pub token_file: Option<PathBuf>,
    pub timeout: Duration,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env(verbose: u8) -> Self {
        let api_url = std::env::var(URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            verbose,
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            env_token: std::env::var(TOKEN_VAR).ok(),
            token_file: dirs::home_dir().map(|home| home.join(".prominence").join("token")),
            timeout: HTTP_TIMEOUT,
        }
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "warn,prominence=debug",
            2 => "warn,prominence=trace",
            _ => "trace",
        }
    }

    /// Load the access token and build an authenticated client.
    pub fn client(&self) -> Result<ProminenceClient> {
        let token = load_token(
            self.env_token.as_deref(),
            self.token_file.as_deref(),
            Utc::now().timestamp(),
        )?;
        ProminenceClient::new(&self.api_url, token, self.timeout)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            api_url: DEFAULT_API_URL.to_string(),
            env_token: None,
            token_file: None,
            timeout: HTTP_TIMEOUT,
        }
    }
}
