use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("unable to parse description as JSON or YAML: {0}")]
    Parse(String),

    #[error("unable to fetch {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    #[error("invalid description: {0}")]
    InvalidDescription(String),

    #[error("input file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("input file {} is {size} bytes, input files must be smaller than {limit} bytes", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("token expired")]
    TokenExpired,

    #[error("{0}")]
    Token(String),

    #[error("unable to connect to {url}: {message}")]
    Connection { url: String, message: String },

    #[error("{0}")]
    JobCreation(String),

    #[error("{0}")]
    JobGet(String),

    #[error("{0}")]
    Deletion(String),

    #[error("{0}")]
    StdStreams(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Message shown to the user, without the `Error: ` prefix.
    ///
    /// Authentication failures get fixed wording so that nothing from the
    /// identity provider leaks onto the terminal.
    pub fn user_message(&self) -> String {
        match self {
            Error::Authentication(_) => {
                "authentication failed, please obtain a new token".to_string()
            }
            Error::TokenExpired => "your token has expired, please obtain a new token".to_string(),
            other => other.to_string(),
        }
    }

    /// Every reported failure terminates the invocation with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Error::Authentication(_) | Error::TokenExpired | Error::Token(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
