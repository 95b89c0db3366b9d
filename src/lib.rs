//! # Prominence
//!
//! Command line client for the Prominence platform, which runs containerised
//! jobs and workflows on remote cloud and batch resources.
//!
//! ## Usage
//!
//! ```bash
//! prominence run job.yaml
//! prominence create --cpus 2 --memory 4 busybox "echo hello"
//! prominence list jobs --completed -n 5
//! prominence describe job 42
//! ```
//!
//! ## Modules
//!
//! - `description` - Typed job and workflow descriptions and the pipeline that normalizes them
//! - `render` - Display documents and tables built from platform records
//! - `api` - REST client and access token handling
//! - `app` - Configuration, logging and fatal error reporting
//! - `cli` - Argument parsing and command implementations
//! - `error` - Error types shared by the library
pub mod api;
pub mod app;
pub mod cli;
pub mod description;
pub mod error;
pub mod render;

pub use error::{Error, Result};
