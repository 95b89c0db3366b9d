//! Command implementations
//!
//! Each subcommand lives in its own module and is re-exported here for the
//! router.

pub mod create;
pub mod delete;
pub mod describe;
pub mod list;
pub mod run;
pub mod streams;

pub use create::create_command;
pub use delete::delete_command;
pub use describe::describe_command;
pub use list::list_command;
pub use run::run_command;
pub use streams::stream_command;
