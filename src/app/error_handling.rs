//! Fatal error reporting
//!
//! Every failure ends the invocation here: the message is printed on stdout
//! as `Error: <message>` and the process exits with status 1.

use clap::error::ErrorKind;
use tracing::error;

use crate::error::Error;

/// Text printed for a fatal error, including the `Error: ` prefix.
pub fn fatal_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<Error>() {
        Some(err) => format!("Error: {}", err.user_message()),
        None => format!("Error: {error}"),
    }
}

/// Print the error and exit.
///
/// With `-v` the full cause chain goes to stderr as well.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {:#}", error);

    println!("{}", fatal_message(&error));

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    let exit_code = error
        .downcast_ref::<Error>()
        .map(Error::exit_code)
        .unwrap_or(1);
    std::process::exit(exit_code)
}

/// Turn a command line parse failure into a usage error.
///
/// Help and version requests are not failures and are handed back to clap,
/// which prints them and exits 0.
pub fn usage_error(err: clap::Error) -> anyhow::Error {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => Error::Usage(usage_message(&err)).into(),
    }
}

/// First line of clap's rendered error without its `error: ` prefix.
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}
