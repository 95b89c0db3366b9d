use clap::Parser;
use prominence::app::{handle_fatal_error, init_logging, usage_error, AppConfig};
use prominence::cli::{execute_command, Cli};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => handle_fatal_error(usage_error(e), 0),
    };

    let config = AppConfig::from_env(cli.verbose);
    init_logging(&config);

    if let Err(e) = execute_command(cli.command, &config).await {
        handle_fatal_error(e, cli.verbose);
    }
}
