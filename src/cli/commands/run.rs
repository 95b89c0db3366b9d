//! `run`: submit a description file or URL

use anyhow::Result;
use tracing::debug;

use crate::app::AppConfig;
use crate::description::{resolve_source, Description};

pub async fn run_command(config: &AppConfig, source: &str, dry_run: bool) -> Result<()> {
    let description = resolve_source(source).await?;
    submit_description(config, description, dry_run).await
}

/// Normalize a description, then either print it or submit it.
pub(crate) async fn submit_description(
    config: &AppConfig,
    description: Description,
    dry_run: bool,
) -> Result<()> {
    let description = description.normalize()?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&description)?);
        return Ok(());
    }

    let client = config.client()?;
    debug!("Submitting {} to {}", description.kind(), config.api_url);
    let id = client.submit(&description).await?;
    println!("{} created with id {}", description.kind(), id);
    Ok(())
}
