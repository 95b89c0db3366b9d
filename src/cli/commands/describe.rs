//! `describe`: full detail of one job or workflow

use anyhow::Result;

use crate::api::ResourceKind;
use crate::app::AppConfig;
use crate::render::render;

pub async fn describe_command(config: &AppConfig, kind: ResourceKind, id: u64) -> Result<()> {
    let client = config.client()?;
    let record = client.describe(kind, id).await?;
    println!("{}", serde_json::to_string_pretty(&render(&record, true, kind))?);
    Ok(())
}
