//! `delete`: remove a job or workflow

use anyhow::Result;

use crate::api::ResourceKind;
use crate::app::AppConfig;

pub async fn delete_command(config: &AppConfig, kind: ResourceKind, id: u64) -> Result<()> {
    config.client()?.delete(kind, id).await?;
    println!("Success");
    Ok(())
}
