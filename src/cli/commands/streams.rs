//! `stdout` and `stderr`

use anyhow::Result;

use crate::api::Stream;
use crate::app::AppConfig;

pub async fn stream_command(
    config: &AppConfig,
    id: u64,
    job: Option<&str>,
    stream: Stream,
) -> Result<()> {
    let text = config.client()?.std_stream(id, job, stream).await?;
    print!("{}", text);
    Ok(())
}
