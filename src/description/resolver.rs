//! Input resolution
//!
//! Turns a user supplied source (local path or HTTP(S) URL) into a validated
//! [`Description`]. Text is parsed as JSON first and only falls back to YAML
//! when JSON parsing fails.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::{Description, JobDescription, WorkflowDescription};
use crate::error::{Error, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a source string names a remote document.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load, parse and validate a job or workflow description.
pub async fn resolve_source(source: &str) -> Result<Description> {
    let text = fetch_text(source).await?;
    parse_description(&text)
}

/// Read the raw text of a description from disk or over HTTP(S).
pub async fn fetch_text(source: &str) -> Result<String> {
    if is_url(source) {
        debug!("Fetching description from {}", source);
        return fetch_url(source).await;
    }

    debug!("Reading description from {}", source);
    tokio::fs::read_to_string(source)
        .await
        .map_err(|e| Error::Fetch {
            source_name: source.to_string(),
            message: e.to_string(),
        })
}

async fn fetch_url(url: &str) -> Result<String> {
    let fetch_error = |message: String| Error::Fetch {
        source_name: url.to_string(),
        message,
    };

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    if status != StatusCode::OK {
        return Err(fetch_error(format!(
            "status code {}, {}",
            status.as_u16(),
            body.trim()
        )));
    }

    Ok(body)
}

/// Parse text as JSON, falling back to YAML.
pub fn parse_document(text: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            debug!("Not valid JSON ({}), trying YAML", json_err);
            serde_yaml::from_str::<Value>(text).map_err(|e| Error::Parse(e.to_string()))
        }
    }
}

/// Parse and validate a description. A document with a `jobs` key is a
/// workflow, anything else is a single job.
pub fn parse_description(text: &str) -> Result<Description> {
    let value = parse_document(text)?;
    description_from_value(value)
}

pub fn description_from_value(value: Value) -> Result<Description> {
    let is_workflow = match &value {
        Value::Object(map) => map.contains_key("jobs"),
        _ => {
            return Err(Error::InvalidDescription(
                "expected a mapping at the top level".to_string(),
            ))
        }
    };

    if is_workflow {
        let workflow: WorkflowDescription = serde_json::from_value(value)
            .map_err(|e| Error::InvalidDescription(e.to_string()))?;
        workflow.validate()?;
        Ok(Description::Workflow(workflow))
    } else {
        let job: JobDescription = serde_json::from_value(value)
            .map_err(|e| Error::InvalidDescription(e.to_string()))?;
        job.validate()?;
        Ok(Description::Job(job))
    }
}
