//! Client for the Prominence REST API

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::description::{Description, JobDescription, WorkflowDescription};
use crate::error::{Error, Result};

pub mod auth;

pub use auth::load_token;

/// The two kinds of resource the platform manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResourceKind {
    Job,
    Workflow,
}

impl ResourceKind {
    fn collection(self) -> &'static str {
        match self {
            ResourceKind::Job => "jobs",
            ResourceKind::Workflow => "workflows",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Job => write!(f, "job"),
            ResourceKind::Workflow => write!(f, "workflow"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

/// Filters accepted by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub completed: bool,
    pub all: bool,
    pub num: Option<u32>,
    /// `key=value` label constraints
    pub constraints: Vec<String>,
}

impl ListQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.completed {
            params.push(("completed", "true".to_string()));
        }
        if self.all {
            params.push(("all", "true".to_string()));
        }
        if let Some(num) = self.num {
            params.push(("num", num.to_string()));
        }
        if !self.constraints.is_empty() {
            params.push(("constraint", self.constraints.join(",")));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
struct Created {
    id: u64,
}

/// Authenticated client bound to one API base URL.
pub struct ProminenceClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ProminenceClient {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Base URL extended by percent-encoded path segments.
    fn segments_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::Connection {
                url: self.base_url.clone(),
                message: e.to_string(),
            })?;

        debug!("{} {}", response.status().as_u16(), response.url());

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Authentication(
                format!("status code {}", response.status().as_u16()),
            )),
            _ => Ok(response),
        }
    }

    /// Submit a normalized description and return the assigned id.
    pub async fn submit(&self, description: &Description) -> Result<u64> {
        match description {
            Description::Job(job) => self.create_job(job).await,
            Description::Workflow(workflow) => self.create_workflow(workflow).await,
        }
    }

    pub async fn create_job(&self, job: &JobDescription) -> Result<u64> {
        self.create(ResourceKind::Job, job).await
    }

    pub async fn create_workflow(&self, workflow: &WorkflowDescription) -> Result<u64> {
        self.create(ResourceKind::Workflow, workflow).await
    }

    async fn create<T: Serialize>(&self, kind: ResourceKind, body: &T) -> Result<u64> {
        let request = self.client.post(self.url(kind.collection())).json(body);
        let response = self.send(request).await?;

        if response.status() != StatusCode::CREATED {
            return Err(Error::JobCreation(error_message(response).await));
        }

        let created: Created = response
            .json()
            .await
            .map_err(|e| Error::JobCreation(format!("unexpected response: {}", e)))?;
        debug!("Created {} {}", kind, created.id);
        Ok(created.id)
    }

    pub async fn list_jobs(&self, query: &ListQuery) -> Result<Vec<Value>> {
        self.fetch_list("jobs", query).await
    }

    pub async fn list_workflows(&self, query: &ListQuery) -> Result<Vec<Value>> {
        self.fetch_list("workflows", query).await
    }

    /// Jobs belonging to one workflow.
    pub async fn list_workflow_jobs(&self, id: u64, query: &ListQuery) -> Result<Vec<Value>> {
        self.fetch_list(&format!("workflows/{}/jobs", id), query)
            .await
    }

    async fn fetch_list(&self, path: &str, query: &ListQuery) -> Result<Vec<Value>> {
        let request = self.client.get(self.url(path)).query(&query.params());
        let response = self.send(request).await?;

        if response.status() != StatusCode::OK {
            return Err(Error::JobGet(error_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| Error::JobGet(format!("unexpected response: {}", e)))
    }

    pub async fn describe_job(&self, id: u64) -> Result<Value> {
        self.describe(ResourceKind::Job, id).await
    }

    pub async fn describe_workflow(&self, id: u64) -> Result<Value> {
        self.describe(ResourceKind::Workflow, id).await
    }

    /// Full record of one resource.
    ///
    /// The platform answers either with the record itself or with a list
    /// holding it.
    pub async fn describe(&self, kind: ResourceKind, id: u64) -> Result<Value> {
        let path = format!("{}/{}", kind.collection(), id);
        let request = self.client.get(self.url(&path)).query(&[("detail", "1")]);
        let response = self.send(request).await?;

        if response.status() != StatusCode::OK {
            return Err(Error::JobGet(error_message(response).await));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::JobGet(format!("unexpected response: {}", e)))?;

        match body {
            Value::Array(records) if records.is_empty() => {
                Err(Error::JobGet(format!("{} {} not found", kind, id)))
            }
            Value::Array(mut records) => Ok(records.swap_remove(0)),
            record => Ok(record),
        }
    }

    pub async fn delete_job(&self, id: u64) -> Result<()> {
        self.delete(ResourceKind::Job, id).await
    }

    pub async fn delete_workflow(&self, id: u64) -> Result<()> {
        self.delete(ResourceKind::Workflow, id).await
    }

    pub async fn delete(&self, kind: ResourceKind, id: u64) -> Result<()> {
        let path = format!("{}/{}", kind.collection(), id);
        let response = self.send(self.client.delete(self.url(&path))).await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                debug!("Deleted {} {}", kind, id);
                Ok(())
            }
            _ => Err(Error::Deletion(error_message(response).await)),
        }
    }

    /// Standard output or error of a job, or of one job inside a workflow.
    pub async fn std_stream(
        &self,
        id: u64,
        job_name: Option<&str>,
        stream: Stream,
    ) -> Result<String> {
        let id = id.to_string();
        let url = match job_name {
            Some(job) => self.segments_url(&["workflows", id.as_str(), stream.as_str(), job])?,
            None => self.segments_url(&["jobs", id.as_str(), stream.as_str()])?,
        };
        let response = self.send(self.client.get(url)).await?;

        if response.status() != StatusCode::OK {
            return Err(Error::StdStreams(error_message(response).await));
        }

        response
            .text()
            .await
            .map_err(|e| Error::StdStreams(e.to_string()))
    }
}

/// The `error` field of a JSON error body, else the HTTP status.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("status code {}", status.as_u16()))
}
