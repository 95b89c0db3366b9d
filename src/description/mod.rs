//! Job and workflow descriptions
//!
//! Typed form of the documents submitted to the platform. Descriptions are
//! validated once at the resolver boundary; everything downstream (splitter,
//! inliner, submission) works on these types instead of loose JSON.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub mod builder;
pub mod inline;
pub mod resolver;
pub mod splitter;

pub use builder::{build_job, JobOptions};
pub use inline::{inline_job_inputs, inline_workflow_inputs, MAX_INPUT_FILE_SIZE};
pub use resolver::{parse_description, resolve_source};
pub use splitter::split_multiline_commands;

/// Resources requested by a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    /// Memory in GB
    pub memory: u64,
    pub cpus: u64,
    pub nodes: u64,
    /// Disk in GB
    pub disk: u64,
    /// Walltime in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walltime: Option<u64>,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            memory: 1,
            cpus: 1,
            nodes: 1,
            disk: 10,
            walltime: None,
        }
    }
}

/// MPI flavour used to launch a multi-process task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MpiFlavor {
    Openmpi,
    Mpich,
    Intelmpi,
}

/// Container runtime used on the execution site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    Singularity,
    Udocker,
}

/// A single container invocation within a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescription {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mpi: Option<MpiFlavor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<ContainerRuntime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procs_per_node: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
    /// Fields this client does not interpret are sent back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskDescription {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            cmd: None,
            mpi: None,
            runtime: None,
            procs_per_node: None,
            workdir: None,
            env: BTreeMap::new(),
            extra: Map::new(),
        }
    }
}

/// A small file uploaded inline with the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub filename: String,
    /// Base64 of the raw file bytes
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<bool>,
}

/// An entry of a job's `inputs` list.
///
/// Before inlining, users may reference local files as `file://<path>`
/// strings; after inlining only [`InputEntry::Inline`] remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputEntry {
    Inline(InputFile),
    Reference(String),
}

/// A remote file or archive made available to the job at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mountpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub resources: Resources,
    pub tasks: Vec<TaskDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    #[serde(
        default,
        deserialize_with = "string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub policies: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobDescription {
    pub fn new(tasks: Vec<TaskDescription>) -> Self {
        Self {
            name: String::new(),
            resources: Resources::default(),
            tasks,
            inputs: Vec::new(),
            artifacts: Vec::new(),
            labels: BTreeMap::new(),
            policies: Map::new(),
            storage: None,
            placement: None,
            extra: Map::new(),
        }
    }

    /// Check the structural invariants a job must satisfy before submission.
    pub fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(Error::InvalidDescription(
                "a job must contain at least one task".to_string(),
            ));
        }

        if let Some(index) = self.tasks.iter().position(|t| t.image.trim().is_empty()) {
            return Err(Error::InvalidDescription(format!(
                "task {} has no container image",
                index + 1
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDescription {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub jobs: Vec<JobDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowDescription {
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(Error::InvalidDescription(
                "a workflow must contain at least one job".to_string(),
            ));
        }

        for (index, job) in self.jobs.iter().enumerate() {
            job.validate().map_err(|e| match e {
                Error::InvalidDescription(msg) => {
                    Error::InvalidDescription(format!("job {}: {}", index + 1, msg))
                }
                other => other,
            })?;
        }

        Ok(())
    }
}

/// A resolved description: either a single job or a workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Description {
    Job(JobDescription),
    Workflow(WorkflowDescription),
}

impl Description {
    /// Run the splitter and the inliner over every job in the description.
    ///
    /// Inlining is all-or-nothing: the first failing job aborts the whole
    /// description, so nothing partial is ever submitted.
    pub fn normalize(self) -> Result<Self> {
        match self {
            Description::Job(job) => {
                let job = split_multiline_commands(job);
                Ok(Description::Job(inline_job_inputs(job)?))
            }
            Description::Workflow(mut workflow) => {
                workflow.jobs = workflow
                    .jobs
                    .into_iter()
                    .map(split_multiline_commands)
                    .collect();
                Ok(Description::Workflow(inline_workflow_inputs(workflow)?))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Description::Job(_) => "Job",
            Description::Workflow(_) => "Workflow",
        }
    }
}

/// A string map that also takes numbers and booleans, as YAML files write
/// `OMP_NUM_THREADS: 4` unquoted.
fn string_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => Ok((key, text)),
            Value::Number(number) => Ok((key, number.to_string())),
            Value::Bool(flag) => Ok((key, flag.to_string())),
            other => Err(D::Error::custom(format!(
                "value of {key} must be a string, number or boolean, found {other}"
            ))),
        })
        .collect()
}
