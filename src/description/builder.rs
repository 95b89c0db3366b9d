//! Job descriptions assembled from discrete command-line flags

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::resolver::is_url;
use super::{
    Artifact, ContainerRuntime, InputEntry, JobDescription, MpiFlavor, Resources,
    TaskDescription,
};
use crate::error::{Error, Result};

const TAR_SUFFIXES: [&str; 3] = [".tar", ".tar.gz", ".tgz"];

/// Everything `create` needs to build a single-task job.
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub image: String,
    pub command: Option<String>,
    pub name: Option<String>,
    pub memory: u64,
    pub cpus: u64,
    pub nodes: u64,
    pub disk: u64,
    pub walltime: Option<u64>,
    pub mpi: Option<MpiFlavor>,
    pub procs_per_node: Option<u64>,
    pub omp_threads_per_node: Option<u64>,
    pub runtime: Option<ContainerRuntime>,
    pub workdir: Option<String>,
    pub artifacts: Vec<String>,
    pub inputs: Vec<String>,
    pub env: Vec<String>,
    pub labels: Vec<String>,
    pub retries: u32,
    pub sites: Vec<String>,
    pub storage: Option<Value>,
}

impl JobOptions {
    pub fn new(image: impl Into<String>) -> Self {
        let defaults = Resources::default();
        Self {
            image: image.into(),
            command: None,
            name: None,
            memory: defaults.memory,
            cpus: defaults.cpus,
            nodes: defaults.nodes,
            disk: defaults.disk,
            walltime: None,
            mpi: None,
            procs_per_node: None,
            omp_threads_per_node: None,
            runtime: None,
            workdir: None,
            artifacts: Vec::new(),
            inputs: Vec::new(),
            env: Vec::new(),
            labels: Vec::new(),
            retries: 0,
            sites: Vec::new(),
            storage: None,
        }
    }
}

/// Build a job description from flag values.
///
/// Local `--input` paths become `file://` references; they are inlined
/// later by the same pass that handles description files.
pub fn build_job(options: &JobOptions) -> Result<JobDescription> {
    if options.nodes > 1 && options.mpi.is_none() {
        return Err(Error::Usage(
            "more than one node requested but MPI not specified".to_string(),
        ));
    }

    let mut task = TaskDescription::new(options.image.clone());
    task.cmd = options.command.clone().filter(|cmd| !cmd.is_empty());
    task.mpi = options.mpi;
    task.procs_per_node = procs_per_node(options)?;
    task.runtime = Some(select_runtime(&options.image, options.runtime));
    task.workdir = options.workdir.clone();
    task.env = parse_key_values(&options.env);

    let mut job = JobDescription::new(vec![task]);
    job.name = options.name.clone().unwrap_or_default();
    job.resources = Resources {
        memory: options.memory,
        cpus: options.cpus,
        nodes: options.nodes,
        disk: options.disk,
        walltime: options.walltime,
    };
    job.labels = parse_key_values(&options.labels);
    job.artifacts = options
        .artifacts
        .iter()
        .map(|a| parse_artifact(a))
        .collect::<Result<Vec<_>>>()?;
    job.inputs = options
        .inputs
        .iter()
        .map(|path| InputEntry::Reference(file_reference(path)))
        .collect();

    if options.retries > 0 {
        job.policies
            .insert("maximumRetries".to_string(), json!(options.retries));
    }

    if !options.sites.is_empty() {
        job.placement = Some(json!({ "requirements": { "sites": options.sites } }));
    }

    job.storage = options.storage.clone();

    Ok(job)
}

/// Processes per node, either given directly or derived as the CPUs left
/// over once the OpenMP threads are accounted for.
fn procs_per_node(options: &JobOptions) -> Result<Option<u64>> {
    match (options.procs_per_node, options.omp_threads_per_node) {
        (Some(_), Some(_)) => Err(Error::Usage(
            "--procs-per-node and --omp-threads-per-node cannot be used together".to_string(),
        )),
        (Some(procs), None) => Ok(Some(procs)),
        (None, Some(threads)) => {
            if threads >= options.cpus {
                return Err(Error::Usage(format!(
                    "--omp-threads-per-node ({}) must be smaller than --cpus ({})",
                    threads, options.cpus
                )));
            }
            Ok(Some(options.cpus - threads))
        }
        (None, None) => Ok(None),
    }
}

/// Tarballs served over HTTP(S) can only be run by udocker; anything else
/// uses the requested runtime or singularity.
pub fn select_runtime(image: &str, requested: Option<ContainerRuntime>) -> ContainerRuntime {
    if is_tar_url(image) {
        return ContainerRuntime::Udocker;
    }
    requested.unwrap_or(ContainerRuntime::Singularity)
}

fn is_tar_url(image: &str) -> bool {
    if !is_url(image) {
        return false;
    }
    let path = Url::parse(image)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| image.to_string());
    TAR_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

/// Parse `URL` or `URL:directory:mountpoint`.
///
/// Only colons after an `http:`/`https:` scheme are counted: exactly two
/// means the three-part form. A URL carrying a port therefore needs care.
pub fn parse_artifact(value: &str) -> Result<Artifact> {
    let (scheme, rest) = ["https:", "http:"]
        .iter()
        .find_map(|scheme| value.strip_prefix(scheme).map(|rest| (*scheme, rest)))
        .unwrap_or(("", value));

    if rest.matches(':').count() != 2 {
        return Ok(Artifact {
            url: value.to_string(),
            mountpoint: None,
        });
    }

    let mut parts = rest.rsplitn(3, ':');
    let mountpoint = parts.next().unwrap_or_default();
    let directory = parts.next().unwrap_or_default();
    let location = parts.next().unwrap_or_default();

    if directory.is_empty() || location.is_empty() {
        return Err(Error::Usage(format!(
            "invalid artifact {value}, expected URL or URL:directory:mountpoint"
        )));
    }

    if !mountpoint.starts_with('/') {
        return Err(Error::Usage(format!(
            "artifact mountpoint {mountpoint} must be an absolute path"
        )));
    }

    Ok(Artifact {
        url: format!("{scheme}{location}"),
        mountpoint: Some(format!("{directory}:{mountpoint}")),
    })
}

/// Collect `key=value` pairs, skipping entries without `=`.
pub fn parse_key_values(values: &[String]) -> BTreeMap<String, String> {
    values
        .iter()
        .filter_map(|entry| match entry.split_once('=') {
            Some((key, value)) => Some((key.to_string(), value.to_string())),
            None => {
                debug!("Ignoring {:?}, expected key=value", entry);
                None
            }
        })
        .collect()
}

fn file_reference(path: &str) -> String {
    if path.starts_with("file://") {
        path.to_string()
    } else {
        format!("file://{path}")
    }
}
