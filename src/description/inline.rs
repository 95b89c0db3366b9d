//! Inlining of local input files
//!
//! `file://<path>` entries in a job's `inputs` are replaced by the file's
//! base64 encoded content so the whole job travels in one request.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use super::{InputEntry, InputFile, JobDescription, WorkflowDescription};
use crate::error::{Error, Result};

/// Input files must be strictly smaller than this many bytes.
pub const MAX_INPUT_FILE_SIZE: u64 = 1_000_000;

const FILE_SCHEME: &str = "file://";

/// Replace `file://` references with inline input files.
///
/// Inline entries pass through untouched and any other plain string is
/// dropped. The first unreadable or oversized file fails the whole job.
pub fn inline_job_inputs(mut job: JobDescription) -> Result<JobDescription> {
    let entries = std::mem::take(&mut job.inputs);

    let mut inputs = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            InputEntry::Inline(file) => inputs.push(InputEntry::Inline(file)),
            InputEntry::Reference(reference) => match reference.strip_prefix(FILE_SCHEME) {
                Some(path) => inputs.push(InputEntry::Inline(read_input_file(Path::new(path))?)),
                None => debug!("Dropping input entry {:?}", reference),
            },
        }
    }

    job.inputs = inputs;
    Ok(job)
}

/// Inline inputs of every job in a workflow, failing on the first bad job.
pub fn inline_workflow_inputs(mut workflow: WorkflowDescription) -> Result<WorkflowDescription> {
    workflow.jobs = workflow
        .jobs
        .into_iter()
        .map(inline_job_inputs)
        .collect::<Result<Vec<_>>>()?;
    Ok(workflow)
}

/// Read a local file into an [`InputFile`], enforcing the size limit before
/// any content is read.
pub fn read_input_file(path: &Path) -> Result<InputFile> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.len() >= MAX_INPUT_FILE_SIZE {
        return Err(Error::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: MAX_INPUT_FILE_SIZE,
        });
    }

    let bytes = fs::read(path)?;
    let filename = base_name(path);
    debug!("Inlined {} ({} bytes)", filename, bytes.len());

    Ok(InputFile {
        filename,
        content: STANDARD.encode(bytes),
        executable: None,
    })
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
