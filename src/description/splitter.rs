//! Multi-line command handling
//!
//! A task command spanning several lines is either a script (first line is
//! a `#!` interpreter marker), which is shipped as an executable input file,
//! or a list of independent commands, which become one task each.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;
use uuid::Uuid;

use super::{InputEntry, InputFile, JobDescription, TaskDescription};

const SCRIPT_MARKER: &str = "#!";

/// Rewrite every multi-line task command in a job.
///
/// Task order is preserved. Jobs whose commands are all single-line come
/// back unchanged, so applying this twice is the same as applying it once.
pub fn split_multiline_commands(mut job: JobDescription) -> JobDescription {
    let tasks = std::mem::take(&mut job.tasks);
    let original = tasks.len();

    let mut rewritten = Vec::with_capacity(original);
    for task in tasks {
        match task.cmd.as_deref() {
            Some(cmd) if cmd.contains('\n') && cmd.starts_with(SCRIPT_MARKER) => {
                let (task, script) = script_task(task);
                job.inputs.push(InputEntry::Inline(script));
                rewritten.push(task);
            }
            Some(cmd) if cmd.contains('\n') => rewritten.extend(split_task(task)),
            _ => rewritten.push(task),
        }
    }

    if rewritten.len() != original {
        debug!(
            "Multi-line commands expanded {} task(s) into {}",
            original,
            rewritten.len()
        );
    }

    job.tasks = rewritten;
    job
}

/// Move a script into a freshly named executable input and invoke it.
fn script_task(mut task: TaskDescription) -> (TaskDescription, InputFile) {
    let script = task.cmd.take().unwrap_or_default();
    let filename = Uuid::new_v4().to_string();

    let input = InputFile {
        filename: filename.clone(),
        content: STANDARD.encode(script.as_bytes()),
        executable: Some(true),
    };
    task.cmd = Some(format!("./{filename}"));

    (task, input)
}

/// One task per non-empty line, each otherwise identical to the original.
fn split_task(task: TaskDescription) -> Vec<TaskDescription> {
    let Some(cmd) = task.cmd.as_deref() else {
        return vec![task];
    };

    let tasks: Vec<TaskDescription> = cmd
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| TaskDescription {
            cmd: Some(line.to_string()),
            ..task.clone()
        })
        .collect();

    // A command made only of newlines keeps its single task.
    if tasks.is_empty() {
        vec![task]
    } else {
        tasks
    }
}
