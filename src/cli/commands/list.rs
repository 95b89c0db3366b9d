//! `list`: tables of jobs or workflows

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use crate::api::{ListQuery, ResourceKind};
use crate::app::AppConfig;
use crate::cli::args::{ListArgs, ListTarget};
use crate::render::{job_table, render, sort_by_id, workflow_table};

pub async fn list_command(config: &AppConfig, args: ListArgs) -> Result<()> {
    let client = config.client()?;
    let query = list_query(&args);

    let (mut records, kind) = match (args.target, args.id) {
        (ListTarget::Workflows, Some(id)) => {
            (client.list_workflow_jobs(id, &query).await?, ResourceKind::Job)
        }
        (ListTarget::Workflows, None) => {
            (client.list_workflows(&query).await?, ResourceKind::Workflow)
        }
        (ListTarget::Jobs, id) => {
            if let Some(id) = id {
                warn!("Ignoring id {}, only workflows can be listed by id", id);
            }
            (client.list_jobs(&query).await?, ResourceKind::Job)
        }
    };

    sort_by_id(&mut records);
    let rendered: Vec<Value> = records
        .iter()
        .map(|record| render(record, false, kind))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    let now = Utc::now().timestamp();
    let table = match kind {
        ResourceKind::Job => job_table(&rendered, now),
        ResourceKind::Workflow => workflow_table(&rendered, now),
    };
    print!("{}", table);
    Ok(())
}

/// Completed listings show the most recent one unless `-n` says otherwise.
fn list_query(args: &ListArgs) -> ListQuery {
    ListQuery {
        completed: args.completed,
        all: args.all,
        num: args.num.or(args.completed.then_some(1)),
        constraints: args.constraints.clone(),
    }
}
