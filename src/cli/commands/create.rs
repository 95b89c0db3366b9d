//! `create`: submit a job assembled from command line flags

use anyhow::Result;

use super::run::submit_description;
use crate::app::AppConfig;
use crate::cli::args::CreateArgs;
use crate::description::resolver::{fetch_text, parse_document};
use crate::description::{build_job, Description, JobOptions};

pub async fn create_command(config: &AppConfig, args: CreateArgs) -> Result<()> {
    let dry_run = args.dry_run;
    let options = job_options(args).await?;
    let job = build_job(&options)?;
    submit_description(config, Description::Job(job), dry_run).await
}

async fn job_options(args: CreateArgs) -> Result<JobOptions> {
    let storage = match &args.storage_file {
        Some(path) => Some(parse_document(&fetch_text(path).await?)?),
        None => None,
    };
    let mpi = args.mpi();

    Ok(JobOptions {
        command: args.command,
        name: args.name,
        memory: args.memory,
        cpus: args.cpus,
        nodes: args.nodes,
        disk: args.disk,
        walltime: args.walltime,
        mpi,
        procs_per_node: args.procs_per_node,
        omp_threads_per_node: args.omp_threads_per_node,
        runtime: args.runtime,
        workdir: args.workdir,
        artifacts: args.artifacts,
        inputs: args.inputs,
        env: args.env,
        labels: args.labels,
        retries: args.retries,
        sites: args.sites,
        storage,
        ..JobOptions::new(args.image)
    })
}
