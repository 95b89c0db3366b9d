//! CLI argument structures
//!
//! This module defines the command-line interface: the top level `Cli`,
//! the `Commands` enum and the flag sets of the larger subcommands.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::ResourceKind;
use crate::description::{ContainerRuntime, MpiFlavor};

/// Submit and manage containerised jobs on the Prominence platform
#[derive(Parser)]
#[command(name = "prominence")]
#[command(about = "prominence - Run containerised jobs and workflows on the Prominence platform", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a job or workflow described in a JSON or YAML file or URL
    Run {
        /// Local path or http(s) URL of the description
        source: String,

        /// Print the normalized description instead of submitting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a job from command line flags
    Create(CreateArgs),

    /// List jobs or workflows
    List(ListArgs),

    /// Show the full record of a job or workflow
    Describe {
        #[arg(value_enum)]
        kind: ResourceKind,
        id: u64,
    },

    /// Delete a job or workflow
    Delete {
        #[arg(value_enum)]
        kind: ResourceKind,
        id: u64,
    },

    /// Print the standard output of a job
    Stdout {
        id: u64,
        /// Job name within a workflow
        job: Option<String>,
    },

    /// Print the standard error of a job
    Stderr {
        id: u64,
        /// Job name within a workflow
        job: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Container image (registry reference or URL of a tarball)
    pub image: String,

    /// Command to run inside the container
    pub command: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Memory in GB
    #[arg(long, default_value_t = 1)]
    pub memory: u64,

    #[arg(long, default_value_t = 1)]
    pub cpus: u64,

    #[arg(long, default_value_t = 1)]
    pub nodes: u64,

    /// Disk in GB
    #[arg(long, default_value_t = 10)]
    pub disk: u64,

    /// Walltime in minutes
    #[arg(long)]
    pub walltime: Option<u64>,

    #[arg(long, conflicts_with_all = ["mpich", "intelmpi"])]
    pub openmpi: bool,

    #[arg(long, conflicts_with = "intelmpi")]
    pub mpich: bool,

    #[arg(long)]
    pub intelmpi: bool,

    #[arg(long)]
    pub procs_per_node: Option<u64>,

    #[arg(long)]
    pub omp_threads_per_node: Option<u64>,

    /// URL[:directory:mountpoint], may be repeated
    #[arg(long = "artifact", value_name = "ARTIFACT")]
    pub artifacts: Vec<String>,

    /// Local file to upload with the job, may be repeated
    #[arg(long = "input", value_name = "PATH")]
    pub inputs: Vec<String>,

    /// KEY=VALUE environment variable, may be repeated
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// KEY=VALUE label, may be repeated
    #[arg(long = "label", value_name = "KEY=VALUE")]
    pub labels: Vec<String>,

    #[arg(long, value_enum)]
    pub runtime: Option<ContainerRuntime>,

    #[arg(long)]
    pub workdir: Option<String>,

    /// Maximum number of retries
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Restrict execution to a site, may be repeated
    #[arg(long = "site", value_name = "SITE")]
    pub sites: Vec<String>,

    /// JSON or YAML file describing attached storage
    #[arg(long)]
    pub storage_file: Option<String>,

    /// Print the job description instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
}

impl CreateArgs {
    pub fn mpi(&self) -> Option<MpiFlavor> {
        if self.openmpi {
            Some(MpiFlavor::Openmpi)
        } else if self.mpich {
            Some(MpiFlavor::Mpich)
        } else if self.intelmpi {
            Some(MpiFlavor::Intelmpi)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Jobs,
    Workflows,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(value_enum, default_value = "jobs")]
    pub target: ListTarget,

    /// Workflow id whose jobs should be listed
    pub id: Option<u64>,

    /// Show completed rather than active resources
    #[arg(long)]
    pub completed: bool,

    /// Show both active and completed resources
    #[arg(long)]
    pub all: bool,

    /// Number of completed resources to show
    #[arg(short = 'n', long = "num")]
    pub num: Option<u32>,

    /// KEY=VALUE label constraint, may be repeated
    #[arg(long = "constraint", value_name = "KEY=VALUE")]
    pub constraints: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
