use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::model::Axis;

#[derive(Parser)]
#[command(name = "snapcap")]
#[command(about = "Snapshot capacity reporting for storage clusters")]
#[command(version)]
pub struct Cli {
    /// Cluster node IP address or FQDN
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Management API port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Username for the cluster
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for the cluster (falls back to SNAPCAP_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Access token for the cluster
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Per-request timeout (e.g. "30s", "2m")
    #[arg(long, global = true, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Show detailed output including degraded-accuracy diagnostics
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the grouped capacity usage report
    Report(ReportArgs),

    /// List snapshots without grouping
    List,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Grouping axis for the report
    #[arg(long, value_enum, default_value_t = GroupBy::Both)]
    pub by: GroupBy,

    /// Write the report to a CSV file instead of the console
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Policy,
    Path,
    Both,
}

impl GroupBy {
    pub fn axes(self) -> Vec<Axis> {
        match self {
            GroupBy::Policy => vec![Axis::Policy],
            GroupBy::Path => vec![Axis::Path],
            GroupBy::Both => vec![Axis::Policy, Axis::Path],
        }
    }
}
