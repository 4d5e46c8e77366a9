use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

fn about_message() -> String {
    format!(
        "Locates nextflow process scripts and scores the signatures that identify their commands\nVersion: {}",
        env!("CARGO_PKG_VERSION")
    )
}

#[derive(Parser, Clone)]
#[clap(name = "tracer-signature", about = about_message(), version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// TOML configuration file
    #[clap(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Also write logs to this file
    #[clap(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Locate the script block of every process definition under a directory
    Extract {
        #[clap(long, value_name = "DIR")]
        modules: PathBuf,
        /// Output the extraction targets in JSON format
        #[clap(long)]
        json: bool,
    },

    /// Convert generator responses into a rule collection
    Convert {
        /// Directory of generator responses, one per file
        #[clap(long, value_name = "DIR")]
        input: PathBuf,
        #[clap(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Attribute a single command line to a rule
    Match {
        #[clap(long, value_name = "FILE")]
        rules: PathBuf,
        command: String,
    },

    /// Evaluate every rule against its synthetic fixtures
    Check {
        #[clap(long, value_name = "FILE")]
        rules: PathBuf,
        /// Output the evaluations in JSON format
        #[clap(long)]
        json: bool,
    },

    /// Score the rules against the processes of a real run
    Quality(Box<QualityArgs>),
}

#[derive(Args, Debug, Clone)]
pub struct QualityArgs {
    #[clap(long, value_name = "FILE")]
    pub rules: PathBuf,
    /// Nextflow log of the run
    #[clap(long, value_name = "FILE")]
    pub completion_log: PathBuf,
    /// Commands captured during the run, one per line
    #[clap(long, value_name = "FILE")]
    pub commands: PathBuf,
    /// Workflow sources or directories whose includes alias process names
    #[clap(long, value_name = "PATH", num_args = 1.., required = true)]
    pub workflows: Vec<PathBuf>,
    #[clap(long, value_name = "DIR")]
    pub modules: PathBuf,
    /// Output the report in JSON format
    #[clap(long)]
    pub json: bool,
}
