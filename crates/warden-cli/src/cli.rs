//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Warden: role-based account management and task jobs
#[derive(Parser, Debug)]
#[command(name = "warden", version)]
#[command(about = "Warden account and job administration", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server and the lifecycle trigger runner
    Serve,
    /// Ask the running server to run one job now and print its report
    RunJob {
        /// Job name (reminders, overdue-sweep, daily-metrics, weekly-metrics)
        name: String,
        /// Server base URL; defaults to the configured bind address
        #[arg(long)]
        server: Option<String>,
        /// Bearer token of a caller allowed to run the job
        #[arg(long, env = "WARDEN_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// List jobs with their schedules and next firing time
    Jobs,
    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print a value by dotted key, e.g. `jobs.time_zone`
    Get {
        /// Dotted key
        key: String,
    },
    /// Write a default config file
    Init {
        /// Where to write; defaults to the platform config dir
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}
