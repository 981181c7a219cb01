//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// Top-level CLI parser for `issuelink`.
#[derive(Debug, Parser)]
#[command(name = "issuelink", version, about = "Find and resolve issue-tracker references")]
pub struct Cli {
    /// Configuration file.
    #[arg(long, global = true, env = "ISSUELINK_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the issue keys found in a message.
    Keys {
        /// Regular expression whose first capture group is the key.
        #[arg(long)]
        pattern: Option<String>,
        /// Text to scan; read from stdin when omitted.
        message: Option<String>,
    },
    /// Print the issue bound to a job.
    Job {
        /// Job name from the configuration.
        job: String,
    },
    /// Print the issues referenced by one commit.
    Commit {
        /// Job whose tracker resolves the keys.
        #[arg(long)]
        job: String,
        /// Revision to read.
        #[arg(default_value = "HEAD")]
        rev: String,
    },
    /// Print the issues referenced by every commit in a range.
    Log {
        /// Job whose tracker resolves the keys.
        #[arg(long)]
        job: String,
        /// Any range `git log` accepts, e.g. `v1.2..HEAD`.
        range: String,
    },
}
