//! Issue-tracker references in commit messages and job configuration.
//!
//! [`extract::find_issue_keys`] finds candidate keys in text;
//! [`resolve`] turns them into [`issue::Issue`] values through a host's
//! tracker site and actions. The rest of the crate wires that core to
//! configuration, Jira, git and a CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod host;
pub mod issue;
pub mod ports;
pub mod registry;
pub mod resolve;
pub mod telemetry;

use clap::Parser;

use crate::error::LinkError;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print and return `Ok`.
///
/// # Errors
///
/// Returns an error when argument parsing or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), LinkError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(LinkError::Usage(err.to_string())),
    };

    telemetry::init_tracing(cli.log_json, telemetry::level_for_verbosity(cli.verbose));
    commands::dispatch(&cli)
}
