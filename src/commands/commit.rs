//! `issuelink commit` command.

use std::io::Write;

use super::{write_json, write_report, OutputFormat, Report};
use crate::error::LinkError;
use crate::host::{ChangeEntry, IssueHost, Job, Run};
use crate::ports::GitRepo;
use crate::registry::FactoryRegistry;

/// Run id used for commits read from the local checkout.
pub(crate) const LOCAL_RUN: &str = "local";

/// Prints the issues referenced by the message of `rev`.
///
/// # Errors
///
/// Returns an error if the commit cannot be read or output fails.
pub fn run(
    registry: &FactoryRegistry,
    host: &dyn IssueHost,
    git: &dyn GitRepo,
    job: &str,
    rev: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), LinkError> {
    let message = git.commit_message(rev).map_err(|e| LinkError::Git(e.to_string()))?;
    let run = Run::new(Job::new(job), LOCAL_RUN);
    let entry = ChangeEntry::new(run, Some(rev.to_string()), message);
    let resolution = registry.issues_for_change(host, &entry);
    tracing::info!(job, rev, issues = resolution.issues().len(), "resolved commit");

    let report = Report::for_commit(job, rev, &resolution);
    match format {
        OutputFormat::Json => write_json(out, &report),
        OutputFormat::Text => write_report(out, &report),
    }
}
