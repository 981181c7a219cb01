//! `issuelink log` command.

use std::io::Write;

use super::commit::LOCAL_RUN;
use super::{write_json, write_report, OutputFormat, Report};
use crate::error::LinkError;
use crate::host::{ChangeEntry, IssueHost, Job, Run};
use crate::ports::GitRepo;
use crate::registry::FactoryRegistry;
use crate::resolve::Resolution;

/// Prints the issues of every commit in `range`, newest first.
///
/// # Errors
///
/// Returns an error if the history cannot be read or output fails.
pub fn run(
    registry: &FactoryRegistry,
    host: &dyn IssueHost,
    git: &dyn GitRepo,
    job: &str,
    range: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), LinkError> {
    let commits = git.log(range).map_err(|e| LinkError::Git(e.to_string()))?;
    let run = Run::new(Job::new(job), LOCAL_RUN);

    let resolved: Vec<(String, Resolution)> = commits
        .into_iter()
        .map(|commit| {
            let entry = ChangeEntry::new(run.clone(), Some(commit.id.clone()), commit.message);
            (commit.id, registry.issues_for_change(host, &entry))
        })
        .collect();
    tracing::info!(range, commits = resolved.len(), "resolved commit range");

    let reports: Vec<Report<'_>> = resolved
        .iter()
        .map(|(id, resolution)| Report::for_commit(job, id, resolution))
        .collect();
    match format {
        OutputFormat::Json => write_json(out, &reports),
        OutputFormat::Text => {
            for report in &reports {
                writeln!(out, "commit {}", report.commit.unwrap_or_default())?;
                write_report(out, report)?;
            }
            Ok(())
        }
    }
}
