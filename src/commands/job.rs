//! `issuelink job` command.

use std::io::Write;

use super::{write_json, write_report, OutputFormat, Report};
use crate::error::LinkError;
use crate::host::{IssueHost, Job};
use crate::registry::FactoryRegistry;

/// Prints the issue bound to job `name`.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn run(
    registry: &FactoryRegistry,
    host: &dyn IssueHost,
    name: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), LinkError> {
    let resolution = registry.issues_for_job(host, &Job::new(name));
    let report = Report::for_job(name, &resolution);
    match format {
        OutputFormat::Json => write_json(out, &report),
        OutputFormat::Text => write_report(out, &report),
    }
}
