//! `issuelink keys` command.

use std::io::Write;

use regex::Regex;

use super::{write_json, OutputFormat};
use crate::error::LinkError;
use crate::extract::{default_pattern, find_issue_keys};

/// Prints the keys `pattern` finds in `text`, one per line.
///
/// Without `pattern` the Jira default is used.
///
/// # Errors
///
/// Returns an error if `pattern` does not compile or output fails.
pub fn run(
    pattern: Option<&str>,
    text: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), LinkError> {
    let custom = pattern
        .map(Regex::new)
        .transpose()
        .map_err(|e| LinkError::Usage(format!("invalid --pattern: {e}")))?;
    let regex = custom.as_ref().unwrap_or_else(|| default_pattern());

    let keys = find_issue_keys(text, regex);
    tracing::info!(count = keys.len(), "extracted issue keys");
    match format {
        OutputFormat::Json => write_json(out, &keys)?,
        OutputFormat::Text => {
            for key in &keys {
                writeln!(out, "{key}")?;
            }
        }
    }
    Ok(())
}
