//! Command dispatch and handlers.

pub mod commit;
pub mod job;
pub mod keys;
pub mod log;

use std::env;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::{load_config, Config};
use crate::context::ServiceContext;
use crate::error::LinkError;
use crate::host::ConfiguredHost;
use crate::registry::FactoryRegistry;
use crate::resolve::Resolution;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `KEY<TAB>URL` lines.
    Text,
    /// One JSON document.
    Json,
}

impl OutputFormat {
    /// Picks the format from the `--json` flag.
    #[must_use]
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// A resolution together with what it was asked for.
///
/// Text and JSON output are both rendered from this, so they always name the
/// same job and commit.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Job the question was asked for.
    pub job: &'a str,
    /// Commit whose message was scanned; absent for job-bound issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'a str>,
    /// The answer.
    pub resolution: &'a Resolution,
}

impl<'a> Report<'a> {
    /// Report on the issue bound to `job`.
    #[must_use]
    pub fn for_job(job: &'a str, resolution: &'a Resolution) -> Self {
        Self { job, commit: None, resolution }
    }

    /// Report on the issues referenced by `commit`, built for `job`.
    #[must_use]
    pub fn for_commit(job: &'a str, commit: &'a str, resolution: &'a Resolution) -> Self {
        Self { job, commit: Some(commit), resolution }
    }
}

/// Dispatch a parsed command to its handler.
///
/// `ISSUELINK_REPLAY=<file>` serves every port from a cassette;
/// `ISSUELINK_RECORD=<file>` records every port interaction to one.
///
/// # Errors
///
/// Returns an error if configuration, the ports or output fail.
pub fn dispatch(cli: &Cli) -> Result<(), LinkError> {
    let format = OutputFormat::from_json_flag(cli.json);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Command::Keys { pattern, message } = &cli.command {
        let text = match message {
            Some(message) => message.clone(),
            None => read_stdin()?,
        };
        return keys::run(pattern.as_deref(), &text, format, &mut out);
    }

    let config = load_config(&cli.config)?;
    let ctx = context_from_env(&config)?;
    let result = dispatch_with_context(&cli.command, &config, &ctx, format, &mut out);
    ctx.flush()?;
    result
}

/// Dispatch a command against an existing context.
///
/// # Errors
///
/// Returns an error if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    config: &Config,
    ctx: &ServiceContext,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), LinkError> {
    let host = ConfiguredHost::new(config, ctx.tracker.as_ref())?;
    let registry = FactoryRegistry::with_defaults();
    tracing::debug!(factories = ?registry.names().collect::<Vec<_>>(), "issue factories");

    match command {
        Command::Keys { pattern, message } => {
            keys::run(pattern.as_deref(), message.as_deref().unwrap_or_default(), format, out)
        }
        Command::Job { job } => job::run(&registry, &host, job, format, out),
        Command::Commit { job, rev } => {
            commit::run(&registry, &host, ctx.git.as_ref(), job, rev, format, out)
        }
        Command::Log { job, range } => {
            log::run(&registry, &host, ctx.git.as_ref(), job, range, format, out)
        }
    }
}

fn context_from_env(config: &Config) -> Result<ServiceContext, LinkError> {
    if let Ok(path) = env::var("ISSUELINK_REPLAY") {
        tracing::info!(cassette = %path, "replaying port interactions");
        return ServiceContext::replaying(Path::new(&path));
    }
    if let Ok(path) = env::var("ISSUELINK_RECORD") {
        tracing::info!(cassette = %path, "recording port interactions");
        return ServiceContext::recording(Path::new(&path), config);
    }
    ServiceContext::live(config)
}

fn read_stdin() -> Result<String, LinkError> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

/// Prints one report in text form.
pub(crate) fn write_report(out: &mut dyn Write, report: &Report<'_>) -> Result<(), LinkError> {
    match report.resolution {
        Resolution::NotApplicable => {
            writeln!(out, "not applicable: no issue tracker is bound to {}", report.job)?;
        }
        Resolution::Issues(issues) if issues.is_empty() => writeln!(out, "no issues resolved")?,
        Resolution::Issues(issues) => {
            for issue in issues {
                writeln!(out, "{}\t{}", issue.id(), issue.url())?;
            }
        }
    }
    Ok(())
}

/// Prints `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    value: &T,
) -> Result<(), LinkError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
