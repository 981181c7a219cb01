//! Host-side collaborators the resolver works against.
//!
//! The build host owns jobs, their runs and the change entries of each run.
//! It also decides which tracker site a job is bound to and which issue
//! actions are attached. The resolver only sees these traits; [`ConfiguredHost`]
//! is the implementation backed by the YAML configuration and a tracker port.

pub mod configured;
pub mod jira;

use regex::Regex;
use reqwest::Url;

use crate::ports::TrackerIssue;

pub use configured::{BoundIssueAction, ConfiguredHost, TrackerBuildAction};
pub use jira::JiraSite;

/// A job (pipeline) on the build host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Job {
    name: String,
}

impl Job {
    /// Creates a job handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The job name as configured.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One run (build) of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Run {
    job: Job,
    id: String,
}

impl Run {
    /// Creates a run of `job`.
    pub fn new(job: Job, id: impl Into<String>) -> Self {
        Self { job, id: id.into() }
    }

    /// The job this run belongs to.
    #[must_use]
    pub fn job(&self) -> &Job {
        &self.job
    }

    /// Run identifier, e.g. a build number.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A single commit in the change set of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    run: Run,
    commit: Option<String>,
    message: String,
}

impl ChangeEntry {
    /// Creates a change entry for `run`.
    pub fn new(run: Run, commit: Option<String>, message: impl Into<String>) -> Self {
        Self { run, commit, message: message.into() }
    }

    /// The run whose change set contains this commit.
    #[must_use]
    pub fn run(&self) -> &Run {
        &self.run
    }

    /// Commit hash, when known.
    #[must_use]
    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }

    /// Full commit message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure to build a link for a tracker issue.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The issue URL could not be constructed.
    #[error("cannot build URL for {key}: {reason}")]
    Url {
        /// The issue key.
        key: String,
        /// Why joining failed.
        reason: String,
    },
}

/// A configured issue-tracker site.
pub trait TrackerSite: Send + Sync {
    /// Pattern whose first capture group is an issue key.
    fn issue_pattern(&self) -> &Regex;

    /// Canonical URL of `issue` on this site.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the URL cannot be built.
    fn issue_url(&self, issue: &TrackerIssue) -> Result<Url, SiteError>;
}

/// The single issue bound to a job.
pub trait JobIssueAction: Send + Sync {
    /// The bound issue, or `None` when the tracker does not know it.
    fn issue(&self) -> Option<TrackerIssue>;
}

/// Issue lookups available to a run.
pub trait BuildIssueAction: Send + Sync {
    /// Looks up `key`, returning `None` when it cannot be found.
    fn issue(&self, key: &str) -> Option<TrackerIssue>;
}

/// Site and action lookups provided by the build host.
///
/// Shared by reference across resolver threads.
pub trait IssueHost: Send + Sync {
    /// The tracker site bound to `job`.
    fn site_for(&self, job: &Job) -> Option<&dyn TrackerSite>;

    /// The issue action attached to `job`.
    fn job_action(&self, job: &Job) -> Option<Box<dyn JobIssueAction + '_>>;

    /// The issue action attached to `run`.
    fn build_action(&self, run: &Run) -> Option<Box<dyn BuildIssueAction + '_>>;
}
