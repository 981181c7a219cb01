//! Host implementation backed by the configuration file and a tracker port.

use std::collections::BTreeMap;

use super::{BuildIssueAction, IssueHost, JiraSite, Job, JobIssueAction, Run, TrackerSite};
use crate::config::{Config, JobConfig};
use crate::error::LinkError;
use crate::ports::{IssueTracker, TrackerIssue};

/// Resolves sites and actions from [`Config`], fetching issues through an
/// [`IssueTracker`].
pub struct ConfiguredHost<'a> {
    sites: BTreeMap<String, JiraSite>,
    jobs: BTreeMap<String, JobConfig>,
    tracker: &'a dyn IssueTracker,
}

impl<'a> ConfiguredHost<'a> {
    /// Builds the host from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a site URL or pattern is invalid.
    pub fn new(config: &Config, tracker: &'a dyn IssueTracker) -> Result<Self, LinkError> {
        let sites = config.build_sites()?;
        let jobs = config.jobs.iter().map(|job| (job.name.clone(), job.clone())).collect();
        Ok(Self { sites, jobs, tracker })
    }

    fn site_name(&self, job: &Job) -> Option<&str> {
        self.jobs.get(job.name())?.site.as_deref()
    }
}

impl IssueHost for ConfiguredHost<'_> {
    fn site_for(&self, job: &Job) -> Option<&dyn TrackerSite> {
        let name = self.site_name(job)?;
        self.sites.get(name).map(|site| site as &dyn TrackerSite)
    }

    fn job_action(&self, job: &Job) -> Option<Box<dyn JobIssueAction + '_>> {
        let config = self.jobs.get(job.name())?;
        let site = config.site.as_deref()?;
        let key = config.issue.as_deref()?;
        Some(Box::new(BoundIssueAction { site, key, tracker: self.tracker }))
    }

    fn build_action(&self, run: &Run) -> Option<Box<dyn BuildIssueAction + '_>> {
        let config = self.jobs.get(run.job().name())?;
        if !config.scan_changes {
            return None;
        }
        let site = config.site.as_deref()?;
        Some(Box::new(TrackerBuildAction::new(site, self.tracker)))
    }
}

/// A job's bound issue, fetched from the tracker on demand.
pub struct BoundIssueAction<'a> {
    site: &'a str,
    key: &'a str,
    tracker: &'a dyn IssueTracker,
}

impl<'a> BoundIssueAction<'a> {
    /// Binds `key` on `site` to a job.
    pub fn new(site: &'a str, key: &'a str, tracker: &'a dyn IssueTracker) -> Self {
        Self { site, key, tracker }
    }
}

impl JobIssueAction for BoundIssueAction<'_> {
    fn issue(&self) -> Option<TrackerIssue> {
        fetch(self.tracker, self.site, self.key)
    }
}

/// Looks up keys found in a run's commits through the tracker.
pub struct TrackerBuildAction<'a> {
    site: &'a str,
    tracker: &'a dyn IssueTracker,
}

impl<'a> TrackerBuildAction<'a> {
    /// Creates an action that queries `site`.
    pub fn new(site: &'a str, tracker: &'a dyn IssueTracker) -> Self {
        Self { site, tracker }
    }
}

impl BuildIssueAction for TrackerBuildAction<'_> {
    fn issue(&self, key: &str) -> Option<TrackerIssue> {
        fetch(self.tracker, self.site, key)
    }
}

/// Tracker errors count as "not found" here; one unreachable issue must not
/// hide the others.
fn fetch(tracker: &dyn IssueTracker, site: &str, key: &str) -> Option<TrackerIssue> {
    match tracker.fetch_issue(site, key) {
        Ok(Some(issue)) => {
            tracing::debug!(
                site,
                key,
                canonical = %issue.key,
                summary = issue.summary.as_deref(),
                "issue found in tracker"
            );
            Some(issue)
        }
        Ok(None) => {
            tracing::debug!(site, key, "issue not found in tracker");
            None
        }
        Err(e) => {
            tracing::warn!(site, key, error = %e, "tracker lookup failed");
            None
        }
    }
}
