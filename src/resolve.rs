//! Resolution of jobs and commits to tracker issues.
//!
//! Nothing here returns an error to the caller. A missing site or action
//! makes the whole query [`Resolution::NotApplicable`]; a key that cannot be
//! resolved is dropped from the result.

use serde::Serialize;

use crate::extract::find_issue_keys;
use crate::host::{ChangeEntry, IssueHost, Job, SiteError, TrackerSite};
use crate::issue::Issue;
use crate::ports::TrackerIssue;

/// Outcome of asking for the issues of a job or commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "issues", rename_all = "snake_case")]
pub enum Resolution {
    /// No tracker site or issue action is bound to the subject.
    NotApplicable,
    /// The issues that resolved. May be empty when the subject is bound to a
    /// tracker but none of its references resolved.
    Issues(Vec<Issue>),
}

impl Resolution {
    /// Returns `true` unless this is [`Resolution::NotApplicable`].
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Issues(_))
    }

    /// The resolved issues; empty when not applicable.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::NotApplicable => &[],
            Self::Issues(issues) => issues,
        }
    }

    /// Combines two answers for the same subject.
    ///
    /// Not-applicable answers are ignored; issue lists are concatenated
    /// without duplicates.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::NotApplicable, other) => other,
            (this, Self::NotApplicable) => this,
            (Self::Issues(mut issues), Self::Issues(more)) => {
                for issue in more {
                    push_unique(&mut issues, issue);
                }
                Self::Issues(issues)
            }
        }
    }
}

/// Why a single issue reference was dropped.
#[derive(Debug, thiserror::Error)]
pub enum Unresolved {
    /// The tracker has no such issue, or could not be asked.
    #[error("issue not found in tracker")]
    NotFound,
    /// The issue exists but its link could not be built.
    #[error(transparent)]
    Url(#[from] SiteError),
    /// The tracker returned an issue without a key.
    #[error("tracker returned an issue without a key")]
    EmptyKey,
}

/// Turns a tracker handle into an [`Issue`] linked on `site`.
///
/// # Errors
///
/// Returns [`Unresolved`] when there is no handle, the handle has no key,
/// or the site cannot build its URL.
pub fn resolve_one(
    site: &dyn TrackerSite,
    issue: Option<TrackerIssue>,
) -> Result<Issue, Unresolved> {
    let issue = issue.ok_or(Unresolved::NotFound)?;
    if issue.key.is_empty() {
        return Err(Unresolved::EmptyKey);
    }
    let url = site.issue_url(&issue)?;
    Issue::new(issue.key, url.to_string()).map_err(|_| Unresolved::EmptyKey)
}

/// The issue bound to `job` as a whole.
#[must_use]
pub fn issues_for_job(host: &dyn IssueHost, job: &Job) -> Resolution {
    let Some(site) = host.site_for(job) else {
        return Resolution::NotApplicable;
    };
    let Some(action) = host.job_action(job) else {
        return Resolution::NotApplicable;
    };

    match resolve_one(site, action.issue()) {
        Ok(issue) => Resolution::Issues(vec![issue]),
        Err(reason) => {
            tracing::debug!(job = job.name(), %reason, "job issue did not resolve");
            Resolution::NotApplicable
        }
    }
}

/// The issues referenced by the message of `entry`.
#[must_use]
pub fn issues_for_change(host: &dyn IssueHost, entry: &ChangeEntry) -> Resolution {
    let run = entry.run();
    let Some(site) = host.site_for(run.job()) else {
        return Resolution::NotApplicable;
    };
    let Some(action) = host.build_action(run) else {
        return Resolution::NotApplicable;
    };

    let mut issues = Vec::new();
    for key in find_issue_keys(entry.message(), site.issue_pattern()) {
        match resolve_one(site, action.issue(&key)) {
            Ok(issue) => push_unique(&mut issues, issue),
            Err(reason) => {
                tracing::debug!(
                    job = run.job().name(),
                    run = run.id(),
                    commit = entry.commit(),
                    %key,
                    %reason,
                    "dropping issue reference"
                );
            }
        }
    }
    Resolution::Issues(issues)
}

// Two keys can resolve to one issue when the tracker reports a moved
// issue under its new key.
fn push_unique(issues: &mut Vec<Issue>, issue: Issue) {
    if !issues.contains(&issue) {
        issues.push(issue);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use regex::Regex;
    use reqwest::Url;

    use super::*;
    use crate::host::{BuildIssueAction, JiraSite, JobIssueAction, Run};

    /// Tracker contents: key asked for -> canonical key, `None` = lookup fails.
    type Known = BTreeMap<&'static str, Option<&'static str>>;

    struct FakeAction {
        known: Known,
        bound: Option<&'static str>,
    }

    impl FakeAction {
        fn lookup(&self, key: &str) -> Option<TrackerIssue> {
            self.known.get(key).copied().flatten().map(TrackerIssue::new)
        }
    }

    impl JobIssueAction for FakeAction {
        fn issue(&self) -> Option<TrackerIssue> {
            self.bound.and_then(|key| self.lookup(key))
        }
    }

    impl BuildIssueAction for FakeAction {
        fn issue(&self, key: &str) -> Option<TrackerIssue> {
            self.lookup(key)
        }
    }

    struct FakeHost {
        site: Option<Box<dyn TrackerSite>>,
        known: Known,
        bound: Option<&'static str>,
        has_job_action: bool,
        has_build_action: bool,
    }

    impl FakeHost {
        fn new(known: &[(&'static str, Option<&'static str>)]) -> Self {
            Self {
                site: Some(Box::new(jira())),
                known: known.iter().copied().collect(),
                bound: None,
                has_job_action: true,
                has_build_action: true,
            }
        }

        fn action(&self) -> FakeAction {
            FakeAction { known: self.known.clone(), bound: self.bound }
        }
    }

    impl IssueHost for FakeHost {
        fn site_for(&self, _job: &Job) -> Option<&dyn TrackerSite> {
            self.site.as_deref()
        }

        fn job_action(&self, _job: &Job) -> Option<Box<dyn JobIssueAction + '_>> {
            self.has_job_action.then(|| Box::new(self.action()) as Box<dyn JobIssueAction>)
        }

        fn build_action(&self, _run: &Run) -> Option<Box<dyn BuildIssueAction + '_>> {
            self.has_build_action.then(|| Box::new(self.action()) as Box<dyn BuildIssueAction>)
        }
    }

    fn jira() -> JiraSite {
        JiraSite::new("main", "https://jira.example.com/", None).unwrap()
    }

    /// Builds URLs like [`JiraSite`] except for one key.
    struct FlakySite {
        inner: JiraSite,
        failing: &'static str,
    }

    impl TrackerSite for FlakySite {
        fn issue_pattern(&self) -> &Regex {
            self.inner.issue_pattern()
        }

        fn issue_url(&self, issue: &TrackerIssue) -> Result<Url, SiteError> {
            if issue.key == self.failing {
                return Err(SiteError::Url { key: issue.key.clone(), reason: "timed out".into() });
            }
            self.inner.issue_url(issue)
        }
    }

    struct BrokenSite(Regex);

    impl TrackerSite for BrokenSite {
        fn issue_pattern(&self) -> &Regex {
            &self.0
        }

        fn issue_url(&self, issue: &TrackerIssue) -> Result<Url, SiteError> {
            Err(SiteError::Url { key: issue.key.clone(), reason: "connection reset".into() })
        }
    }

    fn entry(message: &str) -> ChangeEntry {
        ChangeEntry::new(Run::new(Job::new("backend"), "12"), None, message)
    }

    fn issue(key: &str) -> Issue {
        Issue::new(key, format!("https://jira.example.com/browse/{key}")).unwrap()
    }

    #[test]
    fn commit_with_working_tracker_resolves() {
        let host = FakeHost::new(&[("PROJ-9", Some("PROJ-9"))]);
        let resolution = issues_for_change(&host, &entry("Fixes PROJ-9"));
        assert_eq!(resolution, Resolution::Issues(vec![issue("PROJ-9")]));
    }

    #[test]
    fn commit_with_failing_lookup_is_empty_not_inapplicable() {
        let host = FakeHost::new(&[("PROJ-9", None)]);
        let resolution = issues_for_change(&host, &entry("Fixes PROJ-9"));
        assert_eq!(resolution, Resolution::Issues(vec![]));
        assert!(resolution.is_applicable());
    }

    #[test]
    fn commit_drops_only_failed_keys() {
        let host = FakeHost::new(&[
            ("OPS-1", Some("OPS-1")),
            ("OPS-2", None),
            ("OPS-3", Some("OPS-3")),
        ]);
        let resolution = issues_for_change(&host, &entry("OPS-1 OPS-2 OPS-3 OPS-4"));
        let ids: Vec<&str> = resolution.issues().iter().map(Issue::id).collect();
        assert_eq!(ids, vec!["OPS-1", "OPS-3"]);
    }

    #[test]
    fn url_failure_drops_only_that_key() {
        let mut host = FakeHost::new(&[
            ("OPS-1", Some("OPS-1")),
            ("OPS-2", Some("OPS-2")),
            ("OPS-3", Some("OPS-3")),
        ]);
        host.site = Some(Box::new(FlakySite { inner: jira(), failing: "OPS-2" }));
        let resolution = issues_for_change(&host, &entry("OPS-1 OPS-2 OPS-3"));
        assert_eq!(resolution, Resolution::Issues(vec![issue("OPS-1"), issue("OPS-3")]));
    }

    #[test]
    fn one_host_serves_several_threads() {
        let host = FakeHost::new(&[("OPS-1", Some("OPS-1")), ("OPS-2", Some("OPS-2"))]);
        let shared: &dyn IssueHost = &host;
        let messages = ["OPS-1 first", "OPS-2 second", "OPS-1 and OPS-2"];

        let results: Vec<Resolution> = std::thread::scope(|scope| {
            let handles: Vec<_> = messages
                .iter()
                .map(|message| scope.spawn(move || issues_for_change(shared, &entry(message))))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(results[0], Resolution::Issues(vec![issue("OPS-1")]));
        assert_eq!(results[1], Resolution::Issues(vec![issue("OPS-2")]));
        assert_eq!(results[2], Resolution::Issues(vec![issue("OPS-1"), issue("OPS-2")]));
    }

    #[test]
    fn commit_without_site_is_not_applicable() {
        let mut host = FakeHost::new(&[("PROJ-9", Some("PROJ-9"))]);
        host.site = None;
        assert_eq!(issues_for_change(&host, &entry("Fixes PROJ-9")), Resolution::NotApplicable);
    }

    #[test]
    fn commit_without_build_action_is_not_applicable() {
        let mut host = FakeHost::new(&[("PROJ-9", Some("PROJ-9"))]);
        host.has_build_action = false;
        assert_eq!(issues_for_change(&host, &entry("Fixes PROJ-9")), Resolution::NotApplicable);
    }

    #[test]
    fn commit_without_keys_is_empty() {
        let host = FakeHost::new(&[]);
        assert_eq!(issues_for_change(&host, &entry("typo")), Resolution::Issues(vec![]));
    }

    #[test]
    fn moved_issues_are_reported_once() {
        let host = FakeHost::new(&[("OLD-4", Some("NEW-1")), ("NEW-1", Some("NEW-1"))]);
        let resolution = issues_for_change(&host, &entry("OLD-4 and NEW-1"));
        assert_eq!(resolution, Resolution::Issues(vec![issue("NEW-1")]));
    }

    #[test]
    fn repeated_resolution_is_set_equal() {
        let host = FakeHost::new(&[("AA-1", Some("AA-1")), ("BB-2", Some("BB-2"))]);
        let message = "BB-2 then AA-1, again BB-2";
        let collect = || -> HashSet<Issue> {
            issues_for_change(&host, &entry(message)).issues().iter().cloned().collect()
        };
        let first = collect();
        let second = collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn job_resolves_bound_issue() {
        let mut host = FakeHost::new(&[("OPS-7", Some("OPS-7"))]);
        host.bound = Some("OPS-7");
        assert_eq!(
            issues_for_job(&host, &Job::new("backend")),
            Resolution::Issues(vec![issue("OPS-7")])
        );
    }

    #[test]
    fn job_without_site_is_not_applicable_even_with_action() {
        let mut host = FakeHost::new(&[("OPS-7", Some("OPS-7"))]);
        host.bound = Some("OPS-7");
        host.site = None;
        assert_eq!(issues_for_job(&host, &Job::new("backend")), Resolution::NotApplicable);
    }

    #[test]
    fn job_without_action_is_not_applicable() {
        let mut host = FakeHost::new(&[("OPS-7", Some("OPS-7"))]);
        host.has_job_action = false;
        assert_eq!(issues_for_job(&host, &Job::new("backend")), Resolution::NotApplicable);
    }

    #[test]
    fn job_with_unresolvable_issue_is_not_applicable() {
        let mut host = FakeHost::new(&[("OPS-7", None)]);
        host.bound = Some("OPS-7");
        assert_eq!(issues_for_job(&host, &Job::new("backend")), Resolution::NotApplicable);
    }

    #[test]
    fn resolve_one_reports_each_failure() {
        let site = jira();
        assert!(matches!(resolve_one(&site, None), Err(Unresolved::NotFound)));
        assert!(matches!(
            resolve_one(&site, Some(TrackerIssue::new(""))),
            Err(Unresolved::EmptyKey)
        ));

        let broken = BrokenSite(Regex::new("(x)").unwrap());
        assert!(matches!(
            resolve_one(&broken, Some(TrackerIssue::new("OPS-1"))),
            Err(Unresolved::Url(_))
        ));

        let ok = resolve_one(&site, Some(TrackerIssue::new("OPS-1"))).unwrap();
        assert_eq!(ok, issue("OPS-1"));
    }

    #[test]
    fn merge_skips_inapplicable_and_dedupes() {
        let a = Resolution::Issues(vec![issue("A-1")]);
        let b = Resolution::Issues(vec![issue("A-1"), issue("B-1")]);
        assert_eq!(a.clone().merge(Resolution::NotApplicable), a);
        assert_eq!(
            Resolution::NotApplicable.merge(Resolution::NotApplicable),
            Resolution::NotApplicable
        );
        assert_eq!(a.merge(b), Resolution::Issues(vec![issue("A-1"), issue("B-1")]));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(Resolution::NotApplicable).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "not_applicable" }));

        let json = serde_json::to_value(Resolution::Issues(vec![issue("A-1")])).unwrap();
        assert_eq!(json["status"], "issues");
        assert_eq!(json["issues"][0]["id"], "A-1");
    }
}
