//! Registry of issue factories.
//!
//! Each factory answers the two queries of the presentation layer: issues
//! for a job, issues for a commit. The registry asks every registered
//! factory and merges the answers.

use std::collections::BTreeMap;

use crate::host::{ChangeEntry, IssueHost, Job};
use crate::resolve::{self, Resolution};

/// A source of issues for jobs and commits.
pub trait IssueFactory: Send + Sync {
    /// Registry key.
    fn name(&self) -> &str;

    /// Issues bound to `job`.
    fn issues_for_job(&self, host: &dyn IssueHost, job: &Job) -> Resolution;

    /// Issues referenced by `entry`.
    fn issues_for_change(&self, host: &dyn IssueHost, entry: &ChangeEntry) -> Resolution;
}

/// Factory for Jira references.
pub struct JiraIssueFactory;

impl IssueFactory for JiraIssueFactory {
    fn name(&self) -> &str {
        "jira"
    }

    fn issues_for_job(&self, host: &dyn IssueHost, job: &Job) -> Resolution {
        resolve::issues_for_job(host, job)
    }

    fn issues_for_change(&self, host: &dyn IssueHost, entry: &ChangeEntry) -> Resolution {
        resolve::issues_for_change(host, entry)
    }
}

/// Named factories, queried in name order.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Box<dyn IssueFactory>>,
}

impl FactoryRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in factories.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JiraIssueFactory));
        registry
    }

    /// Adds `factory`, returning the one it replaced under the same name.
    pub fn register(&mut self, factory: Box<dyn IssueFactory>) -> Option<Box<dyn IssueFactory>> {
        self.factories.insert(factory.name().to_string(), factory)
    }

    /// Names of the registered factories.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Merged answer of every factory for `job`.
    #[must_use]
    pub fn issues_for_job(&self, host: &dyn IssueHost, job: &Job) -> Resolution {
        self.factories
            .values()
            .map(|factory| factory.issues_for_job(host, job))
            .fold(Resolution::NotApplicable, Resolution::merge)
    }

    /// Merged answer of every factory for `entry`.
    #[must_use]
    pub fn issues_for_change(&self, host: &dyn IssueHost, entry: &ChangeEntry) -> Resolution {
        self.factories
            .values()
            .map(|factory| factory.issues_for_change(host, entry))
            .fold(Resolution::NotApplicable, Resolution::merge)
    }
}
