//! Issue tracker port for looking up issues by key.

use serde::{Deserialize, Serialize};

use super::PortError;

/// An issue as the tracker reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerIssue {
    /// The canonical key. May differ from the key that was asked for when
    /// the issue has been moved to another project.
    pub key: String,
    /// The issue title, when the tracker returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl TrackerIssue {
    /// Creates a handle with only a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), summary: None }
    }
}

/// Looks up issues in an external tracker.
///
/// Abstracting the tracker allows deterministic replay and testing
/// without touching a real tracker API.
pub trait IssueTracker: Send + Sync {
    /// Fetches the issue `key` from the tracker configured as `site`.
    ///
    /// Returns `Ok(None)` when the tracker answers that the issue does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker cannot be reached or answers with an
    /// unexpected status.
    fn fetch_issue(&self, site: &str, key: &str) -> Result<Option<TrackerIssue>, PortError>;
}
