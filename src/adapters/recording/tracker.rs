//! Recording adapter for the `IssueTracker` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::CassetteRecorder;
use crate::ports::{IssueTracker, PortError, TrackerIssue};

/// Records tracker lookups while delegating to an inner tracker.
pub struct RecordingIssueTracker {
    inner: Box<dyn IssueTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIssueTracker {
    /// Wraps `inner`, appending each lookup to `recorder`.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct FetchInput<'a> {
    site: &'a str,
    key: &'a str,
}

impl IssueTracker for RecordingIssueTracker {
    fn fetch_issue(&self, site: &str, key: &str) -> Result<Option<TrackerIssue>, PortError> {
        let result = self.inner.fetch_issue(site, key);
        record_result(&self.recorder, "tracker", "fetch_issue", &FetchInput { site, key }, &result);
        result
    }
}
