//! Recording adapter for the `GitRepo` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::CassetteRecorder;
use crate::ports::{CommitInfo, GitRepo, PortError};

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RevInput<'a> {
    rev: &'a str,
}

#[derive(Serialize)]
struct RangeInput<'a> {
    range: &'a str,
}

impl GitRepo for RecordingGitRepo {
    fn commit_message(&self, rev: &str) -> Result<String, PortError> {
        let result = self.inner.commit_message(rev);
        record_result(&self.recorder, "git", "commit_message", &RevInput { rev }, &result);
        result
    }

    fn log(&self, range: &str) -> Result<Vec<CommitInfo>, PortError> {
        let result = self.inner.log(range);
        record_result(&self.recorder, "git", "log", &RangeInput { range }, &result);
        result
    }
}
