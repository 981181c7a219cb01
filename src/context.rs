//! Service context bundling the port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::{JiraTracker, LiveGitRepo};
use crate::adapters::recording::{RecordingGitRepo, RecordingIssueTracker};
use crate::adapters::replaying::{ReplayingGitRepo, ReplayingIssueTracker};
use crate::cassette::{Cassette, CassetteRecorder, CassetteReplayer};
use crate::config::Config;
use crate::error::LinkError;
use crate::ports::{GitRepo, IssueTracker};

/// Bundles the ports a command needs.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Issue tracker used to resolve keys.
    pub tracker: Box<dyn IssueTracker>,
    /// Git repository for commit messages.
    pub git: Box<dyn GitRepo>,
    /// Cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Live adapters: Jira over HTTP and the `git` CLI.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker client cannot be built.
    pub fn live(config: &Config) -> Result<Self, LinkError> {
        Ok(Self {
            tracker: Box::new(JiraTracker::from_config(config)?),
            git: Box::new(LiveGitRepo::new()),
            recorder: None,
        })
    }

    /// Live adapters whose interactions are written to a cassette at `path`
    /// when the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker client cannot be built.
    pub fn recording(path: &Path, config: &Config) -> Result<Self, LinkError> {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "issuelink-session")));
        let tracker = JiraTracker::from_config(config)?;
        Ok(Self {
            tracker: Box::new(RecordingIssueTracker::new(Box::new(tracker), Arc::clone(&recorder))),
            git: Box::new(RecordingGitRepo::new(
                Box::new(LiveGitRepo::new()),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        })
    }

    /// Serves every port from the cassette at `path`.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, LinkError> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Serves every port from an in-memory cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self {
            tracker: Box::new(ReplayingIssueTracker::new(CassetteReplayer::new(cassette))),
            git: Box::new(ReplayingGitRepo::new(CassetteReplayer::new(cassette))),
            recorder: None,
        }
    }

    /// Writes the cassette now instead of waiting for drop.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn flush(&self) -> Result<(), LinkError> {
        if let Some(recorder) = &self.recorder {
            recorder.lock().unwrap_or_else(PoisonError::into_inner).finish()?;
        }
        Ok(())
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to write cassette");
        }
    }
}
