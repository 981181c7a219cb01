//! Replaying adapter for the `GitRepo` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::CassetteReplayer;
use crate::ports::{CommitInfo, GitRepo, PortError};

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn commit_message(&self, _rev: &str) -> Result<String, PortError> {
        replay_result(&self.replayer, "git", "commit_message")
    }

    fn log(&self, _range: &str) -> Result<Vec<CommitInfo>, PortError> {
        replay_result(&self.replayer, "git", "log")
    }
}
