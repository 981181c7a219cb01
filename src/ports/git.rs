//! Git repository port for reading commit messages.

use serde::{Deserialize, Serialize};

use super::PortError;

/// One commit from the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full commit hash.
    pub id: String,
    /// Full commit message (subject and body).
    pub message: String,
}

/// Provides read access to a git repository.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Returns the full message of the commit `rev` points to.
    ///
    /// # Errors
    ///
    /// Returns an error if `rev` does not name a commit.
    fn commit_message(&self, rev: &str) -> Result<String, PortError>;

    /// Lists the commits in `range` (anything `git log` accepts), newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is invalid or git fails.
    fn log(&self, range: &str) -> Result<Vec<CommitInfo>, PortError>;
}
