//! Live git adapter using `git` CLI commands.

use std::process::Command;

use crate::ports::{CommitInfo, GitRepo, PortError};

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// Reads history by shelling out to the `git` CLI.
/// Runs in the current directory.
#[derive(Debug, Default)]
pub struct LiveGitRepo;

impl LiveGitRepo {
    /// Creates the adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn git(&self, args: &[&str]) -> Result<String, PortError> {
        let output = Command::new("git").args(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitRepo for LiveGitRepo {
    fn commit_message(&self, rev: &str) -> Result<String, PortError> {
        let out = self.git(&["log", "-1", "--format=%B", rev, "--"])?;
        Ok(out.trim_end().to_string())
    }

    fn log(&self, range: &str) -> Result<Vec<CommitInfo>, PortError> {
        let out = self.git(&["log", "--format=%H%x1f%B%x1e", range, "--"])?;
        Ok(parse_log(&out))
    }
}

/// Splits `%H%x1f%B%x1e` records.
fn parse_log(out: &str) -> Vec<CommitInfo> {
    out.split(RECORD_SEP)
        .filter_map(|record| {
            let (id, message) = record.trim_start().split_once(FIELD_SEP)?;
            Some(CommitInfo { id: id.to_string(), message: message.trim_end().to_string() })
        })
        .collect()
}
