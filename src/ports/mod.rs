//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolver and an external
//! system (the issue tracker's API, the git history). Implementations live
//! in `src/adapters/`.

pub mod git;
pub mod tracker;

pub use git::{CommitInfo, GitRepo};
pub use tracker::{IssueTracker, TrackerIssue};

/// Boxed error returned by every port method.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
