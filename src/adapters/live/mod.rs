//! Live adapters that talk to the real tracker and repository.

pub mod git;
pub mod tracker;

pub use git::LiveGitRepo;
pub use tracker::JiraTracker;
