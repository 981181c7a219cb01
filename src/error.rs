//! Error type for configuration, I/O and port failures.
//!
//! Resolution itself never fails; these errors only surface from the outer
//! layers (loading configuration, reading git history, talking to trackers).

use thiserror::Error;

/// Main error type for issuelink operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Filesystem or process I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or cassette YAML could not be parsed or written.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A site's issue pattern does not compile.
    #[error("invalid issue pattern for site {site}: {source}")]
    InvalidPattern {
        /// Site name.
        site: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A site's base URL does not parse.
    #[error("invalid URL for site {site}: {reason}")]
    InvalidUrl {
        /// Site name.
        site: String,
        /// Parser message.
        reason: String,
    },

    /// A job names a site that is not configured.
    #[error("job {job} refers to unknown site {site}")]
    UnknownSite {
        /// Job name.
        job: String,
        /// Site name the job refers to.
        site: String,
    },

    /// Reading git history failed.
    #[error("git error: {0}")]
    Git(String),

    /// The tracker client could not be built or reached.
    #[error("tracker error: {0}")]
    Tracker(String),

    /// An issue was built without a key.
    #[error("issue key must not be empty")]
    EmptyIssueKey,

    /// Invalid command-line usage.
    #[error("{0}")]
    Usage(String),
}

impl LinkError {
    /// Exit code for the CLI.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidPattern { .. }
            | Self::InvalidUrl { .. }
            | Self::UnknownSite { .. }
            | Self::Yaml(_)
            | Self::Usage(_) => 2,
            Self::Git(_) | Self::Tracker(_) | Self::Io(_) => 3,
            Self::Json(_) | Self::EmptyIssueKey => 1,
        }
    }
}
