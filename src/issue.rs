//! The resolved issue record handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::error::LinkError;

/// A tracker issue resolved to its canonical link.
///
/// Two issues are interchangeable when both the key and the URL match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Issue {
    id: String,
    url: String,
}

impl Issue {
    /// Builds an issue from a tracker key and its absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::EmptyIssueKey`] when `id` is empty.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Result<Self, LinkError> {
        let id = id.into();
        if id.is_empty() {
            return Err(LinkError::EmptyIssueKey);
        }
        Ok(Self { id, url: url.into() })
    }

    /// The tracker issue key, e.g. `PROJ-123`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Absolute URL of the issue on the tracker.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}
