//! Jira tracker site.

use regex::Regex;
use reqwest::Url;

use super::{SiteError, TrackerSite};
use crate::error::LinkError;
use crate::extract::default_pattern;
use crate::ports::TrackerIssue;

/// A Jira instance: base URL plus the pattern used to spot its keys.
#[derive(Debug, Clone)]
pub struct JiraSite {
    name: String,
    url: Url,
    pattern: Regex,
}

impl JiraSite {
    /// Builds a site from its configured name, base URL and optional pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the pattern does not compile.
    pub fn new(name: &str, url: &str, pattern: Option<&str>) -> Result<Self, LinkError> {
        let url = normalize_base(name, url)?;
        let pattern = match pattern {
            Some(raw) => Regex::new(raw)
                .map_err(|source| LinkError::InvalidPattern { site: name.to_string(), source })?,
            None => default_pattern().clone(),
        };
        Ok(Self { name: name.to_string(), url, pattern })
    }

    /// The configured site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base URL, always ending in `/`.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl TrackerSite for JiraSite {
    fn issue_pattern(&self) -> &Regex {
        &self.pattern
    }

    /// `<base>/browse/<KEY>`, with the key escaped as one path segment.
    fn issue_url(&self, issue: &TrackerIssue) -> Result<Url, SiteError> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| SiteError::Url {
                key: issue.key.clone(),
                reason: format!("{} cannot be a base URL", self.url),
            })?
            .pop_if_empty()
            .extend(["browse", issue.key.as_str()]);
        Ok(url)
    }
}

/// Parses a site base URL and makes sure its path ends in `/`, so relative
/// joins append to it instead of replacing the last segment.
pub(crate) fn normalize_base(site: &str, raw: &str) -> Result<Url, LinkError> {
    let mut url = Url::parse(raw)
        .map_err(|e| LinkError::InvalidUrl { site: site.to_string(), reason: e.to_string() })?;
    if !url.cannot_be_a_base() && !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
