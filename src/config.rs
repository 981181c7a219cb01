//! Tracker and job configuration.
//!
//! Stored as YAML, by default in `.issuelink.yaml`:
//!
//! ```yaml
//! sites:
//!   - name: main
//!     url: https://jira.example.com/
//!     issue_pattern: "([A-Z]+-[0-9]+)"
//!     user: ci-bot
//! jobs:
//!   - name: backend
//!     site: main
//!     issue: OPS-7
//! ```
//!
//! API tokens are never read from the file; see [`token_for`].

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::host::JiraSite;

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".issuelink.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configured tracker sites.
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
    /// Jobs and the site each is bound to.
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// One tracker site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Name referenced by jobs.
    pub name: String,
    /// Base URL of the Jira instance.
    pub url: String,
    /// Pattern whose first capture group is an issue key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_pattern: Option<String>,
    /// User for basic authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// One job on the build host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name.
    pub name: String,
    /// Name of the site the job reports to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Issue key bound to the job as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    /// Whether commit messages of this job's runs are scanned for keys.
    #[serde(default = "default_scan_changes")]
    pub scan_changes: bool,
}

fn default_scan_changes() -> bool {
    true
}

impl Config {
    /// Builds every configured site, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns an error if a site URL or pattern is invalid.
    pub fn build_sites(&self) -> Result<BTreeMap<String, JiraSite>, LinkError> {
        self.sites
            .iter()
            .map(|site| {
                let built = JiraSite::new(&site.name, &site.url, site.issue_pattern.as_deref())?;
                Ok((site.name.clone(), built))
            })
            .collect()
    }

    /// Checks that all sites build and every job refers to a known site.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), LinkError> {
        let sites = self.build_sites()?;
        for job in &self.jobs {
            if let Some(site) = &job.site {
                if !sites.contains_key(site) {
                    return Err(LinkError::UnknownSite {
                        job: job.name.clone(),
                        site: site.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Loads and validates the configuration at `path`.
///
/// A missing file is an empty configuration: no job is bound to a tracker.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<Config, LinkError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no configuration file, using empty config");
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// API token for `site` from the environment.
///
/// `ISSUELINK_TOKEN_<SITE>` (upper-cased, `-` and `.` replaced by `_`) wins
/// over the shared `ISSUELINK_TOKEN`.
#[must_use]
pub fn token_for(site: &str) -> Option<String> {
    env::var(token_var(site)).or_else(|_| env::var("ISSUELINK_TOKEN")).ok()
}

fn token_var(site: &str) -> String {
    let suffix: String = site
        .chars()
        .map(|c| if c == '-' || c == '.' { '_' } else { c.to_ascii_uppercase() })
        .collect();
    format!("ISSUELINK_TOKEN_{suffix}")
}
