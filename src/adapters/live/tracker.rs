//! Live adapter for the `IssueTracker` port using the Jira REST API.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::config::{token_for, Config};
use crate::error::LinkError;
use crate::host::jira::normalize_base;
use crate::ports::{IssueTracker, PortError, TrackerIssue};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection details for one site.
struct Endpoint {
    base: Url,
    user: Option<String>,
    token: Option<String>,
}

/// Jira client for every configured site.
pub struct JiraTracker {
    client: Client,
    endpoints: BTreeMap<String, Endpoint>,
}

/// Issue as returned by `GET /rest/api/2/issue/{key}`.
#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    #[serde(default)]
    fields: Option<JiraFields>,
}

#[derive(Deserialize)]
struct JiraFields {
    summary: Option<String>,
}

/// Error body Jira sends with 4xx/5xx responses.
#[derive(Deserialize)]
struct JiraErrorBody {
    #[serde(rename = "errorMessages", default)]
    error_messages: Vec<String>,
}

impl JiraTracker {
    /// Builds a client for the sites in `config`, taking tokens from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a site URL is invalid or the HTTP client cannot
    /// be created.
    pub fn from_config(config: &Config) -> Result<Self, LinkError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("issuelink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LinkError::Tracker(format!("failed to build HTTP client: {e}")))?;

        let mut endpoints = BTreeMap::new();
        for site in &config.sites {
            let endpoint = Endpoint {
                base: normalize_base(&site.name, &site.url)?,
                user: site.user.clone(),
                token: token_for(&site.name),
            };
            endpoints.insert(site.name.clone(), endpoint);
        }
        Ok(Self { client, endpoints })
    }
}

/// `<base>/rest/api/2/issue/<key>?fields=summary`.
fn issue_endpoint(base: &Url, key: &str) -> Result<Url, PortError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| format!("{base} cannot be a base URL"))?
        .pop_if_empty()
        .extend(["rest", "api", "2", "issue", key]);
    url.query_pairs_mut().append_pair("fields", "summary");
    Ok(url)
}

impl IssueTracker for JiraTracker {
    fn fetch_issue(&self, site: &str, key: &str) -> Result<Option<TrackerIssue>, PortError> {
        let endpoint =
            self.endpoints.get(site).ok_or_else(|| format!("site {site} is not configured"))?;
        let url = issue_endpoint(&endpoint.base, key)?;

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        request = match (&endpoint.user, &endpoint.token) {
            (Some(user), token) => request.basic_auth(user, token.as_deref()),
            (None, Some(token)) => request.bearer_auth(token),
            (None, None) => request,
        };

        let response =
            request.send().map_err(|e| format!("Jira request for {key} on {site} failed: {e}"))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body =
            response.text().map_err(|e| format!("failed to read Jira response for {key}: {e}"))?;
        if !status.is_success() {
            let msg = serde_json::from_str::<JiraErrorBody>(&body)
                .ok()
                .filter(|b| !b.error_messages.is_empty())
                .map_or(body, |b| b.error_messages.join("; "));
            let code = status.as_u16();
            return Err(format!("Jira error ({code}) for {key} on {site}: {msg}").into());
        }

        let issue: JiraIssue = serde_json::from_str(&body)
            .map_err(|e| format!("failed to parse Jira issue {key}: {e}"))?;
        Ok(Some(TrackerIssue {
            key: issue.key,
            summary: issue.fields.and_then(|f| f.summary),
        }))
    }
}
